//! Zone deserialization from the fixed wire layout.
//!
//! Two entry points cover the two transport shapes: the [`Deserialize`]
//! impls for any [`serde`] format, and [`Zone::decode`] for a generic
//! [`serde_json::Value`] already in hand. Both accept fields in any order,
//! require every field to be present with the right primitive type, and
//! perform no ordering validation on the era list.
use std::fmt;

use serde::Deserialize;
use serde::de::{self, IgnoredAny, MapAccess};
use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::{Era, Zone};

impl<'de> Deserialize<'de> for Era {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_map(EraVisitor)
    }
}

enum EraField {
    Start,
    Offset,
    Unknown,
}

impl<'de> Deserialize<'de> for EraField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct FieldVisitor;

        impl de::Visitor<'_> for FieldVisitor {
            type Value = EraField;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("'s' or 'o'")
            }

            fn visit_str<E>(self, string: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(match string {
                    "s" => EraField::Start,
                    "o" => EraField::Offset,
                    _ => EraField::Unknown,
                })
            }
        }

        deserializer.deserialize_identifier(FieldVisitor)
    }
}

struct EraVisitor;

impl<'de> de::Visitor<'de> for EraVisitor {
    type Value = Era;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map with integer fields 's' and 'o'")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut start = None;
        let mut offset = None;

        while let Some(field) = map.next_key::<EraField>()? {
            match field {
                EraField::Start if start.is_some() => {
                    return Err(de::Error::duplicate_field("s"));
                }
                EraField::Start => start = Some(map.next_value::<i64>()?),
                EraField::Offset if offset.is_some() => {
                    return Err(de::Error::duplicate_field("o"));
                }
                EraField::Offset => offset = Some(map.next_value::<i32>()?),
                EraField::Unknown => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        let start = start.ok_or_else(|| de::Error::missing_field("s"))?;
        let offset = offset.ok_or_else(|| de::Error::missing_field("o"))?;

        Ok(Era::new(start, offset))
    }
}

impl<'de> Deserialize<'de> for Zone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_map(ZoneVisitor)
    }
}

enum ZoneField {
    Name,
    Eras,
    Offset,
    Unknown,
}

impl<'de> Deserialize<'de> for ZoneField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct FieldVisitor;

        impl de::Visitor<'_> for FieldVisitor {
            type Value = ZoneField;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("'n', 'e' or 'o'")
            }

            fn visit_str<E>(self, string: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(match string {
                    "n" => ZoneField::Name,
                    "e" => ZoneField::Eras,
                    "o" => ZoneField::Offset,
                    _ => ZoneField::Unknown,
                })
            }
        }

        deserializer.deserialize_identifier(FieldVisitor)
    }
}

struct ZoneVisitor;

impl<'de> de::Visitor<'de> for ZoneVisitor {
    type Value = Zone;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map with fields 'n' (name), 'e' (eras) and 'o' (fallback offset)")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut name = None;
        let mut eras = None;
        let mut offset = None;

        while let Some(field) = map.next_key::<ZoneField>()? {
            match field {
                ZoneField::Name if name.is_some() => {
                    return Err(de::Error::duplicate_field("n"));
                }
                ZoneField::Name => name = Some(map.next_value::<String>()?),
                ZoneField::Eras if eras.is_some() => {
                    return Err(de::Error::duplicate_field("e"));
                }
                ZoneField::Eras => eras = Some(map.next_value::<Vec<Era>>()?),
                ZoneField::Offset if offset.is_some() => {
                    return Err(de::Error::duplicate_field("o"));
                }
                ZoneField::Offset => offset = Some(map.next_value::<i32>()?),
                ZoneField::Unknown => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        let name = name.ok_or_else(|| de::Error::missing_field("n"))?;
        let eras = eras.ok_or_else(|| de::Error::missing_field("e"))?;
        let offset = offset.ok_or_else(|| de::Error::missing_field("o"))?;

        Ok(Zone::custom(name, eras, offset))
    }
}

impl Zone {
    /// Decodes a zone from its generic wire value form, reversing
    /// [`Zone::encode`].
    ///
    /// Fields may appear in any order. A missing field, or one holding the
    /// wrong primitive type, fails with a [`DecodeError`] naming the
    /// offending path.
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        match decode_zone(value) {
            Ok(zone) => Ok(zone),
            Err(error) => {
                tracing::debug!(message = "failed to decode zone", %error);
                Err(error)
            }
        }
    }
}

fn decode_zone(value: &Value) -> Result<Zone, DecodeError> {
    let map = value
        .as_object()
        .ok_or_else(|| DecodeError::invalid_type("(root)", "a map", value))?;

    let name = match map.get("n") {
        Some(Value::String(name)) => name.clone(),
        Some(other) => return Err(DecodeError::invalid_type("n", "a string", other)),
        None => return Err(DecodeError::missing("n")),
    };

    let eras = match map.get("e") {
        Some(Value::Array(entries)) => {
            let mut eras = Vec::with_capacity(entries.len());

            for (index, entry) in entries.iter().enumerate() {
                eras.push(decode_era(entry, index)?);
            }

            eras
        }
        Some(other) => return Err(DecodeError::invalid_type("e", "a list", other)),
        None => return Err(DecodeError::missing("e")),
    };

    let offset = require_i32(map, "o", "o")?;

    Ok(Zone::custom(name, eras, offset))
}

fn decode_era(value: &Value, index: usize) -> Result<Era, DecodeError> {
    let map = value
        .as_object()
        .ok_or_else(|| DecodeError::invalid_type(format!("e[{index}]"), "a map", value))?;

    let start = require_i64(map, "s", format!("e[{index}].s"))?;
    let offset = require_i32(map, "o", format!("e[{index}].o"))?;

    Ok(Era::new(start, offset))
}

fn require_i64(
    map: &Map<String, Value>,
    key: &str,
    path: impl Into<String>,
) -> Result<i64, DecodeError> {
    match map.get(key) {
        Some(value) => value
            .as_i64()
            .ok_or_else(|| DecodeError::invalid_type(path, "an integer", value)),
        None => Err(DecodeError::missing(path)),
    }
}

fn require_i32(
    map: &Map<String, Value>,
    key: &str,
    path: impl Into<String>,
) -> Result<i32, DecodeError> {
    let path = path.into();
    let wide = require_i64(map, key, path.as_str())?;

    wide.try_into().map_err(|_| DecodeError::InvalidType {
        path,
        expected: "a 32 bit integer",
        found: "a number out of range",
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn new_york_2022() -> Zone {
        Zone::custom(
            "America/New_York",
            vec![Era::new(27_795_240, -300), Era::new(27_452_580, -240)],
            -300,
        )
    }

    #[test]
    fn test_encode_layout() {
        let encoded = new_york_2022().encode();

        assert_eq!(
            encoded,
            json!({
                "n": "America/New_York",
                "e": [
                    { "s": 27_795_240, "o": -300 },
                    { "s": 27_452_580, "o": -240 },
                ],
                "o": -300,
            })
        );
    }

    #[test]
    fn test_decode_round_trip() {
        for zone in [new_york_2022(), Zone::utc(), Zone::fixed("UTC+14", 840)] {
            assert_eq!(Zone::decode(&zone.encode()), Ok(zone));
        }
    }

    #[test]
    fn test_decode_field_order_is_irrelevant() {
        let reordered = json!({
            "o": -300,
            "e": [
                { "o": -300, "s": 27_795_240 },
                { "s": 27_452_580, "o": -240 },
            ],
            "n": "America/New_York",
        });

        assert_eq!(Zone::decode(&reordered), Ok(new_york_2022()));
    }

    #[test]
    fn test_decode_missing_fields() {
        let missing_name = json!({ "e": [], "o": 0 });
        assert_eq!(
            Zone::decode(&missing_name),
            Err(DecodeError::Missing("n".to_owned()))
        );

        let missing_eras = json!({ "n": "UTC", "o": 0 });
        assert_eq!(
            Zone::decode(&missing_eras),
            Err(DecodeError::Missing("e".to_owned()))
        );

        let missing_offset = json!({ "n": "UTC", "e": [] });
        assert_eq!(
            Zone::decode(&missing_offset),
            Err(DecodeError::Missing("o".to_owned()))
        );

        let missing_era_offset = json!({
            "n": "x",
            "e": [{ "s": 1, "o": 2 }, { "s": 0 }],
            "o": 0,
        });
        assert_eq!(
            Zone::decode(&missing_era_offset),
            Err(DecodeError::Missing("e[1].o".to_owned()))
        );
    }

    #[test]
    fn test_decode_invalid_types() {
        let not_a_map = json!([1, 2, 3]);
        assert!(matches!(
            Zone::decode(&not_a_map),
            Err(DecodeError::InvalidType { expected: "a map", .. })
        ));

        let name_not_a_string = json!({ "n": 5, "e": [], "o": 0 });
        assert_eq!(
            Zone::decode(&name_not_a_string),
            Err(DecodeError::InvalidType {
                path: "n".to_owned(),
                expected: "a string",
                found: "a number",
            })
        );

        let eras_not_a_list = json!({ "n": "UTC", "e": {}, "o": 0 });
        assert_eq!(
            Zone::decode(&eras_not_a_list),
            Err(DecodeError::InvalidType {
                path: "e".to_owned(),
                expected: "a list",
                found: "a map",
            })
        );

        let era_start_not_an_int = json!({
            "n": "x",
            "e": [{ "s": "soon", "o": 0 }],
            "o": 0,
        });
        assert_eq!(
            Zone::decode(&era_start_not_an_int),
            Err(DecodeError::InvalidType {
                path: "e[0].s".to_owned(),
                expected: "an integer",
                found: "a string",
            })
        );

        // fractional values are not integers
        let fractional_offset = json!({ "n": "x", "e": [], "o": 1.5 });
        assert!(matches!(
            Zone::decode(&fractional_offset),
            Err(DecodeError::InvalidType { .. })
        ));

        // offsets outside the 32 bit range are rejected, not truncated
        let oversized_offset = json!({ "n": "x", "e": [], "o": 5_000_000_000_i64 });
        assert!(matches!(
            Zone::decode(&oversized_offset),
            Err(DecodeError::InvalidType { .. })
        ));
    }

    #[test]
    fn test_deserialize_strictness() {
        let missing = serde_json::from_value::<Zone>(json!({ "n": "UTC", "o": 0 }));
        assert!(missing.is_err());

        let bad_type = serde_json::from_value::<Zone>(json!({ "n": "UTC", "e": 5, "o": 0 }));
        assert!(bad_type.is_err());

        let duplicate = serde_json::from_str::<Zone>(r#"{ "n": "UTC", "e": [], "o": 0, "o": 0 }"#);
        assert!(duplicate.is_err());

        // unknown fields are skipped so newer writers stay compatible
        let extra = serde_json::from_value::<Zone>(json!({
            "n": "UTC",
            "e": [],
            "o": 0,
            "v": 2,
        }));
        assert_eq!(extra.unwrap(), Zone::utc());
    }

    #[test]
    fn test_error_display() {
        let error = Zone::decode(&json!({ "n": "x", "e": [{ "s": true, "o": 0 }], "o": 0 }))
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "invalid type at 'e[0].s': expected an integer, found a boolean"
        );

        assert_eq!(
            DecodeError::Missing("o".to_owned()).to_string(),
            "missing required field 'o'"
        );
    }
}
