//! Zone serialization into the fixed wire layout.
//!
//! The layout is a backward-compatibility commitment shared with every other
//! process exchanging zones, so the field names here must never change:
//!
//! ```json
//! { "n": "America/New_York",
//!   "e": [ { "s": 27795240, "o": -300 }, { "s": 27452580, "o": -240 } ],
//!   "o": -300 }
//! ```
//!
//! 'e' entries keep their stored order (descending by start), and 'o' is the
//! offset for all time before the earliest era.
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::{Era, Zone};

impl Serialize for Era {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map_ser = serializer.serialize_map(Some(2))?;

        map_ser.serialize_entry("s", &self.start())?;
        map_ser.serialize_entry("o", &self.offset())?;

        map_ser.end()
    }
}

impl Serialize for Zone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map_ser = serializer.serialize_map(Some(3))?;

        map_ser.serialize_entry("n", self.name())?;
        map_ser.serialize_entry("e", self.eras())?;
        map_ser.serialize_entry("o", &self.earliest_offset())?;

        map_ser.end()
    }
}

impl Zone {
    /// Encodes this zone into its generic wire value form.
    ///
    /// [`Zone::decode`] reverses this losslessly for every validly
    /// constructed zone.
    pub fn encode(&self) -> serde_json::Value {
        let eras = self
            .eras()
            .iter()
            .map(|era| serde_json::json!({ "s": era.start(), "o": era.offset() }))
            .collect::<Vec<_>>();

        serde_json::json!({
            "n": self.name(),
            "e": eras,
            "o": self.earliest_offset(),
        })
    }
}
