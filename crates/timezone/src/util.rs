macro_rules! clamp {
    ($t:expr; $min:tt.. $max:tt) => {
        if $t < $min {
            $min
        } else if $max - 1 < $t {
            $max - 1
        } else {
            $t
        }
    };
    ($t:expr; $min:tt..= $max:tt) => {
        if $t < $min {
            $min
        } else if $max < $t {
            $max
        } else {
            $t
        }
    };
}

pub(crate) use clamp;

#[test]
fn test_macros() {
    const MAX: usize = 3;
    const MIN: usize = 1;

    let clamped = clamp!(4; MIN..=MAX);
    assert_eq!(clamped, 3);

    let clamped = clamp!(4; MIN..MAX);
    assert_eq!(clamped, 2);

    let clamped = clamp!(0; MIN..=MAX);
    assert_eq!(clamped, 1);

    let clamped = clamp!(2; MIN..=MAX);
    assert_eq!(clamped, 2);
}
