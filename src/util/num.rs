/// Truncates an integer to 32-bit two's-complement range.
///
/// All scripted integers are stored through this function, so a value such
/// as `2^31` wraps to `-2^31`.
///
/// # Example
/// ```
/// use seraph::util::num::to_int32;
///
/// assert_eq!(to_int32(5), 5);
/// assert_eq!(to_int32(2_147_483_648), -2_147_483_648);
/// assert_eq!(to_int32(-1), -1);
/// ```
#[must_use]
pub const fn to_int32(value: i64) -> i64 {
    value as i32 as i64
}

/// Converts a float to a 32-bit integer: truncate toward zero, then wrap.
///
/// Non-finite inputs convert to zero.
///
/// # Example
/// ```
/// use seraph::util::num::f64_to_int32;
///
/// assert_eq!(f64_to_int32(3.9), 3);
/// assert_eq!(f64_to_int32(-3.9), -3);
/// assert_eq!(f64_to_int32(f64::NAN), 0);
/// ```
#[must_use]
pub fn f64_to_int32(value: f64) -> i64 {
    if value.is_finite() {
        to_int32(value.trunc() as i64)
    } else {
        0
    }
}

/// Truncates a float toward zero into a full-width integer.
///
/// Unlike [`f64_to_int32`] this does not wrap to 32 bits; it is used where
/// an index or count is needed before range checking.
#[must_use]
pub fn f64_trunc(value: f64) -> i64 {
    if value.is_finite() { value.trunc() as i64 } else { 0 }
}
