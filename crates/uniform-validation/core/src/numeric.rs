//! Lenient integer parsing for field values and message arguments

/// Parses the leading base-10 integer of `s`.
///
/// Leading whitespace and a single sign are accepted, and parsing stops at
/// the first non-digit, so `"12px"` yields `12` and `"  -7.5"` yields `-7`.
/// Returns `None` when no digit follows the optional sign. Values that do
/// not fit an `i64` saturate.
///
/// # Examples
/// ```
/// use uniform_validation_core::numeric::parse_leading_int;
/// assert_eq!(parse_leading_int("42"), Some(42));
/// assert_eq!(parse_leading_int("12px"), Some(12));
/// assert_eq!(parse_leading_int("abc"), None);
/// ```
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for b in digits[..end].bytes() {
        let digit = i64::from(b - b'0');
        value = value.saturating_mul(10).saturating_add(digit);
    }

    Some(if negative { -value } else { value })
}
