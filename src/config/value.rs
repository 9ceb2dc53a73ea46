//! Coercion of raw config text into numbers.

/// Parses a raw value as an unsigned 32-bit integer.
///
/// Accepts decimal digits with at most one leading `+`, or the shift form
/// `1<<N` / `1 << N` with `N` in `0..=31`. Anything else, including an
/// empty string or a value past `u32::MAX`, is `None`.
pub fn parse_u32(text: &str) -> Option<u32> {
    if let Some(exponent) = shift_exponent(text) {
        return parse_decimal(exponent)
            .filter(|&n| n < u32::BITS)
            .map(|n| 1u32 << n);
    }
    parse_decimal(text.strip_prefix('+').unwrap_or(text))
}

fn shift_exponent(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('1')?;
    let rest = rest.trim_start().strip_prefix("<<")?;
    Some(rest.trim_start())
}

fn parse_decimal(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
