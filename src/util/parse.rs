//! Lenient integer parsing for client-supplied numbers

/// Parse the leading integer of `input`, the way browsers' `parseInt` does.
///
/// Leading whitespace and a single `+`/`-` sign are accepted, then the longest
/// run of ASCII digits is taken and anything after it is ignored. Returns
/// `None` when there are no digits or the value does not fit in an `i64`.
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
