//! Numeric string parsing with iproute2 semantics.
//!
//! Values accept a `0x`/`0X` prefix for hexadecimal and a leading `0` for
//! octal, matching `strtoul(..., 0)` as used by the classic tools.

/// Error type for numeric parsing failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    /// Not a valid unsigned integer for the expected width.
    #[error("invalid unsigned integer: {0}")]
    Unsigned(String),
    /// Not a valid signed integer for the expected width.
    #[error("invalid signed integer: {0}")]
    Signed(String),
}

fn split_radix(s: &str) -> (&str, u32) {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    }
}

/// Parse an unsigned 64-bit integer.
pub fn parse_u64(s: &str) -> Result<u64, ParseError> {
    let (digits, radix) = split_radix(s);
    u64::from_str_radix(digits, radix).map_err(|_| ParseError::Unsigned(s.to_string()))
}

/// Parse an unsigned 32-bit integer.
pub fn parse_u32(s: &str) -> Result<u32, ParseError> {
    let value = parse_u64(s)?;
    u32::try_from(value).map_err(|_| ParseError::Unsigned(s.to_string()))
}

/// Parse a signed 32-bit integer.
pub fn parse_i32(s: &str) -> Result<i32, ParseError> {
    let (negative, magnitude) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (digits, radix) = split_radix(magnitude);
    let magnitude =
        u64::from_str_radix(digits, radix).map_err(|_| ParseError::Signed(s.to_string()))?;

    let value = if negative {
        i64::try_from(magnitude)
            .map(|m| -m)
            .map_err(|_| ParseError::Signed(s.to_string()))?
    } else {
        i64::try_from(magnitude).map_err(|_| ParseError::Signed(s.to_string()))?
    };

    i32::try_from(value).map_err(|_| ParseError::Signed(s.to_string()))
}
