use super::driver::OpenError;
use std::collections::HashMap;
use std::convert::TryFrom;

/// Parse a decimal or 0x prefixed hexadecimal number
pub fn parse_number(s: &str) -> Option<u64> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

/// Numeric driver parameter, `default` if it's not present
pub fn parse_param<T>(params: &HashMap<String, String>, key: &str, default: T) -> Result<T, OpenError>
where
    T: TryFrom<u64>,
{
    match params.get(key) {
        None => Ok(default),
        Some(v) => parse_number(v)
            .and_then(|n| T::try_from(n).ok())
            .ok_or_else(|| OpenError::InvalidParameter(format!("{}={}", key, v))),
    }
}
