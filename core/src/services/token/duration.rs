//! Token lifetime strings such as `"15m"`, `"1h"` or `"7d"`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TokenError;

/// Digits followed by a single unit: s, m, h or d
static DURATION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[smhd]$").unwrap());

/// Parse a lifetime string into seconds
pub fn parse_duration(duration: &str) -> Result<i64, TokenError> {
    if !DURATION_REGEX.is_match(duration) {
        return Err(TokenError::invalid_argument(format!(
            "invalid duration '{}': expected digits followed by s, m, h or d",
            duration
        )));
    }

    let (digits, unit) = duration.split_at(duration.len() - 1);
    let multiplier = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        _ => 86_400,
    };

    digits
        .parse::<i64>()
        .ok()
        .and_then(|value| value.checked_mul(multiplier))
        .ok_or_else(|| TokenError::invalid_argument(format!("duration '{}' is too large", duration)))
}
