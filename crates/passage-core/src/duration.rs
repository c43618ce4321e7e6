//! Human-friendly duration strings ("15m", "1h30m", "7d").

use crate::error::ConfigError;
use chrono::Duration;

/// Parse a duration string like "24h", "7d", "1h30m" or "500ms" into a
/// `chrono::Duration`.
///
/// A leading `-` yields a negative duration; callers that mint tokens reject
/// those themselves. A bare integer is read as hours.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let input = s.trim().to_lowercase();
    let invalid = |reason: &str| ConfigError::InvalidDuration {
        input: s.to_string(),
        reason: reason.to_string(),
    };

    let (negative, body) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.as_str()),
    };
    if body.is_empty() {
        return Err(invalid("empty duration"));
    }

    if let Ok(hours) = body.parse::<i64>() {
        let duration = Duration::try_hours(hours).ok_or_else(|| invalid("out of range"))?;
        return Ok(if negative { -duration } else { duration });
    }

    let mut total = Duration::zero();
    let mut rest = body;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits == 0 {
            return Err(invalid("expected a number"));
        }
        let (number, tail) = rest.split_at(digits);
        let value: i64 = number.parse().map_err(|_| invalid("number out of range"))?;

        let unit_len = tail.find(|c: char| c.is_ascii_digit()).unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let part = match unit {
            "ms" => Duration::try_milliseconds(value),
            "s" => Duration::try_seconds(value),
            "m" => Duration::try_minutes(value),
            "h" => Duration::try_hours(value),
            "d" => Duration::try_days(value),
            "" => return Err(invalid("missing unit")),
            _ => return Err(invalid("unknown unit")),
        }
        .ok_or_else(|| invalid("out of range"))?;

        total = total
            .checked_add(&part)
            .ok_or_else(|| invalid("out of range"))?;
        rest = tail;
    }

    Ok(if negative { -total } else { total })
}
