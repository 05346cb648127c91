// Since-duration handling for log tailing.
// Formats durations in the compact form `aws logs tail --since` expects and parses CLI input.

use std::time::Duration;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Format a look-back window as `1d`, `2h`, `90m`, or `45s`.
///
/// Picks the largest unit that divides the duration evenly. Sub-second parts
/// are dropped, and a window that rounds to zero seconds yields `None` so the
/// flag can be omitted.
pub fn format_since(since: Duration) -> Option<String> {
    let secs = since.as_secs();
    if secs == 0 {
        return None;
    }

    let formatted = if secs % DAY == 0 {
        format!("{}d", secs / DAY)
    } else if secs % HOUR == 0 {
        format!("{}h", secs / HOUR)
    } else if secs % MINUTE == 0 {
        format!("{}m", secs / MINUTE)
    } else {
        format!("{}s", secs)
    };
    Some(formatted)
}

/// Parse a duration such as `45s`, `10m`, `1h30m`, `2d`, or `0`.
///
/// The grammar is whole numbers with `d`, `h`, `m`, or `s` units, the same
/// units `format_since` emits. It is not Go's `time.ParseDuration`: days are
/// accepted, while fractions (`1.5h`) and sub-second units (`500ms`) are
/// rejected since `aws logs tail` has no use for them.
///
/// Used as a clap value parser, hence the `String` error.
pub fn parse_since(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input == "0" {
        return Ok(Duration::ZERO);
    }
    if input.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total: u64 = 0;
    let mut digits = String::new();
    for c in input.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let unit = match c {
            'd' => DAY,
            'h' => HOUR,
            'm' => MINUTE,
            's' => 1,
            _ => return Err(format!("invalid unit '{}' in duration '{}'", c, input)),
        };
        if digits.is_empty() {
            return Err(format!("missing number before '{}' in duration '{}'", c, input));
        }

        let value: u64 = digits
            .parse()
            .map_err(|_| format!("duration '{}' is too large", input))?;
        total = value
            .checked_mul(unit)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(|| format!("duration '{}' is too large", input))?;
        digits.clear();
    }

    if !digits.is_empty() {
        return Err(format!(
            "missing unit in duration '{}' (use d, h, m, or s)",
            input
        ));
    }

    Ok(Duration::from_secs(total))
}
