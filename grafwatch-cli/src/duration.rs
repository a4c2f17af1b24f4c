use std::time::Duration;

use anyhow::{bail, Result};

/// Suffix to nanoseconds multiplier (order matters: "ms" must be tried before "m" and "s")
const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("µs", 1_000.0),
    ("us", 1_000.0),
    ("ms", 1_000_000.0),
    ("m", 60_000_000_000.0),
    ("h", 3_600_000_000_000.0),
    ("s", 1_000_000_000.0),
];

/// Parse duration strings like "10s", "500ms", "1.5m", "1h"
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.trim().parse()?;
            if !val.is_finite() || val < 0.0 {
                bail!("Duration out of range: {}", s);
            }
            return Ok(Duration::from_nanos((val * multiplier) as u64));
        }
    }

    bail!("Unknown duration format: {}", s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        let d = parse_duration("10s").unwrap();
        assert_eq!(d, Duration::from_secs(10));
    }

    #[test]
    fn test_parse_milliseconds() {
        let d = parse_duration("988.82775ms").unwrap();
        assert!((d.as_secs_f64() - 0.98882775).abs() < 0.0001);
    }

    #[test]
    fn test_parse_minutes_not_confused_with_millis() {
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("5ms").unwrap(), Duration::from_millis(5));
    }

    #[test]
    fn test_parse_hours() {
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
    }

    #[test]
    fn test_parse_microseconds() {
        assert_eq!(parse_duration("16.958µs").unwrap().as_nanos(), 16958);
        assert_eq!(parse_duration("500us").unwrap().as_nanos(), 500_000);
    }

    #[test]
    fn parse_with_whitespace() {
        let d = parse_duration("  100ms  ").unwrap();
        assert_eq!(d.as_millis(), 100);
    }

    #[test]
    fn parse_unknown_format_fails() {
        assert!(parse_duration("100x").is_err());
        assert!(parse_duration("30").is_err());
    }

    #[test]
    fn parse_negative_fails() {
        assert!(parse_duration("-5s").is_err());
    }

    #[test]
    fn parse_invalid_number_fails() {
        assert!(parse_duration("abcms").is_err());
    }
}
