use anyhow::{bail, Result};

const SECONDS_PER_DAY: i64 = 86_400;

/// Textual encodings observed in tracker exports besides strict RFC 3339:
/// a naive UTC variant and the ctime-like shape emitted by GNU/BSD `date`.
const FALLBACK_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S %z",
    "%a %b %e %H:%M:%S %Y",
];

/// Parse a tracker-supplied timestamp into Unix epoch seconds.
///
/// Tries RFC 3339 first, then each fallback format in order, interpreting
/// offset-free encodings as UTC. An unparseable value is an error, never a
/// silent epoch-zero.
pub fn parse_tracker_timestamp(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("empty tracker timestamp");
    }
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.timestamp());
    }
    for format in FALLBACK_FORMATS {
        if let Ok(parsed) = chrono::DateTime::parse_from_str(trimmed, format) {
            return Ok(parsed.timestamp());
        }
        if let Ok(parsed) = chrono::NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed.and_utc().timestamp());
        }
    }
    bail!("unparseable tracker timestamp '{trimmed}'");
}

/// Whole days elapsed between two instants, floored, clamped at zero.
pub fn age_days(now_unix: i64, then_unix: i64) -> u64 {
    let elapsed = now_unix.saturating_sub(then_unix).max(0);
    (elapsed / SECONDS_PER_DAY) as u64
}

/// Returns the current Unix timestamp in seconds.
pub fn current_unix_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .try_into()
        .unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::{age_days, current_unix_timestamp, parse_tracker_timestamp};

    #[test]
    fn unit_parse_tracker_timestamp_accepts_rfc3339_variants() {
        assert_eq!(
            parse_tracker_timestamp("1970-01-01T00:00:10Z").expect("rfc3339"),
            10
        );
        assert_eq!(
            parse_tracker_timestamp("1970-01-01T01:00:10+01:00").expect("offset"),
            10
        );
    }

    #[test]
    fn functional_parse_tracker_timestamp_accepts_fallback_formats() {
        assert_eq!(
            parse_tracker_timestamp("1970-01-01T00:00:10").expect("naive iso"),
            10
        );
        assert_eq!(
            parse_tracker_timestamp("1970-01-01 00:00:10 +0000").expect("spaced"),
            10
        );
        assert_eq!(
            parse_tracker_timestamp("Thu Jan  1 00:00:10 1970").expect("ctime"),
            10
        );
    }

    #[test]
    fn regression_parse_tracker_timestamp_rejects_empty_and_garbage() {
        let empty = parse_tracker_timestamp("   ").expect_err("empty should fail");
        assert!(empty.to_string().contains("empty tracker timestamp"));

        let garbage = parse_tracker_timestamp("not-a-date").expect_err("garbage should fail");
        assert!(garbage.to_string().contains("not-a-date"));
    }

    #[test]
    fn unit_age_days_floors_and_clamps() {
        assert_eq!(age_days(86_400, 0), 1);
        assert_eq!(age_days(86_399, 0), 0);
        assert_eq!(age_days(21 * 86_400, 0), 21);
        assert_eq!(age_days(0, 86_400), 0);
    }

    #[test]
    fn unit_current_unix_timestamp_is_past_2020() {
        assert!(current_unix_timestamp() > 1_577_836_800);
    }
}
