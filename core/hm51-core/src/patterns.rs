//! Compiled regex patterns for parsing program rep prescriptions.
//!
//! Rep targets are authored as free-form strings: plain counts ("5"),
//! ranges ("8-10"), timed holds ("45-60s"), durations ("15min"). Volume math
//! only needs the leading count; everything after it is presentation.

use once_cell::sync::Lazy;
use regex::Regex;

pub static RE_LEADING_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+)").unwrap());

/// Parses the leading integer of a rep prescription.
///
/// Returns 0 when the string has no leading count ("max", "AMRAP"), so
/// non-numeric reps contribute nothing to volume instead of erroring.
pub fn parse_reps(reps: &str) -> u32 {
    RE_LEADING_INT
        .captures(reps)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reps_plain_count() {
        assert_eq!(parse_reps("5"), 5);
        assert_eq!(parse_reps("10"), 10);
    }

    #[test]
    fn test_parse_reps_range_takes_lower_bound() {
        assert_eq!(parse_reps("8-10"), 8);
        assert_eq!(parse_reps("15-20"), 15);
    }

    #[test]
    fn test_parse_reps_timed_hold() {
        assert_eq!(parse_reps("45-60s"), 45);
        assert_eq!(parse_reps("15min"), 15);
    }

    #[test]
    fn test_parse_reps_leading_whitespace() {
        assert_eq!(parse_reps("  12"), 12);
    }

    #[test]
    fn test_parse_reps_non_numeric_is_zero() {
        assert_eq!(parse_reps("max"), 0);
        assert_eq!(parse_reps("AMRAP"), 0);
        assert_eq!(parse_reps(""), 0);
    }

    #[test]
    fn test_parse_reps_overflow_is_zero() {
        // A count that exceeds u32 fails the parse rather than panicking.
        assert_eq!(parse_reps("99999999999999999999"), 0);
    }
}
