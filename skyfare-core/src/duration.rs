//! Helpers for the simplified ISO-8601 durations (`PT[nH][nM]`) carried by offers.

use std::time::Duration;

/// Parse a `PT[nH][nM]` duration.
///
/// Lenient: an absent or unparseable hour or
/// minute segment counts as zero, so a malformed value can compare as the
/// shortest duration.
pub fn parse_iso_duration(iso: &str) -> Duration {
    let upper = iso.trim().to_ascii_uppercase();
    let mut rest = upper.strip_prefix("PT").unwrap_or(&upper);

    let mut hours_secs: u64 = 0;
    if let Some(idx) = rest.find('H') {
        hours_secs = segment_secs(&rest[..idx], 3600);
        rest = &rest[idx + 1..];
    }
    let mut minutes_secs: u64 = 0;
    if let Some(idx) = rest.find('M') {
        minutes_secs = segment_secs(&rest[..idx], 60);
    }

    Duration::from_secs(hours_secs.saturating_add(minutes_secs))
}

/// A segment that does not parse or overflows counts as zero.
fn segment_secs(raw: &str, unit: u64) -> u64 {
    raw.parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(unit))
        .unwrap_or(0)
}

/// Render a minute count as `PT{h}H{m}M`.
pub fn format_minutes(total_minutes: u64) -> String {
    format!("PT{}H{}M", total_minutes / 60, total_minutes % 60)
}

/// Convert a numeric minute string; anything unparseable becomes `PT0H0M`.
pub fn minutes_str_to_iso(minutes: &str) -> String {
    format_minutes(minutes.trim().parse::<u64>().unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mins(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    #[test]
    fn test_parse_hours_and_minutes() {
        assert_eq!(parse_iso_duration("PT3H30M"), mins(210));
        assert_eq!(parse_iso_duration("PT16H30M"), mins(990));
        assert_eq!(parse_iso_duration("PT3H0M"), mins(180));
        assert_eq!(parse_iso_duration("PT2H"), mins(120));
        assert_eq!(parse_iso_duration("PT45M"), mins(45));
        assert_eq!(parse_iso_duration("pt1h5m"), mins(65));
    }

    #[test]
    fn test_malformed_segments_count_as_zero() {
        assert_eq!(parse_iso_duration(""), mins(0));
        assert_eq!(parse_iso_duration("garbage"), mins(0));
        assert_eq!(parse_iso_duration("PTxH30M"), mins(30));
        assert_eq!(parse_iso_duration("PT2HyM"), mins(120));
        assert_eq!(parse_iso_duration("PT999999999999999999H"), mins(0));
        assert_eq!(parse_iso_duration("PT999999999999999999H15M"), mins(15));
        assert_eq!(parse_iso_duration("PT2H99999999999999999999M"), mins(120));
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "PT0H0M");
        assert_eq!(format_minutes(59), "PT0H59M");
        assert_eq!(format_minutes(125), "PT2H5M");
        assert_eq!(minutes_str_to_iso("330"), "PT5H30M");
        assert_eq!(minutes_str_to_iso("abc"), "PT0H0M");
        assert_eq!(minutes_str_to_iso(""), "PT0H0M");
    }
}
