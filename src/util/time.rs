//! Timestamp parsing and display for post metadata.
//!
//! The service sends ISO-8601 local timestamps, sometimes with fractional
//! seconds and sometimes with an offset. Anything unparseable is shown as-is.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }
    let local = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let fractional =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
    PrimitiveDateTime::parse(raw, local)
        .or_else(|_| PrimitiveDateTime::parse(raw, fractional))
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

/// Long form date, e.g. `May 1, 2024`.
pub fn format_timestamp(raw: &str) -> String {
    let long = format_description!("[month repr:long] [day padding:none], [year]");
    parse_timestamp(raw)
        .and_then(|at| at.format(long).ok())
        .unwrap_or_else(|| raw.to_string())
}

fn short_date(at: OffsetDateTime) -> Option<String> {
    let short = format_description!("[month repr:short] [day padding:none], [year]");
    at.format(short).ok()
}

/// Age of `raw` relative to `now`; older than a week falls back to a short date.
pub fn relative_time(raw: &str, now: OffsetDateTime) -> String {
    let Some(at) = parse_timestamp(raw) else {
        return raw.to_string();
    };
    let seconds = (now - at).whole_seconds();
    match seconds {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 7 * 86_400 => format!("{}d ago", s / 86_400),
        _ => short_date(at).unwrap_or_else(|| raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_local_and_offset_forms() {
        assert_eq!(
            parse_timestamp("2024-05-01T10:00:00"),
            Some(datetime!(2024-05-01 10:00:00 UTC))
        );
        assert_eq!(
            parse_timestamp("2024-05-01T10:00:00.123456"),
            Some(datetime!(2024-05-01 10:00:00.123456 UTC))
        );
        assert_eq!(
            parse_timestamp("2024-05-01T12:00:00+02:00"),
            Some(datetime!(2024-05-01 10:00:00 UTC))
        );
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn formats_long_date_or_passes_through() {
        assert_eq!(format_timestamp("2024-12-25T08:00:00"), "December 25, 2024");
        assert_eq!(format_timestamp("not a date"), "not a date");
    }

    #[test]
    fn relative_buckets() {
        let now = datetime!(2024-05-10 12:00:00 UTC);
        assert_eq!(relative_time("2024-05-10T11:59:30", now), "just now");
        assert_eq!(relative_time("2024-05-10T11:15:00", now), "45m ago");
        assert_eq!(relative_time("2024-05-10T07:00:00", now), "5h ago");
        assert_eq!(relative_time("2024-05-08T12:00:00", now), "2d ago");
        assert_eq!(relative_time("2024-04-01T12:00:00", now), "Apr 1, 2024");
    }
}
