use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339).ok()
}

/// Whole seconds from `start` to `end`, rounded toward negative infinity.
/// Returns `None` if either timestamp is not valid RFC 3339.
pub fn elapsed_secs(start: &str, end: &str) -> Option<i64> {
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    let millis = (end - start).whole_milliseconds();
    i64::try_from(millis.div_euclid(1000)).ok()
}

/// Format a duration in seconds as minutes and seconds, e.g. `3m 45s`.
pub fn format_duration(seconds: i64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}
