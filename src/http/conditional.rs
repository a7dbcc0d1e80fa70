//! Conditional request support
//!
//! `Last-Modified` formatting and `If-Modified-Since` evaluation. Times are
//! compared at whole-second precision, the resolution of an HTTP-date.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::time::SystemTime;

const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
const RFC850_DATE: &str = "%A, %d-%b-%y %H:%M:%S GMT";
const ASCTIME_DATE: &str = "%a %b %e %H:%M:%S %Y";

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(IMF_FIXDATE).to_string()
}

/// Parse any of the three HTTP-date forms
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    [RFC850_DATE, ASCTIME_DATE]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Whether a GET for a file last modified at `modified` can be answered
/// with 304
///
/// `If-None-Match` takes precedence over `If-Modified-Since`; since no
/// entity tags are issued, its presence disables the date check.
pub fn is_not_modified(
    modified: SystemTime,
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
) -> bool {
    if has_if_none_match {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    // Sun, 06 Nov 1994 08:49:37 GMT
    fn reference_time() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(784_111_777)
    }

    #[test]
    fn test_format_http_date() {
        assert_eq!(
            format_http_date(reference_time()),
            "Sun, 06 Nov 1994 08:49:37 GMT"
        );
    }

    #[test]
    fn test_parse_all_forms() {
        let expected = DateTime::<Utc>::from(reference_time());
        assert_eq!(
            parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT"),
            Some(expected)
        );
        assert_eq!(
            parse_http_date("Sunday, 06-Nov-94 08:49:37 GMT"),
            Some(expected)
        );
        assert_eq!(parse_http_date("Sun Nov  6 08:49:37 1994"), Some(expected));
        assert_eq!(parse_http_date("yesterday"), None);
    }

    #[test]
    fn test_not_modified() {
        let mtime = reference_time() + Duration::from_millis(400);
        // Sub-second part of mtime is ignored
        assert!(is_not_modified(
            mtime,
            Some("Sun, 06 Nov 1994 08:49:37 GMT"),
            false
        ));
        assert!(is_not_modified(
            mtime,
            Some("Mon, 07 Nov 1994 00:00:00 GMT"),
            false
        ));
        assert!(!is_not_modified(
            mtime,
            Some("Sun, 06 Nov 1994 08:49:36 GMT"),
            false
        ));
    }

    #[test]
    fn test_not_modified_ignored_cases() {
        let mtime = reference_time();
        assert!(!is_not_modified(mtime, None, false));
        assert!(!is_not_modified(mtime, Some("garbage"), false));
        assert!(!is_not_modified(
            mtime,
            Some("Sun, 06 Nov 1994 08:49:37 GMT"),
            true
        ));
    }
}
