//! Display helpers for dashboard tables

use chrono::{DateTime, Utc};

/// Format a timestamp the way the ticket tables show it: `dd/mm/yyyy hh:mm`
#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%d/%m/%Y %H:%M").to_string()
}

/// Parse an RFC 3339 timestamp and format it with [`format_date`]
///
/// Returns `None` when the input is not a valid timestamp.
#[must_use]
pub fn format_date_str(date: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(date.trim())
        .ok()
        .map(|parsed| format_date(&parsed.with_timezone(&Utc)))
}

/// Entity replacement for a character, if it needs escaping
const fn entity(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        '/' => Some("&#x2F;"),
        '`' => Some("&#x60;"),
        '=' => Some("&#x3D;"),
        _ => None,
    }
}

/// Escape user-supplied text before it is placed into markup
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match entity(c) {
            Some(replacement) => escaped.push_str(replacement),
            None => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 0).unwrap();
        assert_eq!(format_date(&date), "05/03/2024 09:07");
    }

    #[test]
    fn test_format_date_str() {
        assert_eq!(
            format_date_str("2023-12-25T23:59:59Z").as_deref(),
            Some("25/12/2023 23:59")
        );
        assert_eq!(
            format_date_str("2023-12-25T21:00:00-03:00").as_deref(),
            Some("26/12/2023 00:00")
        );
        assert_eq!(format_date_str("yesterday"), None);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="/x">Tom & 'Jerry'</a>"#),
            "&lt;a href&#x3D;&quot;&#x2F;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;&#x2F;a&gt;"
        );
        assert_eq!(escape_html("`cmd`"), "&#x60;cmd&#x60;");
        assert_eq!(escape_html("Escola São João"), "Escola São João");
        assert_eq!(escape_html(""), "");
    }

    proptest! {
        #[test]
        fn test_escaped_output_has_no_markup(input in "\\PC*") {
            let escaped = escape_html(&input);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
            prop_assert!(!escaped.contains('"'));
        }

        #[test]
        fn test_plain_text_unchanged(input in "[a-zA-Z0-9 ,.]*") {
            prop_assert_eq!(escape_html(&input), input);
        }
    }
}
