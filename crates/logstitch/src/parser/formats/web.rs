use chrono::{NaiveDate, NaiveTime};

use crate::parser::model::WebRecord;
use crate::parser::traits::{
    DetectionResult, FormatDetector, HeaderFields, LineClass, LogFormat, ParseError, RecordFormat,
};

/// Line that opens every web log event
pub const EVENT_SENTINEL: &str = "====== EVENT ======";

/// Separator between the time, the category and the rest of a field line
const FIELD_SEPARATOR: &str = "**";

/// `HH:MM:SS ** ` is 12 bytes
const FIELD_PREFIX_LEN: usize = 12;

pub struct WebDetector;

impl FormatDetector for WebDetector {
    fn detect(&self, sample: &[&str]) -> DetectionResult {
        super::score_sample(&WebFormat, sample, |class| {
            matches!(class, LineClass::Header(_) | LineClass::Fields(_))
        })
    }

    fn format(&self) -> LogFormat {
        LogFormat::Web
    }
}

/// Web log rules.
///
/// An event is opened by a sentinel line that carries no data. Its time and
/// category arrive on a later `HH:MM:SS ** CATEGORY ** ...` line, and every
/// other non-blank line is appended to the message.
pub struct WebFormat;

impl RecordFormat for WebFormat {
    type Record = WebRecord;

    fn format(&self) -> LogFormat {
        LogFormat::Web
    }

    fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            LineClass::Blank
        } else if trimmed == EVENT_SENTINEL {
            LineClass::Header(line)
        } else if has_time_prefix(line.as_bytes()) {
            LineClass::Fields(line)
        } else {
            LineClass::Continuation(line)
        }
    }

    fn open(
        &self,
        _header: &str,
        _line: usize,
    ) -> Result<Option<(HeaderFields, String)>, ParseError> {
        Ok(None)
    }

    fn fields(&self, text: &str, line: usize) -> Result<HeaderFields, ParseError> {
        if !has_time_prefix(text.as_bytes()) {
            return Err(ParseError::malformed(line, "missing `HH:MM:SS ** ` prefix"));
        }
        // The prefix is ASCII, so both slices below land on char boundaries
        let time = &text[..8];
        let parsed = NaiveTime::parse_from_str(time, "%H:%M:%S")
            .map_err(|e| ParseError::malformed(line, format!("invalid time {:?}: {}", time, e)))?;

        let (category, rest) = text[FIELD_PREFIX_LEN..]
            .split_once(FIELD_SEPARATOR)
            .ok_or_else(|| ParseError::malformed(line, "missing `**` after category"))?;
        if !rest.trim().is_empty() {
            tracing::trace!(
                line,
                discarded = rest,
                "web: text after the category is not part of the message"
            );
        }

        Ok(HeaderFields {
            date: None,
            time: time.to_string(),
            category: category.to_string(),
            instant: NaiveDate::default().and_time(parsed),
        })
    }

    fn finish(&self, fields: HeaderFields, message: String) -> WebRecord {
        WebRecord {
            time: fields.time,
            category: fields.category,
            message,
            instant: fields.instant,
        }
    }
}

/// Matches `HH:MM:SS ** ` at the start of the line (digits only, values checked later).
fn has_time_prefix(line: &[u8]) -> bool {
    if line.len() < FIELD_PREFIX_LEN {
        return false;
    }
    let digits = [0, 1, 3, 4, 6, 7];
    digits.iter().all(|&i| line[i].is_ascii_digit())
        && line[2] == b':'
        && line[5] == b':'
        && &line[8..FIELD_PREFIX_LEN] == b" ** "
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_sentinel() {
        assert_eq!(WebFormat.classify(EVENT_SENTINEL), LineClass::Header(EVENT_SENTINEL));
        assert!(WebFormat.classify("  ====== EVENT ======\t").opens_record());
    }

    #[test]
    fn test_classify_field_line() {
        let line = "10:00:00 ** LOGIN ** user x logged in";
        assert_eq!(WebFormat.classify(line), LineClass::Fields(line));
    }

    #[test]
    fn test_classify_blank_and_continuation() {
        assert_eq!(WebFormat.classify(""), LineClass::Blank);
        assert_eq!(WebFormat.classify("   \t"), LineClass::Blank);
        assert_eq!(WebFormat.classify("stack: foo"), LineClass::Continuation("stack: foo"));
        // No `**` marker after the time means this is just message text
        assert_eq!(
            WebFormat.classify("10:00:00 started"),
            LineClass::Continuation("10:00:00 started")
        );
        assert_eq!(
            WebFormat.classify("====== EVENT ====== trailing"),
            LineClass::Continuation("====== EVENT ====== trailing")
        );
    }

    #[test]
    fn test_fields_keeps_category_trailing_space() {
        let fields = WebFormat.fields("10:00:02 ** LOGOUT ** user x logged out", 4).unwrap();
        assert_eq!(fields.time, "10:00:02");
        assert_eq!(fields.category, "LOGOUT ");
        assert_eq!(fields.date, None);
        assert_eq!(fields.instant.format("%H:%M:%S").to_string(), "10:00:02");
    }

    #[test]
    fn test_text_after_category_stays_out_of_message() {
        let fields = WebFormat.fields("10:00:00 ** LOGIN ** user x ** logged in", 2).unwrap();
        assert_eq!(fields.category, "LOGIN ");

        let lines = [
            EVENT_SENTINEL,
            "10:00:00 ** LOGIN ** user x ** logged in",
            "session opened",
        ];
        let records = crate::parser::parse_web_log(lines).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, "LOGIN ");
        assert_eq!(records[0].message, "session opened");
    }

    #[test]
    fn test_fields_missing_separator() {
        let err = WebFormat.fields("10:00:02 ** LOGOUT", 7).unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { line: 7, .. }));
    }

    #[test]
    fn test_fields_invalid_time() {
        let err = WebFormat.fields("25:61:00 ** LOGIN ** x", 3).unwrap_err();
        assert_eq!(err.line(), 3);
        assert!(err.to_string().contains("invalid time"), "{}", err);
    }

    #[test]
    fn test_detect_web_sample() {
        let sample = [
            EVENT_SENTINEL,
            "10:00:00 ** LOGIN ** user x logged in",
            "details",
            EVENT_SENTINEL,
        ];
        let result = WebDetector.detect(&sample);
        assert_eq!(result.format, LogFormat::Web);
        assert!(result.confidence > 0.8);
    }

    #[test]
    fn test_detect_no_match() {
        let result = WebDetector.detect(&["2024-01-01 10:00:00:INFO:started", "more"]);
        assert_eq!(result.format, LogFormat::Unknown);
    }
}
