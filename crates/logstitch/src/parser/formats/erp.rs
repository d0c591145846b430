use chrono::NaiveDateTime;

use crate::parser::model::ErpRecord;
use crate::parser::traits::{
    DetectionResult, FormatDetector, HeaderFields, LineClass, LogFormat, ParseError, RecordFormat,
};

/// Shape of the `YYYY-MM-DD HH:MM:SS` prefix; `9` stands for any ASCII digit
const TIMESTAMP_SHAPE: &[u8; 19] = b"9999-99-99 99:99:99";

pub struct ErpDetector;

impl FormatDetector for ErpDetector {
    fn detect(&self, sample: &[&str]) -> DetectionResult {
        super::score_sample(&ErpFormat, sample, |class| class.opens_record())
    }

    fn format(&self) -> LogFormat {
        LogFormat::Erp
    }
}

/// ERP log rules.
///
/// A header line is `YYYY-MM-DD HH:MM:SS` plus one marker character,
/// followed by `CATEGORY:message`. Everything up to the next header is
/// appended to that message.
pub struct ErpFormat;

impl RecordFormat for ErpFormat {
    type Record = ErpRecord;

    fn format(&self) -> LogFormat {
        LogFormat::Erp
    }

    fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        if line.trim().is_empty() {
            LineClass::Blank
        } else if has_timestamp_prefix(line.as_bytes()) {
            LineClass::Header(line)
        } else {
            LineClass::Continuation(line)
        }
    }

    fn open(
        &self,
        header: &str,
        line: usize,
    ) -> Result<Option<(HeaderFields, String)>, ParseError> {
        if !has_timestamp_prefix(header.as_bytes()) {
            return Err(ParseError::malformed(line, "missing `YYYY-MM-DD HH:MM:SS` prefix"));
        }
        let stamp = &header[..TIMESTAMP_SHAPE.len()];
        let instant = NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").map_err(|e| {
            ParseError::malformed(line, format!("invalid timestamp {:?}: {}", stamp, e))
        })?;

        // Skip the marker character, whatever its width
        let after_stamp = &header[TIMESTAMP_SHAPE.len()..];
        let remainder = match after_stamp.chars().next() {
            Some(marker) => &after_stamp[marker.len_utf8()..],
            None => after_stamp,
        };

        let (category, message) = remainder.split_once(':').ok_or_else(|| {
            ParseError::malformed(line, "missing `:` between category and message")
        })?;

        let fields = HeaderFields {
            date: Some(stamp[..10].to_string()),
            time: stamp[11..].to_string(),
            category: category.to_string(),
            instant,
        };
        Ok(Some((fields, message.to_string())))
    }

    fn finish(&self, fields: HeaderFields, message: String) -> ErpRecord {
        ErpRecord {
            date: fields.date.unwrap_or_default(),
            time: fields.time,
            category: fields.category,
            message,
            instant: fields.instant,
        }
    }
}

fn has_timestamp_prefix(line: &[u8]) -> bool {
    line.len() >= TIMESTAMP_SHAPE.len()
        && TIMESTAMP_SHAPE.iter().zip(line).all(|(&shape, &b)| match shape {
            b'9' => b.is_ascii_digit(),
            _ => b == shape,
        })
}
