pub use super::model::{
    DetectionResult, HeaderFields, LogFormat, ParseError
};

/// Role of a single physical line, decided without looking at its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Opens a new record. Formats with inline header fields extract them from this text.
    Header(&'a str),
    /// Supplies header fields for the record already open.
    Fields(&'a str),
    Continuation(&'a str),
    Blank,
}

impl LineClass<'_> {
    pub fn opens_record(&self) -> bool {
        matches!(self, LineClass::Header(_))
    }
}

pub trait FormatDetector {
    fn detect(&self, sample: &[&str]) -> DetectionResult;
    fn format(&self) -> LogFormat;
}

/// Recognition and field-extraction rules for one log format.
pub trait RecordFormat {
    type Record;

    fn format(&self) -> LogFormat;

    /// classify one raw line
    fn classify<'a>(&self, line: &'a str) -> LineClass<'a>;

    /// Fields carried by a header line, plus the message text that follows them.
    /// `None` when the format defers fields to a separate line.
    fn open(&self, header: &str, line: usize)
        -> Result<Option<(HeaderFields, String)>, ParseError>;

    /// Fields carried by a field line.
    fn fields(&self, _text: &str, line: usize) -> Result<HeaderFields, ParseError> {
        Err(ParseError::malformed(
            line,
            format!("{} logs have no field lines", self.format().as_str()),
        ))
    }

    fn finish(&self, fields: HeaderFields, message: String) -> Self::Record;
}
