use thiserror::Error;
use serde::{Serialize, Deserialize};
use chrono::NaiveDateTime;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// `====== EVENT ======` sentinels followed by `HH:MM:SS ** CATEGORY **` lines
    Web,
    /// `YYYY-MM-DD HH:MM:SS` prefixed headers with `CATEGORY:message` remainder
    Erp,
    /// Unknown/undetected format
    Unknown,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Web => "web",
            LogFormat::Erp => "erp",
            LogFormat::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetectionResult {
    pub format: LogFormat,
    /// Share of sampled non-blank lines that look like this format's
    /// record openers (0.0 - 1.0)
    pub confidence: f32,
}

impl DetectionResult {
    pub fn new(format: LogFormat, confidence: f32) -> Self {
        Self {
            format,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn no_match() -> Self {
        Self {
            format: LogFormat::Unknown,
            confidence: 0.0,
        }
    }

    pub fn is_confident(&self, threshold: f32) -> bool {
        self.format != LogFormat::Unknown && self.confidence >= threshold
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Malformed header at line {line}: {reason}")]
    MalformedHeader { line: usize, reason: String },

    #[error("Field line at line {line} has no open event")]
    OrphanFieldLine { line: usize },
}

impl ParseError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        ParseError::MalformedHeader { line, reason: reason.into() }
    }

    /// 1-based physical line the error was raised on
    pub fn line(&self) -> usize {
        match self {
            ParseError::MalformedHeader { line, .. } => *line,
            ParseError::OrphanFieldLine { line } => *line,
        }
    }
}

/// Header fields extracted from a header or field line.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderFields {
    pub date: Option<String>,
    pub time: String,
    pub category: String,
    pub instant: NaiveDateTime,
}

/// Event from a web log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebRecord {
    pub time: String,
    pub category: String,
    pub message: String,

    /// `time` on the reference day, validated at parse time
    #[serde(skip)]
    pub(crate) instant: NaiveDateTime,
}

/// Event from an ERP log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErpRecord {
    pub date: String,
    pub time: String,
    pub category: String,
    pub message: String,

    #[serde(skip)]
    pub(crate) instant: NaiveDateTime,
}

/// Per-parse line and record counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub lines: usize,
    pub blank_lines: usize,
    pub header_lines: usize,
    pub field_lines: usize,
    pub continuation_lines: usize,
    /// Non-blank lines seen before the first header; they belong to no record
    pub orphan_lines: usize,
    pub records: usize,
}

#[derive(Debug, Clone)]
pub struct ParseOutput<R> {
    pub records: Vec<R>,
    pub stats: ParseStats,
}
