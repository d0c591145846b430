//! Model — StitchConfig and related structs.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::parser::{LogFormat, DETECTION_SAMPLE_SIZE, MIN_DETECTION_CONFIDENCE};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    pub format: FormatChoice,
    pub input_path: Option<String>,
    /// Attach elapsed/accumulated seconds to every record
    pub timing: bool,
    /// One pretty-printed JSON array instead of JSON lines
    pub pretty: bool,
    pub detection: DetectionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatChoice {
    /// Sniff the format from the head of the input
    #[default]
    Auto,
    Web,
    Erp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub sample_size: usize,
    pub min_confidence: f32,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            format: FormatChoice::Auto,
            input_path: None,
            timing: true,
            pretty: false,
            detection: DetectionConfig::default(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sample_size: DETECTION_SAMPLE_SIZE,
            min_confidence: MIN_DETECTION_CONFIDENCE,
        }
    }
}

impl FormatChoice {
    /// The fixed format, if one was chosen
    pub fn fixed(&self) -> Option<LogFormat> {
        match self {
            FormatChoice::Auto => None,
            FormatChoice::Web => Some(LogFormat::Web),
            FormatChoice::Erp => Some(LogFormat::Erp),
        }
    }
}

impl FromStr for FormatChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(FormatChoice::Auto),
            "web" => Ok(FormatChoice::Web),
            "erp" => Ok(FormatChoice::Erp),
            other => Err(format!("unknown log format {:?} (expected auto, web or erp)", other)),
        }
    }
}

impl StitchConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        match self.input_path.as_deref() {
            None | Some("") => return Err("input_path is not configured".to_string()),
            Some(_) => {}
        }
        self.detection.validate()
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_size == 0 {
            return Err("detection.sample_size must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(format!(
                "detection.min_confidence must be within 0.0..=1.0, got {}",
                self.min_confidence
            ));
        }
        Ok(())
    }
}
