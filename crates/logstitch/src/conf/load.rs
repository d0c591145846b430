//! Load — config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::{DetectionConfig, FormatChoice, StitchConfig};

const DEFAULT_CONFIG_FILE: &str = "logstitch.toml";

impl StitchConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("LOGSTITCH_CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::debug!(
                "Config file not found at {}, using environment variables",
                config_path
            );
            Self::from_env()?
        };

        // Environment variables override file config
        if let Ok(format) = std::env::var("LOGSTITCH_FORMAT") {
            config.format = format.parse()?;
        }
        if let Ok(input) = std::env::var("LOGSTITCH_INPUT") {
            config.input_path = Some(input);
        }
        if let Some(timing) = env_flag("LOGSTITCH_TIMING") {
            config.timing = timing;
        }
        if let Some(pretty) = env_flag("LOGSTITCH_PRETTY") {
            config.pretty = pretty;
        }
        config.detection.apply_env();

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: StitchConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Result<Self, String> {
        let format: FormatChoice = match std::env::var("LOGSTITCH_FORMAT") {
            Ok(s) => s.parse()?,
            Err(_) => Default::default(),
        };

        Ok(Self {
            format,
            input_path: std::env::var("LOGSTITCH_INPUT").ok(),
            timing: env_flag("LOGSTITCH_TIMING").unwrap_or(true),
            pretty: env_flag("LOGSTITCH_PRETTY").unwrap_or(false),
            detection: DetectionConfig::from_env(),
        })
    }
}

impl DetectionConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields whose environment variable is set and parses
    pub fn apply_env(&mut self) {
        if let Some(size) = env_parse("LOGSTITCH_DETECTION_SAMPLE_SIZE") {
            self.sample_size = size;
        }
        if let Some(confidence) = env_parse("LOGSTITCH_DETECTION_MIN_CONFIDENCE") {
            self.min_confidence = confidence;
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

fn env_flag(name: &str) -> Option<bool> {
    env_parse(name)
}
