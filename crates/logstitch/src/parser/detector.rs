use super::traits::*;
use super::formats::*;

/// Picks the log format of a sample by running every detector over it
/// and keeping the most confident answer.
pub struct FormatDetectorOrchestrator {
    detectors: Vec<Box<dyn FormatDetector>>,
}

impl FormatDetectorOrchestrator {
    pub fn new() -> Self {
        let detectors: Vec<Box<dyn FormatDetector>> = vec![
            Box::new(ErpDetector),
            Box::new(WebDetector),
        ];

        Self { detectors }
    }

    /// Detect from the first `sample_size` lines of `lines`.
    pub fn detect_head<S: AsRef<str>>(&self, lines: &[S], sample_size: usize) -> DetectionResult {
        let sample: Vec<&str> = lines
            .iter()
            .take(sample_size)
            .map(|line| line.as_ref())
            .collect();
        self.detect(&sample)
    }

    pub fn detect(&self, sample: &[&str]) -> DetectionResult {
        let mut best_result = DetectionResult::no_match();

        for detector in &self.detectors {
            let result = detector.detect(sample);
            tracing::trace!(
                format = detector.format().as_str(),
                confidence = result.confidence,
                "detect: candidate"
            );

            if result.confidence > best_result.confidence {
                best_result = result;
            }
        }

        best_result
    }
}

impl Default for FormatDetectorOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_erp() {
        let orchestrator = FormatDetectorOrchestrator::new();
        let sample = [
            "2024-01-01 10:00:00:INFO:started",
            "more text",
            "2024-01-01 10:00:05:INFO:finished",
        ];

        let result = orchestrator.detect(&sample);
        assert_eq!(result.format, LogFormat::Erp);
        assert!(result.is_confident(0.5));
    }

    #[test]
    fn test_detect_web() {
        let orchestrator = FormatDetectorOrchestrator::new();
        let sample = [
            EVENT_SENTINEL,
            "10:00:00 ** LOGIN ** user x logged in",
            EVENT_SENTINEL,
            "10:00:02 ** LOGOUT ** user x logged out",
        ];

        let result = orchestrator.detect(&sample);
        assert_eq!(result.format, LogFormat::Web);
    }

    #[test]
    fn test_detect_plain_text_is_unknown() {
        let orchestrator = FormatDetectorOrchestrator::new();
        let result = orchestrator.detect(&["Just some plain text", "and another line"]);
        assert_eq!(result.format, LogFormat::Unknown);
        assert!(!result.is_confident(0.0));
    }

    #[test]
    fn test_detect_empty_and_blank() {
        let orchestrator = FormatDetectorOrchestrator::new();
        assert_eq!(orchestrator.detect(&[]).format, LogFormat::Unknown);
        assert_eq!(orchestrator.detect(&["", "  "]).format, LogFormat::Unknown);
    }

    #[test]
    fn test_detect_head_limits_sample() {
        let orchestrator = FormatDetectorOrchestrator::new();
        let lines: Vec<String> = vec![
            "banner".to_string(),
            "banner".to_string(),
            "2024-01-01 10:00:00:INFO:x".to_string(),
        ];

        assert_eq!(orchestrator.detect_head(&lines, 2).format, LogFormat::Unknown);
        assert_eq!(orchestrator.detect_head(&lines, 3).format, LogFormat::Erp);
    }
}
