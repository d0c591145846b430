/// Log format rules and detectors

pub mod erp;
pub mod web;

pub use erp::{ErpDetector, ErpFormat};
pub use web::{WebDetector, WebFormat, EVENT_SENTINEL};

use super::traits::{DetectionResult, LineClass, RecordFormat};

/// Score a sample by the share of non-blank lines that are this format's markers.
/// Any marker at all gives at least 0.5; a sample made only of markers gives 1.0.
pub(crate) fn score_sample<F: RecordFormat>(
    format: &F,
    sample: &[&str],
    is_marker: impl Fn(&LineClass<'_>) -> bool,
) -> DetectionResult {
    let mut non_blank = 0usize;
    let mut markers = 0usize;

    for line in sample {
        let class = format.classify(line);
        if class == LineClass::Blank {
            continue;
        }
        non_blank += 1;
        if is_marker(&class) {
            markers += 1;
        }
    }

    if markers == 0 {
        return DetectionResult::no_match();
    }

    let ratio = markers as f32 / non_blank as f32;
    DetectionResult::new(format.format(), 0.5 + 0.5 * ratio)
}
