/// Log record reconstruction
///
/// Turns the physical lines of a web or ERP log into one record per event,
/// then attaches timing metrics.
///
/// # Architecture
///
/// - `traits.rs`: line classes plus the format and detector traits
/// - `formats/`: per-format line classification and field extraction
/// - `builder.rs`: the record state machine shared by both formats
/// - `timing.rs`: elapsed/accumulated seconds over a parsed log
/// - `detector.rs`: format detection from a sample of lines

pub mod traits;
pub mod detector;
pub mod builder;
pub mod timing;
pub mod formats;
pub mod model;

// Re-export commonly used types
pub use builder::{parse_erp_log, parse_web_log, RecordBuilder};
pub use detector::FormatDetectorOrchestrator;
pub use model::{ErpRecord, LogFormat, ParseError, ParseOutput, ParseStats, WebRecord};
pub use timing::{augment, augment_with_timing, Enriched, Timed};
pub use traits::{LineClass, RecordFormat};

// Constants
pub const DETECTION_SAMPLE_SIZE: usize = 20; // Lines to sample for detection
pub const MIN_DETECTION_CONFIDENCE: f32 = 0.5;
