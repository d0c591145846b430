// Module structure for logstitch.

// Core
pub mod parser;

// Process wrapper
pub mod conf;
pub mod runtime;

pub use parser::{
    augment, augment_with_timing, parse_erp_log, parse_web_log, Enriched, ErpRecord, LogFormat,
    ParseError, WebRecord,
};
