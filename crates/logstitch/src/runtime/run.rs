//! Run — read the input, resolve its format, parse, and write records as JSON.

use std::io::{BufWriter, Write};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::conf::StitchConfig;
use crate::parser::formats::{ErpFormat, WebFormat};
use crate::parser::{
    augment, FormatDetectorOrchestrator, LogFormat, ParseOutput, ParseStats, RecordBuilder,
    RecordFormat, Timed,
};

/// Stitch the configured input file and write the records to stdout.
pub fn run(config: &StitchConfig) -> Result<(), Box<dyn std::error::Error>> {
    let path = config
        .input_path
        .as_deref()
        .ok_or("input_path is not configured")?;

    let text = std::fs::read_to_string(path).map_err(|e| {
        error!("Failed to read {}: {}", path, e);
        e
    })?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let stats = stitch(config, &text, &mut out)?;
    out.flush()?;

    info!(
        lines = stats.lines,
        blank = stats.blank_lines,
        orphans = stats.orphan_lines,
        "Stitched {} records from {}",
        stats.records,
        path
    );
    Ok(())
}

/// Parse a whole log held in memory and write its records to `out`.
pub fn stitch<W: Write>(
    config: &StitchConfig,
    text: &str,
    out: &mut W,
) -> Result<ParseStats, Box<dyn std::error::Error>> {
    let lines: Vec<&str> = text.lines().collect();

    match resolve_format(config, &lines)? {
        LogFormat::Web => emit(RecordBuilder::new(WebFormat), &lines, config, out),
        LogFormat::Erp => emit(RecordBuilder::new(ErpFormat), &lines, config, out),
        LogFormat::Unknown => Err("log format is unknown".into()),
    }
}

/// The configured format, or the detected one when set to auto.
pub fn resolve_format(
    config: &StitchConfig,
    lines: &[&str],
) -> Result<LogFormat, Box<dyn std::error::Error>> {
    if let Some(format) = config.format.fixed() {
        return Ok(format);
    }

    let result = FormatDetectorOrchestrator::new().detect_head(lines, config.detection.sample_size);
    if !result.is_confident(config.detection.min_confidence) {
        return Err(format!(
            "could not detect log format: best guess {} at {:.2} confidence",
            result.format.as_str(),
            result.confidence
        )
        .into());
    }

    info!(
        "Detected {} log (confidence {:.2})",
        result.format.as_str(),
        result.confidence
    );
    Ok(result.format)
}

fn emit<F, W>(
    builder: RecordBuilder<F>,
    lines: &[&str],
    config: &StitchConfig,
    out: &mut W,
) -> Result<ParseStats, Box<dyn std::error::Error>>
where
    F: RecordFormat,
    F::Record: Timed + Serialize,
    W: Write,
{
    let ParseOutput { records, stats } = builder.parse(lines)?;
    if stats.orphan_lines > 0 {
        warn!("Skipped {} lines before the first record", stats.orphan_lines);
    }

    if config.timing {
        write_records(&augment(records), config.pretty, out)?;
    } else {
        write_records(&records, config.pretty, out)?;
    }
    Ok(stats)
}

fn write_records<T: Serialize, W: Write>(
    records: &[T],
    pretty: bool,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, records)?;
        writeln!(out)?;
    } else {
        for record in records {
            serde_json::to_writer(&mut *out, record)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
