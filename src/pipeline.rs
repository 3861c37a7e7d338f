// 🚚 Conversion Pipeline
// raw text → parsed records → bookmarks → HTML string → output file

use crate::error::{ConvertError, Result};
use crate::parser::parse_records;
use crate::render::{render_selected, select_unread};
use crate::transform::Transformer;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ============================================================================
// REPORT
// ============================================================================

/// ConversionReport - what one run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    /// Data rows transformed (before the status filter)
    pub records: usize,
    /// Bookmarks written to the document
    pub exported: usize,
    /// Rows whose time_added fell back to the current time
    pub time_fallbacks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl ConversionReport {
    pub fn summary(&self) -> String {
        let output = self
            .output
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "✅ Processed {} records ({} unread exported) → {}",
            self.records, self.exported, output
        )
    }
}

/// Conversion - rendered document + report, nothing written yet
#[derive(Debug, Clone)]
pub struct Conversion {
    pub html: String,
    pub report: ConversionReport,
}

// ============================================================================
// IN-MEMORY
// ============================================================================

/// Convert CSV text to a Netscape bookmark document
///
/// `now` (epoch seconds) is the fallback for rows without a usable time_added.
pub fn convert(text: &str, now: i64) -> Result<Conversion> {
    let parsed = parse_records(text)?;
    let transformer = Transformer::new(&parsed.headers, now);

    let time_fallbacks = parsed
        .records
        .iter()
        .filter(|r| transformer.uses_time_fallback(r))
        .count();
    let bookmarks = transformer.transform_all(&parsed.records);

    let selected = select_unread(&bookmarks);
    let html = render_selected(&selected);

    let report = ConversionReport {
        records: bookmarks.len(),
        exported: selected.len(),
        time_fallbacks,
        output: None,
    };
    debug!(
        records = report.records,
        exported = report.exported,
        time_fallbacks = report.time_fallbacks,
        "converted bookmarks"
    );

    Ok(Conversion { html, report })
}

// ============================================================================
// FILES
// ============================================================================

/// Best-effort removal of a leftover temp file
fn discard_temp(tmp: &Path) {
    match fs::remove_file(tmp) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %tmp.display(), error = %e, "failed to remove temp file"),
    }
}

fn temp_path_for(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bookmarks.html".to_string());
    output.with_file_name(format!(".{}.tmp", name))
}

/// Write the whole document next to `output`, then rename it into place
///
/// On failure the temp file is removed and `output` is left as it was.
pub fn write_atomic(output: &Path, contents: &str) -> Result<()> {
    let tmp = temp_path_for(output);

    if let Err(source) = fs::write(&tmp, contents) {
        discard_temp(&tmp);
        return Err(ConvertError::io(&tmp, source));
    }

    if let Err(source) = fs::rename(&tmp, output) {
        discard_temp(&tmp);
        return Err(ConvertError::io(output, source));
    }

    Ok(())
}

/// Read `input`, convert, write `output`
///
/// Nothing is written unless the whole input parsed.
pub fn convert_file(input: &Path, output: &Path) -> Result<ConversionReport> {
    info!(input = %input.display(), "reading Pocket export");
    let text = fs::read_to_string(input).map_err(|e| ConvertError::io(input, e))?;

    let Conversion { html, mut report } = convert(&text, Utc::now().timestamp())?;

    write_atomic(output, &html)?;
    info!(output = %output.display(), bytes = html.len(), "wrote bookmarks file");

    report.output = Some(output.to_path_buf());
    Ok(report)
}

// ============================================================================
// TESTS
// ============================================================================
