// 🏗️ Record Parser
// Splits a Pocket CSV export into a header row and one record per logical row.
//
// Two passes:
// 1. Row splitting: a small quote state machine walks physical lines and
//    joins lines that belong to an open quoted field.
// 2. Row decoding: every logical row is decoded on its own with the csv crate.

use crate::error::{ConvertError, Result};
use csv::{ReaderBuilder, StringRecord, Terminator};
use tracing::debug;

// ============================================================================
// CORE TYPES
// ============================================================================

/// RawRecord - One data row, fields aligned positionally to the headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based physical line the row starts on
    pub line: usize,
    pub fields: Vec<String>,
}

impl RawRecord {
    pub fn new(line: usize, fields: Vec<String>) -> Self {
        RawRecord { line, fields }
    }

    /// Field at `index`, or "" when the row is shorter
    pub fn get(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }
}

/// ParsedCsv - Output of parse_records()
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

// ============================================================================
// ROW SPLITTING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    /// Saw `"` inside a quoted field: either a close or the first half of `""`
    QuoteInQuoted,
}

impl QuoteState {
    fn step(self, c: char) -> QuoteState {
        match (self, c) {
            (QuoteState::FieldStart, '"') => QuoteState::Quoted,
            (QuoteState::FieldStart, ',') => QuoteState::FieldStart,
            (QuoteState::FieldStart, _) => QuoteState::Unquoted,
            (QuoteState::Unquoted, ',') => QuoteState::FieldStart,
            (QuoteState::Unquoted, _) => QuoteState::Unquoted,
            (QuoteState::Quoted, '"') => QuoteState::QuoteInQuoted,
            (QuoteState::Quoted, _) => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, '"') => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, ',') => QuoteState::FieldStart,
            (QuoteState::QuoteInQuoted, _) => QuoteState::Unquoted,
        }
    }
}

/// A logical row: its starting line number and raw text (may span lines)
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogicalRow {
    line: usize,
    text: String,
}

/// Split text into logical rows, joining physical lines inside quoted fields.
///
/// A trailing `\r` is dropped only where a row ends; lines continued inside a
/// quoted field keep it, so `\r\n` in a field survives. Blank lines outside
/// quotes are skipped. A quoted field still open at end of input is a
/// ParseError naming the line the row started on.
fn split_rows(text: &str) -> Result<Vec<LogicalRow>> {
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut start_line = 0;
    let mut start_content = String::new();
    let mut in_row = false;

    for (idx, raw_line) in text.split('\n').enumerate() {
        let line_number = idx + 1;
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

        if in_row {
            current.push('\n');
        } else {
            if line.is_empty() {
                continue;
            }
            start_line = line_number;
            start_content = line.to_string();
        }

        // A continued row resumes inside its quoted field
        let mut state = if in_row {
            QuoteState::Quoted
        } else {
            QuoteState::FieldStart
        };
        for c in line.chars() {
            state = state.step(c);
        }

        if state == QuoteState::Quoted {
            current.push_str(raw_line);
            in_row = true;
            continue;
        }

        current.push_str(line);
        in_row = false;
        rows.push(LogicalRow {
            line: start_line,
            text: std::mem::take(&mut current),
        });
    }

    if in_row {
        return Err(ConvertError::Parse {
            line: start_line,
            content: start_content,
        });
    }

    Ok(rows)
}

// ============================================================================
// ROW DECODING
// ============================================================================

/// Decode one logical row into its fields
///
/// Only `\n` terminates a record: a bare `\r` in an unquoted field is data.
fn decode_row(row: &LogicalRow) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(row.text.as_bytes());

    let mut record = StringRecord::new();
    let found = reader
        .read_record(&mut record)
        .map_err(|e| ConvertError::Parse {
            line: row.line,
            content: e.to_string(),
        })?;

    if !found {
        return Ok(Vec::new());
    }

    Ok(record.iter().map(str::to_string).collect())
}

// ============================================================================
// ENTRY POINT
// ============================================================================

/// Parse a full CSV export into headers + records
///
/// # Returns
/// * `Ok(ParsedCsv)` - headers from the first row, one RawRecord per later row
/// * `Err(ConvertError::Parse)` - an unterminated quoted field
///
/// Records shorter than the header row are padded with empty strings.
/// Empty input yields no headers and no records.
pub fn parse_records(text: &str) -> Result<ParsedCsv> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rows = split_rows(text)?;

    let mut rows = rows.into_iter();
    let headers = match rows.next() {
        Some(header_row) => decode_row(&header_row)?,
        None => return Ok(ParsedCsv::default()),
    };

    // Indexed by original row order
    let records = rows
        .map(|row| {
            let mut fields = decode_row(&row)?;
            if fields.len() < headers.len() {
                fields.resize(headers.len(), String::new());
            }
            Ok(RawRecord::new(row.line, fields))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        headers = headers.len(),
        records = records.len(),
        "parsed CSV export"
    );

    Ok(ParsedCsv { headers, records })
}

// ============================================================================
// TESTS
// ============================================================================
