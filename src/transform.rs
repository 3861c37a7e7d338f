// 🔄 Bookmark Transformer
// Maps raw Pocket rows (keyed by header name) into normalized Bookmarks.

use crate::parser::RawRecord;
use std::collections::HashMap;
use tracing::debug;

// ============================================================================
// POCKET HEADERS
// ============================================================================

pub const TITLE_HEADER: &str = "title";
pub const URL_HEADER: &str = "url";
pub const TIME_ADDED_HEADER: &str = "time_added";
pub const STATUS_HEADER: &str = "status";

// ============================================================================
// BOOKMARK
// ============================================================================

/// Bookmark - Normalized entry, created once per data row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub title: String,
    pub url: String,
    /// Seconds since epoch
    pub time_added: i64,
    pub status: String,
}

impl Bookmark {
    pub const UNREAD: &'static str = "unread";

    pub fn is_unread(&self) -> bool {
        self.status == Self::UNREAD
    }
}

// ============================================================================
// HEADER INDEX
// ============================================================================

/// HeaderIndex - header name → column position, built once per file
///
/// Lookup is case-sensitive. If a header repeats, the first column wins.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    columns: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(headers: &[String]) -> Self {
        let mut columns = HashMap::with_capacity(headers.len());
        for (index, name) in headers.iter().enumerate() {
            columns.entry(name.clone()).or_insert(index);
        }
        HeaderIndex { columns }
    }

    pub fn position(&self, header: &str) -> Option<usize> {
        self.columns.get(header).copied()
    }

    /// Field for `header` in `record`, None if the header is absent from the file
    pub fn field<'r>(&self, record: &'r RawRecord, header: &str) -> Option<&'r str> {
        self.position(header).map(|index| record.get(index))
    }
}

// ============================================================================
// DEFAULT RESOLUTION
// ============================================================================

/// Title precedence: non-empty title, then url
pub fn resolve_title(title: &str, url: &str) -> String {
    if title.is_empty() {
        url.to_string()
    } else {
        title.to_string()
    }
}

/// Read a leading base-10 integer the way Pocket timestamps are written
///
/// Leading whitespace and a sign are accepted, anything after the digits is
/// ignored ("1700000000.5" → 1700000000). None when there are no digits or
/// the value overflows i64.
pub fn parse_leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// time_added precedence: a positive leading integer, then `now`
///
/// Zero, negative, missing and unparsable values all resolve to `now`, which
/// moves such bookmarks to the end of the export.
pub fn resolve_time_added(raw: Option<&str>, now: i64) -> i64 {
    raw.and_then(parse_leading_integer)
        .filter(|secs| *secs > 0)
        .unwrap_or(now)
}

// ============================================================================
// TRANSFORMER
// ============================================================================

/// Transformer - header index + the run's wall-clock time
#[derive(Debug, Clone)]
pub struct Transformer {
    index: HeaderIndex,
    now: i64,
}

impl Transformer {
    /// `now` is captured once so every fallback in a run shares one timestamp
    pub fn new(headers: &[String], now: i64) -> Self {
        Transformer {
            index: HeaderIndex::new(headers),
            now,
        }
    }

    /// Whether the record's time_added would fall back to `now`
    pub fn uses_time_fallback(&self, record: &RawRecord) -> bool {
        let raw = self.index.field(record, TIME_ADDED_HEADER);
        !matches!(raw.and_then(parse_leading_integer), Some(secs) if secs > 0)
    }

    pub fn transform(&self, record: &RawRecord) -> Bookmark {
        let url = self.index.field(record, URL_HEADER).unwrap_or("");
        let title = self.index.field(record, TITLE_HEADER).unwrap_or("");
        let raw_time = self.index.field(record, TIME_ADDED_HEADER);
        let status = self.index.field(record, STATUS_HEADER).unwrap_or("");

        if self.uses_time_fallback(record) {
            debug!(
                line = record.line,
                raw = raw_time.unwrap_or(""),
                "time_added missing or unparsable, using current time"
            );
        }

        Bookmark {
            title: resolve_title(title, url),
            url: url.to_string(),
            time_added: resolve_time_added(raw_time, self.now),
            status: status.to_string(),
        }
    }

    pub fn transform_all(&self, records: &[RawRecord]) -> Vec<Bookmark> {
        records.iter().map(|r| self.transform(r)).collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn record(fields: &[&str]) -> RawRecord {
        RawRecord::new(2, fields.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_transform_full_row() {
        let t = Transformer::new(&headers(&["title", "url", "time_added", "status"]), NOW);
        let bm = t.transform(&record(&["A", "http://a.example", "100", "unread"]));

        assert_eq!(bm.title, "A");
        assert_eq!(bm.url, "http://a.example");
        assert_eq!(bm.time_added, 100);
        assert_eq!(bm.status, "unread");
        assert!(bm.is_unread());
    }

    #[test]
    fn test_transform_reordered_headers() {
        let t = Transformer::new(&headers(&["status", "time_added", "url", "title"]), NOW);
        let bm = t.transform(&record(&["archive", "42", "http://r.example", "R"]));

        assert_eq!(bm.title, "R");
        assert_eq!(bm.url, "http://r.example");
        assert_eq!(bm.time_added, 42);
        assert_eq!(bm.status, "archive");
    }

    #[test]
    fn test_transform_title_falls_back_to_url() {
        let t = Transformer::new(&headers(&["title", "url", "time_added", "status"]), NOW);
        let bm = t.transform(&record(&["", "http://x.example", "5", "unread"]));
        assert_eq!(bm.title, "http://x.example");
    }

    #[test]
    fn test_transform_missing_title_column() {
        let t = Transformer::new(&headers(&["url", "status"]), NOW);
        let bm = t.transform(&record(&["http://x.example", "unread"]));
        assert_eq!(bm.title, "http://x.example");
        assert_eq!(bm.time_added, NOW);
    }

    #[test]
    fn test_transform_ignores_unknown_headers() {
        let t = Transformer::new(&headers(&["tags", "url", "title"]), NOW);
        let bm = t.transform(&record(&["rust|cli", "http://x.example", "X"]));
        assert_eq!(bm.title, "X");
        assert_eq!(bm.status, "");
    }

    #[test]
    fn test_transform_time_fallbacks() {
        let t = Transformer::new(&headers(&["url", "time_added"]), NOW);
        assert_eq!(t.transform(&record(&["u", "abc"])).time_added, NOW);
        assert_eq!(t.transform(&record(&["u", ""])).time_added, NOW);
        assert_eq!(t.transform(&record(&["u", "0"])).time_added, NOW);
        assert!(t.uses_time_fallback(&record(&["u", "abc"])));
        assert!(!t.uses_time_fallback(&record(&["u", "17"])));
    }

    #[test]
    fn test_duplicate_header_first_wins() {
        let index = HeaderIndex::new(&headers(&["url", "title", "url"]));
        assert_eq!(index.position("url"), Some(0));
        assert_eq!(index.position("missing"), None);
    }

    #[test]
    fn test_header_lookup_case_sensitive() {
        let index = HeaderIndex::new(&headers(&["Title"]));
        assert_eq!(index.position("title"), None);
    }

    #[test]
    fn test_parse_leading_integer() {
        assert_eq!(parse_leading_integer("1700000000"), Some(1_700_000_000));
        assert_eq!(parse_leading_integer("  12"), Some(12));
        assert_eq!(parse_leading_integer("1.9"), Some(1));
        assert_eq!(parse_leading_integer("99abc"), Some(99));
        assert_eq!(parse_leading_integer("-5"), Some(-5));
        assert_eq!(parse_leading_integer("abc"), None);
        assert_eq!(parse_leading_integer("-"), None);
        assert_eq!(parse_leading_integer("99999999999999999999"), None);
    }

    #[test]
    fn test_resolve_time_added_rejects_negative() {
        assert_eq!(resolve_time_added(Some("-5"), NOW), NOW);
        assert_eq!(resolve_time_added(None, NOW), NOW);
        assert_eq!(resolve_time_added(Some("50"), NOW), 50);
    }

    #[test]
    fn test_resolve_title() {
        assert_eq!(resolve_title("T", "u"), "T");
        assert_eq!(resolve_title("", "u"), "u");
        assert_eq!(resolve_title("", ""), "");
    }

    #[test]
    fn test_transform_all_keeps_count_and_order() {
        let t = Transformer::new(&headers(&["url", "time_added"]), NOW);
        let records = vec![record(&["a", "3"]), record(&["b", "1"]), record(&["c", "2"])];
        let bookmarks = t.transform_all(&records);
        assert_eq!(bookmarks.len(), 3);
        let urls: Vec<&str> = bookmarks.iter().map(|b| b.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "b", "c"]);
    }
}
