// 📄 HTML Renderer
// Netscape bookmark file output (the format browsers accept for import)

use crate::transform::Bookmark;

pub const DOCUMENT_TITLE: &str = "Pocket Export";
pub const FOLDER_NAME: &str = "Pocket";

/// Escape for HTML text and attribute positions.
///
/// `&` goes first so the entities added afterwards are not escaped again.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Unread bookmarks only, stable-sorted by time_added ascending
pub fn select_unread(bookmarks: &[Bookmark]) -> Vec<&Bookmark> {
    let mut selected: Vec<&Bookmark> = bookmarks.iter().filter(|b| b.is_unread()).collect();
    selected.sort_by_key(|b| b.time_added);
    selected
}

fn anchor_line(bookmark: &Bookmark) -> String {
    format!(
        "    <DT><A HREF=\"{}\" ADD_DATE=\"{}\">{}</A>",
        escape_html(&bookmark.url),
        bookmark.time_added,
        escape_html(&bookmark.title)
    )
}

/// Render already-selected bookmarks into the fixed document skeleton
pub fn render_selected(selected: &[&Bookmark]) -> String {
    let mut lines = Vec::with_capacity(selected.len() + 9);
    lines.push("<!DOCTYPE NETSCAPE-Bookmark-file-1>".to_string());
    lines.push(
        "<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">".to_string(),
    );
    lines.push(format!("<TITLE>{}</TITLE>", DOCUMENT_TITLE));
    lines.push(format!("<H1>{}</H1>", DOCUMENT_TITLE));
    lines.push("<DL><p>".to_string());
    lines.push(format!("  <DT><H3>{}</H3>", FOLDER_NAME));
    lines.push("  <DL><p>".to_string());

    lines.extend(selected.iter().map(|b| anchor_line(b)));

    lines.push("  </DL><p>".to_string());
    lines.push("</DL><p>".to_string());
    lines.join("\n")
}

/// Filter, sort, escape and emit the whole document
pub fn render_document(bookmarks: &[Bookmark]) -> String {
    render_selected(&select_unread(bookmarks))
}
