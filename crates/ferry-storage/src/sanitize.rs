//! Client filename sanitization.

/// Reduce a client-supplied filename to a bare name safe to join onto the upload directory.
///
/// Only the final path segment survives. Both `/` and `\` count as separators so names
/// crafted for either platform are neutralised, and trailing separators are ignored
/// (`"a/b/"` yields `"b"`). Control characters are dropped.
///
/// Degenerate inputs (empty, separators only, `.` or `..`) yield an empty string, which
/// callers must reject before touching the filesystem.
pub fn sanitize_filename(raw: &str) -> String {
    let last = raw
        .rsplit(|c: char| c == '/' || c == '\\')
        .find(|segment| !segment.is_empty())
        .unwrap_or("");

    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();

    match cleaned.as_str() {
        "." | ".." => String::new(),
        _ => cleaned,
    }
}
