//! Quote escaping for spreadsheet text headed into `strings.xml`.

/// Prefixes every `"` and `'` with a backslash unless the source character
/// right before it is already a backslash.
///
/// This is not general XML escaping: `<`, `>` and `&` are left for the
/// document writer. There is no inverse.
///
/// ```
/// use stringsheet::escape::escape_text;
///
/// assert_eq!(escape_text(r#"She said "hi""#), r#"She said \"hi\""#);
/// assert_eq!(escape_text(r#"He said \"hi\""#), r#"He said \"hi\""#);
/// ```
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut last = None;
    for c in text.chars() {
        if matches!(c, '"' | '\'') && last != Some('\\') {
            escaped.push('\\');
        }
        escaped.push(c);
        last = Some(c);
    }
    escaped
}
