/// Keeps only alphanumeric and whitespace characters, in their original order.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|&c| is_kept(c)).collect()
}

/// The file, group, record and unit separators (U+001C..=U+001F) count as
/// whitespace here even though `char::is_whitespace` rejects them.
fn is_kept(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || matches!(c, '\u{1c}'..='\u{1f}')
}
