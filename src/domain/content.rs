//! Rules for post content: HTML produced by the editor, sanitized before display.

use super::error::DomainError;

const EXCERPT_CHARS: usize = 160;

/// Sanitize editor HTML before it is injected into any rendered output.
pub fn sanitize_html(html: &str) -> String {
    ammonia::clean(html)
}

/// Visible text of an HTML fragment, with every tag dropped.
pub fn plain_text(html: &str) -> String {
    let stripped = ammonia::Builder::empty().clean(html).to_string();
    let text = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Single-line teaser for listing rows.
pub fn excerpt(html: &str) -> String {
    let text = plain_text(html);
    if text.chars().count() <= EXCERPT_CHARS {
        return text;
    }
    let mut clipped: String = text.chars().take(EXCERPT_CHARS).collect();
    clipped.push_str("...");
    clipped
}

/// Title and content must both carry visible text. Content made only of
/// empty formatting tags counts as empty.
pub fn validate_draft(title: &str, content: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::empty("title"));
    }
    if plain_text(content).is_empty() {
        return Err(DomainError::empty("content"));
    }
    Ok(())
}
