pub mod html;
pub mod text;

#[cfg(test)]
mod tests;

/// Trim a raw text fragment, dropping it when nothing visible remains
pub fn clean_fragment(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
