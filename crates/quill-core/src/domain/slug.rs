//! URL-safe slug derivation.

/// Turn free text into a URL-safe slug: ASCII letters and digits are kept
/// lowercased, runs of everything else collapse to a single hyphen, and the
/// result carries no leading or trailing hyphen. Non-ASCII characters are
/// dropped. The result may be empty (e.g. for punctuation-only input).
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_hyphen = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}
