//! Slug helpers.

use std::sync::LazyLock;

use regex::Regex;

/// Characters a stored slug may contain.
pub(crate) static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("static slug pattern"));
static UNSAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("static unsafe-char pattern"));
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("static separator pattern"));

/// Turn free text into a URL-safe label: `"Hello, World!"` becomes `"hello-world"`.
///
/// Non-ASCII characters are dropped rather than transliterated.
pub fn slugify(text: &str) -> String {
    let ascii: String = text.chars().filter(char::is_ascii).collect();
    let lowered = ascii.to_lowercase();
    let cleaned = UNSAFE.replace_all(&lowered, "");
    let joined = SEPARATORS.replace_all(cleaned.trim(), "-");
    joined.trim_matches(|c| c == '-' || c == '_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust -- and   Actix  "), "rust-and-actix");
        assert_eq!(slugify("Caf\u{e9} notes"), "caf-notes");
        assert_eq!(slugify("_under_score_"), "under_score");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slug_pattern() {
        assert!(SLUG_PATTERN.is_match("my-slug_2"));
        assert!(!SLUG_PATTERN.is_match("my slug"));
        assert!(!SLUG_PATTERN.is_match("caf\u{e9}"));
        assert!(!SLUG_PATTERN.is_match(""));
    }
}
