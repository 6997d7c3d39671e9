/// Characters that separate tokens, in addition to any Unicode whitespace
pub const DELIMITERS: &[char] = &[
    ' ', '\t', '\n', '\r', '"', '\'', '!', '?', '#', '$', '%', '&', '|', '(', ')', '{', '}', '[',
    ']', '*', '/', '+', '-', ':', ';', '<', '>', '=', '.', ',',
];

/// Splits text into lowercase keyword tokens
///
/// Tokens are separated by whitespace, quotes and common punctuation. Empty
/// tokens and tokens containing anything other than ASCII letters are
/// dropped. Each call returns a fresh iterator over `text`.
///
/// # Example
///
/// ```
/// use webindex::index::tokenize;
///
/// let tokens: Vec<String> = tokenize("Hello, World! 123 foo-bar").collect();
/// assert_eq!(tokens, vec!["hello", "world", "foo", "bar"]);
/// ```
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| c.is_whitespace() || DELIMITERS.contains(&c))
        .filter(|token| !token.is_empty() && token.bytes().all(|b| b.is_ascii_alphabetic()))
        .map(|token| token.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        tokenize(text).collect()
    }

    #[test]
    fn test_unicode_whitespace_separates() {
        assert_eq!(tokens("foo\u{a0}bar\u{3000}baz"), vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn test_alphabetic_only() {
        assert_eq!(tokens("Hello, World! 123 foo-bar"), vec!["hello", "world", "foo", "bar"]);
    }

    #[test]
    fn test_mixed_tokens_dropped() {
        assert_eq!(tokens("abc123 mp3 rust"), vec!["rust"]);
        assert_eq!(tokens("café naïve plain"), vec!["plain"]);
        assert_eq!(tokens("snake_case kebab"), vec!["kebab"]);
    }

    #[test]
    fn test_all_delimiters_split() {
        let text = "a\tb\nc\rd\"e'f!g?h#i$j%k&l|m(n)o{p}q[r]s*t/u+v-w:x;y<z>a=b.c,d";
        assert_eq!(tokens(text).len(), 30);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokens("").is_empty());
        assert!(tokens(" ,.;! ").is_empty());
    }

    #[test]
    fn test_restartable() {
        let text = "one two";
        assert_eq!(tokens(text), tokens(text));
    }

    #[test]
    fn test_duplicates_kept() {
        assert_eq!(tokens("Rust rust RUST"), vec!["rust", "rust", "rust"]);
    }
}
