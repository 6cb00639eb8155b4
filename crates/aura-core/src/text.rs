//! Text helpers shared by routing, exit detection and command naming.

/// Splits text into lowercase alphanumeric tokens.
///
/// Every non-alphanumeric character is a separator, so `"To-Do list!"`
/// becomes `["to", "do", "list"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Returns true when `phrase` occurs in `tokens` as a contiguous run.
pub fn contains_phrase(tokens: &[String], phrase: &[String]) -> bool {
    if phrase.is_empty() || phrase.len() > tokens.len() {
        return false;
    }
    tokens.windows(phrase.len()).any(|window| window == phrase)
}

/// Returns true when any of `phrases` occurs in `text` as whole tokens.
pub fn contains_any_phrase<S: AsRef<str>>(text: &str, phrases: &[S]) -> bool {
    let tokens = tokenize(text);
    phrases
        .iter()
        .any(|phrase| contains_phrase(&tokens, &tokenize(phrase.as_ref())))
}

/// Normalizes a command name: trimmed, lowercased, single-spaced, without
/// trailing sentence punctuation.
pub fn normalize_name(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(['.', '!', '?'])
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_on_punctuation() {
        assert_eq!(tokenize("Add a To-Do, please!"), vec!["add", "a", "to", "do", "please"]);
        assert!(tokenize("  ...  ").is_empty());
    }

    #[test]
    fn test_contains_phrase_requires_whole_tokens() {
        let tokens = tokenize("open my notebook");
        assert!(!contains_phrase(&tokens, &tokenize("note")));
        assert!(contains_phrase(&tokens, &tokenize("my notebook")));
    }

    #[test]
    fn test_contains_any_phrase() {
        assert!(contains_any_phrase("Ok, EXIT now", &["exit", "quit"]));
        assert!(!contains_any_phrase("exited", &["exit"]));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Backup   My  Files. "), "backup my files");
        assert_eq!(normalize_name("BACKUP?!"), "backup");
        assert_eq!(normalize_name(""), "");
    }
}
