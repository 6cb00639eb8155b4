//! The ordered capability registry.
//!
//! Routing priority is an explicit contract: rules are evaluated strictly in
//! declaration order and the first matching rule wins. Specific domains come
//! before broad ones (task terms before generic terms such as "search").

use std::sync::OnceLock;

use super::key::CapabilityKey;
use crate::text::{contains_phrase, tokenize};

/// A typed routing predicate over the tokens of an utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches when any keyword (a single word or a multi-word phrase)
    /// appears as whole, contiguous tokens.
    AnyKeyword(Vec<Vec<String>>),
}

impl Predicate {
    /// Builds an [`Predicate::AnyKeyword`] from plain keyword strings.
    pub fn any_of(keywords: &[&str]) -> Self {
        Self::AnyKeyword(keywords.iter().map(|k| tokenize(k)).collect())
    }

    /// Tests the predicate against pre-tokenized input.
    pub fn matches(&self, tokens: &[String]) -> bool {
        match self {
            Self::AnyKeyword(phrases) => phrases
                .iter()
                .any(|phrase| contains_phrase(tokens, phrase)),
        }
    }
}

/// One entry of the registry.
#[derive(Debug, Clone)]
pub struct CapabilityRule {
    pub key: CapabilityKey,
    pub predicate: Predicate,
}

impl CapabilityRule {
    pub fn new(key: CapabilityKey, predicate: Predicate) -> Self {
        Self { key, predicate }
    }
}

/// An ordered list of routing rules.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    rules: Vec<CapabilityRule>,
}

impl CapabilityRegistry {
    /// Creates a registry that evaluates `rules` in the given order.
    pub fn new(rules: Vec<CapabilityRule>) -> Self {
        Self { rules }
    }

    /// The rules, in evaluation order.
    pub fn rules(&self) -> &[CapabilityRule] {
        &self.rules
    }

    /// Classifies an utterance.
    ///
    /// Pure and infallible: returns the key of the first matching rule, or
    /// `None` when nothing matches.
    pub fn route(&self, utterance: &str) -> Option<CapabilityKey> {
        let tokens = tokenize(utterance);
        if tokens.is_empty() {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.predicate.matches(&tokens))
            .map(|rule| rule.key)
    }
}

/// Static storage for the default registry (initialized once).
static DEFAULT_REGISTRY: OnceLock<CapabilityRegistry> = OnceLock::new();

/// Returns the default registry.
///
/// This is the single place where routing priority is declared.
pub fn default_registry() -> &'static CapabilityRegistry {
    DEFAULT_REGISTRY.get_or_init(|| {
        use CapabilityKey::*;
        CapabilityRegistry::new(vec![
            CapabilityRule::new(
                Task,
                Predicate::any_of(&["task", "tasks", "todo", "to-do", "reminder", "reminders", "remind"]),
            ),
            CapabilityRule::new(Note, Predicate::any_of(&["note", "notes"])),
            CapabilityRule::new(
                Document,
                Predicate::any_of(&["document", "documents", "file", "files"]),
            ),
            CapabilityRule::new(Custom, Predicate::any_of(&["command", "commands"])),
            CapabilityRule::new(Translation, Predicate::any_of(&["translate", "translation"])),
            CapabilityRule::new(Email, Predicate::any_of(&["email", "emails", "mail", "inbox"])),
            CapabilityRule::new(
                Weather,
                Predicate::any_of(&["weather", "forecast", "news", "headlines"]),
            ),
            CapabilityRule::new(
                Recommendation,
                Predicate::any_of(&["recommend", "recommendation", "recommendations", "suggest"]),
            ),
            CapabilityRule::new(
                Entertainment,
                Predicate::any_of(&["entertainment", "music", "song", "play", "pause"]),
            ),
            CapabilityRule::new(Meeting, Predicate::any_of(&["meeting", "meetings"])),
            CapabilityRule::new(
                Web,
                Predicate::any_of(&["web browsing", "browse", "search", "website"]),
            ),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_routes_each_domain() {
        let registry = default_registry();
        let cases = [
            ("add a task to buy milk", CapabilityKey::Task),
            ("take a note", CapabilityKey::Note),
            ("open the quarterly document", CapabilityKey::Document),
            ("create a command called backup", CapabilityKey::Custom),
            ("translate hello to french", CapabilityKey::Translation),
            ("check my email", CapabilityKey::Email),
            ("what's the weather like", CapabilityKey::Weather),
            ("read me the news", CapabilityKey::Weather),
            ("recommend a book", CapabilityKey::Recommendation),
            ("play some music", CapabilityKey::Entertainment),
            ("summarize my meeting", CapabilityKey::Meeting),
            ("search for rust tutorials", CapabilityKey::Web),
            ("start web browsing", CapabilityKey::Web),
        ];
        for (utterance, expected) in cases {
            assert_eq!(registry.route(utterance), Some(expected), "utterance: {utterance}");
        }
    }

    #[test]
    fn test_task_terms_win_over_generic_search() {
        assert_eq!(
            default_registry().route("search my tasks for groceries"),
            Some(CapabilityKey::Task)
        );
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        // "note" precedes "email" in priority order.
        assert_eq!(
            default_registry().route("email me that note"),
            Some(CapabilityKey::Note)
        );
    }

    #[test]
    fn test_unmatched_and_empty_utterances() {
        let registry = default_registry();
        assert_eq!(registry.route("backup"), None);
        assert_eq!(registry.route(""), None);
        assert_eq!(registry.route("   "), None);
    }

    #[test]
    fn test_keywords_do_not_match_inside_words() {
        assert_eq!(default_registry().route("open my notebook"), None);
    }

    #[test]
    fn test_every_key_has_a_rule() {
        let registry = default_registry();
        for key in CapabilityKey::iter() {
            assert!(
                registry.rules().iter().any(|rule| rule.key == key),
                "missing rule for {key}"
            );
        }
    }

    #[test]
    fn test_custom_registry_respects_declared_order() {
        let registry = CapabilityRegistry::new(vec![
            CapabilityRule::new(CapabilityKey::Web, Predicate::any_of(&["search"])),
            CapabilityRule::new(CapabilityKey::Task, Predicate::any_of(&["task"])),
        ]);
        assert_eq!(registry.route("search my task"), Some(CapabilityKey::Web));
    }
}
