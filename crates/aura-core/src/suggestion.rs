//! Generative suggestion capability.
//!
//! Turns a natural-language description into one directly executable shell
//! action. Failures are typed so the resolver can report them precisely.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by a [`CommandSuggester`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuggestionError {
    /// The call did not complete within the bounded wait
    #[error("suggestion timed out after {0:?}")]
    Timeout(Duration),

    /// The provider rejected the call for quota or rate reasons
    #[error("suggestion quota exceeded: {0}")]
    Quota(String),

    /// Transport or provider failure
    #[error("suggestion request failed: {message}")]
    Request { message: String, retryable: bool },

    /// The provider answered, but not with a usable action
    #[error("unusable suggestion: {0}")]
    Parse(String),

    /// The service is not configured (e.g. missing API key)
    #[error("suggestion service not configured: {0}")]
    Config(String),
}

impl SuggestionError {
    /// Creates a non-retryable request error.
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
            retryable: false,
        }
    }

    /// Whether another attempt may succeed.
    ///
    /// Rate limiting (`Quota`) counts as retryable; attempts stay bounded by
    /// the caller's retry policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Quota(_) => true,
            Self::Request { retryable, .. } => *retryable,
            Self::Parse(_) | Self::Config(_) => false,
        }
    }
}

/// Suggests a shell action for a description.
#[async_trait]
pub trait CommandSuggester: Send + Sync {
    /// Returns exactly one candidate action, without commentary or quoting.
    async fn suggest(&self, description: &str) -> Result<String, SuggestionError>;
}

/// Reduces a raw model answer to a single bare shell action.
///
/// Code fences are dropped, the first non-empty line is kept and surrounding
/// quotes or backticks are stripped. Returns `None` if nothing usable is left.
pub fn sanitize_action(raw: &str) -> Option<String> {
    let line = raw
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with("```"))?;

    let stripped = line
        .trim_start_matches('$')
        .trim()
        .trim_matches(|c: char| matches!(c, '`' | '"' | '\''))
        .trim();

    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_plain_action() {
        assert_eq!(
            sanitize_action("zip -r project.zip ./project\n").as_deref(),
            Some("zip -r project.zip ./project")
        );
    }

    #[test]
    fn test_sanitize_fenced_and_quoted() {
        let raw = "```bash\n`zip -r project.zip ./project`\n```";
        assert_eq!(sanitize_action(raw).as_deref(), Some("zip -r project.zip ./project"));
        assert_eq!(sanitize_action("\"ls -la\"").as_deref(), Some("ls -la"));
        assert_eq!(sanitize_action("$ df -h").as_deref(), Some("df -h"));
    }

    #[test]
    fn test_sanitize_keeps_inner_quotes() {
        assert_eq!(
            sanitize_action("echo 'hello world' > out.txt").as_deref(),
            Some("echo 'hello world' > out.txt")
        );
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize_action(""), None);
        assert_eq!(sanitize_action("```\n```"), None);
        assert_eq!(sanitize_action("  ``  "), None);
    }

    #[test]
    fn test_retryable_classification() {
        assert!(SuggestionError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(SuggestionError::Quota("429".into()).is_retryable());
        assert!(!SuggestionError::Parse("empty".into()).is_retryable());
        assert!(!SuggestionError::request("bad request").is_retryable());
        assert!(
            SuggestionError::Request {
                message: "503".into(),
                retryable: true
            }
            .is_retryable()
        );
    }
}
