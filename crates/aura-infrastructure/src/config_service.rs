//! Configuration service implementation.
//!
//! Loads `config.toml` and `secret.json` from the config directory. A missing
//! or blank config file yields defaults; a missing secret file yields no
//! credentials, with the `GEMINI_API_KEY` environment variable as fallback.

use std::fs;
use std::path::PathBuf;

use aura_core::config::{AppConfig, GeminiSecret, SecretConfig};
use aura_core::error::{AuraError, Result};

use crate::paths::AuraPaths;
use crate::storage::AtomicTomlFile;

/// Environment variable consulted when `secret.json` has no Gemini key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone)]
pub struct ConfigService {
    config_file: PathBuf,
    secret_file: PathBuf,
}

impl ConfigService {
    pub fn new(paths: &AuraPaths) -> Self {
        Self {
            config_file: paths.config_file(),
            secret_file: paths.secret_file(),
        }
    }

    /// Loads the application configuration.
    ///
    /// Unknown keys are ignored and absent keys take their defaults; a file
    /// that is present but not valid TOML is an error.
    pub fn load_config(&self) -> Result<AppConfig> {
        let file = AtomicTomlFile::<AppConfig>::new(self.config_file.clone());
        match file.load() {
            Ok(Some(config)) => {
                tracing::debug!("Loaded config from {}", self.config_file.display());
                Ok(config)
            }
            Ok(None) => {
                tracing::info!(
                    "No config at {}, using defaults",
                    self.config_file.display()
                );
                Ok(AppConfig::default())
            }
            Err(e) => Err(AuraError::config(e.to_string())),
        }
    }

    /// Loads `secret.json`; absent means empty.
    pub fn load_secrets(&self) -> Result<SecretConfig> {
        let content = match fs::read_to_string(&self.secret_file) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SecretConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(SecretConfig::default());
        }

        serde_json::from_str(&content).map_err(|e| {
            AuraError::config(format!(
                "Invalid secret file {}: {}",
                self.secret_file.display(),
                e
            ))
        })
    }

    /// Gemini credentials from the secret file or the environment.
    ///
    /// Returns `Ok(None)` when neither provides a key; startup continues and
    /// the suggestion service reports the missing key when first used.
    pub fn gemini_credentials(&self) -> Result<Option<GeminiSecret>> {
        let secrets = self.load_secrets()?;
        Ok(resolve_gemini_secret(
            secrets,
            std::env::var(GEMINI_API_KEY_ENV).ok(),
        ))
    }
}

/// Prefers a non-blank key from the secret file over the environment value.
fn resolve_gemini_secret(secrets: SecretConfig, env_key: Option<String>) -> Option<GeminiSecret> {
    match secrets.gemini {
        Some(secret) if !secret.api_key.trim().is_empty() => Some(secret),
        file_secret => env_key
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| GeminiSecret {
                api_key,
                model_name: file_secret.and_then(|s| s.model_name),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_core::command::UnmatchedPolicy;
    use tempfile::TempDir;

    fn service(temp_dir: &TempDir) -> ConfigService {
        ConfigService::new(&AuraPaths::new(temp_dir.path(), temp_dir.path()))
    }

    #[test]
    fn test_missing_config_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(service(&temp_dir).load_config().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("config.toml"),
            "[resolver]\nunmatched_policy = \"explicit_only\"\n\n[idle]\nthreshold_secs = 60\n",
        )
        .unwrap();

        let config = service(&temp_dir).load_config().unwrap();
        assert_eq!(config.resolver.unmatched_policy, UnmatchedPolicy::ExplicitOnly);
        assert_eq!(config.resolver.prompt_retries, 2);
        assert_eq!(config.idle.threshold_secs, 60);
        assert_eq!(config.idle.poll_interval_secs, 5);
        assert_eq!(config.assistant.farewell, "Goodbye!");
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.toml"), "[idle\n").unwrap();

        let err = service(&temp_dir).load_config().unwrap_err();
        assert!(matches!(err, AuraError::Config(_)));
    }

    #[test]
    fn test_load_secrets() {
        let temp_dir = TempDir::new().unwrap();
        let svc = service(&temp_dir);
        assert!(svc.load_secrets().unwrap().gemini.is_none());

        fs::write(
            temp_dir.path().join("secret.json"),
            r#"{ "gemini": { "api_key": "k-123", "model_name": "gemini-1.5-pro" } }"#,
        )
        .unwrap();
        let gemini = svc.load_secrets().unwrap().gemini.unwrap();
        assert_eq!(gemini.api_key, "k-123");
        assert_eq!(gemini.model_name.as_deref(), Some("gemini-1.5-pro"));
    }

    #[test]
    fn test_file_key_wins_over_environment() {
        let secrets = SecretConfig {
            gemini: Some(GeminiSecret {
                api_key: "from-file".to_string(),
                model_name: None,
            }),
        };
        let resolved = resolve_gemini_secret(secrets, Some("from-env".to_string())).unwrap();
        assert_eq!(resolved.api_key, "from-file");
    }

    #[test]
    fn test_environment_fallback() {
        let blank_file_key = SecretConfig {
            gemini: Some(GeminiSecret {
                api_key: " ".to_string(),
                model_name: Some("gemini-1.5-pro".to_string()),
            }),
        };
        let resolved = resolve_gemini_secret(blank_file_key, Some("from-env".to_string())).unwrap();
        assert_eq!(resolved.api_key, "from-env");
        assert_eq!(resolved.model_name.as_deref(), Some("gemini-1.5-pro"));

        assert!(resolve_gemini_secret(SecretConfig::default(), None).is_none());
        assert!(resolve_gemini_secret(SecretConfig::default(), Some(String::new())).is_none());
    }
}
