//! TOML-based CommandRepository implementation.
//!
//! All custom commands live in a single `custom_commands.toml` document,
//! keyed by normalized name.

use std::path::PathBuf;

use async_trait::async_trait;
use aura_core::command::{CommandRepository, CustomCommand};
use aura_core::error::Result;
use aura_core::text::normalize_name;

use crate::dto::{CommandEntryDto, CommandFileDto};
use crate::storage::AtomicTomlFile;

pub struct TomlCommandRepository {
    file: AtomicTomlFile<CommandFileDto>,
}

impl TomlCommandRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    fn load(&self) -> Result<CommandFileDto> {
        Ok(self.file.load()?.unwrap_or_default())
    }
}

#[async_trait]
impl CommandRepository for TomlCommandRepository {
    async fn get(&self, name: &str) -> Result<Option<CustomCommand>> {
        let key = normalize_name(name);
        let mut document = self.load()?;
        Ok(document
            .commands
            .remove(&key)
            .map(|entry| entry.into_domain(key)))
    }

    async fn save(&self, command: CustomCommand) -> Result<()> {
        let key = normalize_name(&command.name);
        let entry = CommandEntryDto::from(&command);

        self.file.update(CommandFileDto::default(), |document| {
            if document.commands.insert(key.clone(), entry).is_some() {
                tracing::info!("Replacing action of custom command '{}'", key);
            }
            Ok(())
        })?;

        tracing::debug!(
            "Saved custom command '{}' to {}",
            key,
            self.file.path().display()
        );
        Ok(())
    }

    async fn list(&self) -> Result<Vec<CustomCommand>> {
        let document = self.load()?;
        Ok(document
            .commands
            .into_iter()
            .map(|(name, entry)| entry.into_domain(name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repository(temp_dir: &TempDir) -> TomlCommandRepository {
        TomlCommandRepository::new(temp_dir.path().join("custom_commands.toml"))
    }

    #[tokio::test]
    async fn test_get_from_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        assert!(repo.get("backup").await.unwrap().is_none());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_get_by_any_casing() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        repo.save(CustomCommand::new("Backup", "zip -r project.zip ./project"))
            .await
            .unwrap();

        let found = repo.get("  BACKUP. ").await.unwrap().unwrap();
        assert_eq!(found.name, "backup");
        assert_eq!(found.action, "zip -r project.zip ./project");
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_name() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        repo.save(CustomCommand::new("backup", "tar czf a.tgz .")).await.unwrap();
        repo.save(CustomCommand::new("backup", "zip -r b.zip .")).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].action, "zip -r b.zip .");
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let repo = repository(&temp_dir);
            repo.save(CustomCommand::new("open mail", "xdg-open https://mail.example.com"))
                .await
                .unwrap();
            repo.save(CustomCommand::new("backup", "zip -r p.zip ./p")).await.unwrap();
        }

        let reopened = repository(&temp_dir);
        let names: Vec<String> = reopened
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["backup".to_string(), "open mail".to_string()]);
    }

    #[tokio::test]
    async fn test_file_uses_named_tables() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        repo.save(CustomCommand::new("open mail", "thunderbird")).await.unwrap();

        let content =
            std::fs::read_to_string(temp_dir.path().join("custom_commands.toml")).unwrap();
        assert!(content.contains("[commands.\"open mail\"]"));
        assert!(content.contains("action = \"thunderbird\""));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("custom_commands.toml"), "[commands").unwrap();
        let repo = repository(&temp_dir);

        assert!(repo.get("backup").await.unwrap_err().is_serialization());
    }
}
