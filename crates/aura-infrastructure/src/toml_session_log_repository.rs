//! TOML-based SessionLogRepository implementation.
//!
//! Each session is stored in its own file, `sessions/session-<id>.toml`.
//! Appending rewrites the file through [`AtomicTomlFile::update`], so a
//! crash mid-write never leaves a truncated log behind.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use aura_core::error::{AuraError, Result};
use aura_core::session::{SessionLogRepository, Turn};

use crate::dto::{SessionFileDto, TurnDto};
use crate::storage::AtomicTomlFile;

const FILE_PREFIX: &str = "session-";
const FILE_EXTENSION: &str = "toml";

pub struct TomlSessionLogRepository {
    sessions_dir: PathBuf,
}

impl TomlSessionLogRepository {
    pub fn new(sessions_dir: PathBuf) -> Self {
        Self { sessions_dir }
    }

    fn session_file(&self, session_id: u64) -> AtomicTomlFile<SessionFileDto> {
        AtomicTomlFile::new(
            self.sessions_dir
                .join(format!("{FILE_PREFIX}{session_id}.{FILE_EXTENSION}")),
        )
    }

    /// Extracts the id from a `session-<id>.toml` file name.
    fn parse_session_id(file_name: &str) -> Option<u64> {
        file_name
            .strip_prefix(FILE_PREFIX)?
            .strip_suffix(".toml")?
            .parse()
            .ok()
    }
}

#[async_trait]
impl SessionLogRepository for TomlSessionLogRepository {
    async fn max_session_id(&self) -> Result<Option<u64>> {
        let entries = match fs::read_dir(&self.sessions_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut max_id = None;
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            if let Some(id) = file_name.to_str().and_then(Self::parse_session_id) {
                max_id = max_id.max(Some(id));
            }
        }

        Ok(max_id)
    }

    async fn create(&self, session_id: u64) -> Result<()> {
        self.session_file(session_id)
            .update(SessionFileDto::new(session_id), |_| Ok(()))?;
        Ok(())
    }

    async fn append(&self, session_id: u64, turn: &Turn) -> Result<()> {
        let file = self.session_file(session_id);
        let dto = TurnDto::from(turn);

        file.update(SessionFileDto::new(session_id), |session| {
            session.turns.push(dto);
            Ok(())
        })?;

        Ok(())
    }

    async fn read(&self, session_id: u64) -> Result<Vec<Turn>> {
        let Some(session) = self.session_file(session_id).load()? else {
            return Err(AuraError::not_found("session", session_id.to_string()));
        };

        if session.session_id != session_id {
            return Err(AuraError::data_access(format!(
                "Session file for {} contains session {}",
                session_id, session.session_id
            )));
        }

        Ok(session
            .turns
            .into_iter()
            .map(TurnDto::into_domain)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repository(temp_dir: &TempDir) -> TomlSessionLogRepository {
        TomlSessionLogRepository::new(temp_dir.path().join("sessions"))
    }

    #[test]
    fn test_parse_session_id() {
        assert_eq!(
            TomlSessionLogRepository::parse_session_id("session-12.toml"),
            Some(12)
        );
        assert_eq!(TomlSessionLogRepository::parse_session_id("session-x.toml"), None);
        assert_eq!(TomlSessionLogRepository::parse_session_id(".session-3.toml.tmp"), None);
        assert_eq!(TomlSessionLogRepository::parse_session_id("session-3.lock"), None);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        assert_eq!(repo.max_session_id().await.unwrap(), None);
        assert!(repo.read(1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_create_reserves_an_empty_session() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        repo.create(3).await.unwrap();

        assert_eq!(repo.max_session_id().await.unwrap(), Some(3));
        assert!(repo.read(3).await.unwrap().is_empty());
        let content =
            fs::read_to_string(temp_dir.path().join("sessions").join("session-3.toml")).unwrap();
        assert!(content.contains("session_id = 3"));
    }

    #[tokio::test]
    async fn test_create_keeps_existing_turns() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        repo.append(1, &Turn::new("backup", "Executed command 'backup'.")).await.unwrap();

        repo.create(1).await.unwrap();

        assert_eq!(repo.read(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        repo.append(1, &Turn::new("what's the weather", "Sunny.")).await.unwrap();
        repo.append(1, &Turn::new("backup", "Command 'backup' executed successfully."))
            .await
            .unwrap();

        let turns = repo.read(1).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].command, "what's the weather");
        assert_eq!(turns[1].response, "Command 'backup' executed successfully.");
    }

    #[tokio::test]
    async fn test_max_session_id_scans_files() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        for id in [2, 7, 3] {
            repo.append(id, &Turn::new("hello", "hi")).await.unwrap();
        }
        fs::write(temp_dir.path().join("sessions").join("notes.txt"), "x").unwrap();

        assert_eq!(repo.max_session_id().await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn test_session_file_layout() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        repo.append(4, &Turn::new("note this", "Saved.")).await.unwrap();

        let content =
            fs::read_to_string(temp_dir.path().join("sessions").join("session-4.toml")).unwrap();
        assert!(content.contains("session_id = 4"));
        assert!(content.contains("[[turns]]"));
        assert!(content.contains("command = \"note this\""));
    }
}
