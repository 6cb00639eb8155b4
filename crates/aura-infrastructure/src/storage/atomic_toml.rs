//! Atomic TOML file operations.
//!
//! Every write goes to a sibling temp file that is fsynced and then renamed
//! over the target, so readers observe either the old or the new document,
//! never a partial one. Read-modify-write cycles hold an exclusive lock file.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use aura_core::AuraError;
use fs2::FileExt;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors that can occur during atomic TOML operations.
#[derive(Debug, Error)]
pub enum AtomicTomlError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<AtomicTomlError> for AuraError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::Io { .. } => AuraError::io(err.to_string()),
            AtomicTomlError::Parse { .. } | AtomicTomlError::Serialize(_) => {
                AuraError::Serialization {
                    format: "TOML".to_string(),
                    message: err.to_string(),
                }
            }
            AtomicTomlError::Lock(message) => AuraError::data_access(message),
        }
    }
}

/// A handle to a TOML document on disk.
#[derive(Debug)]
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for AtomicTomlFile<T> {
    fn clone(&self) -> Self {
        Self::new(self.path.clone())
    }
}

impl<T> AtomicTomlFile<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Loads and deserializes the file.
    ///
    /// - `Ok(None)`: the file doesn't exist or is blank
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| AtomicTomlError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Saves `data`, replacing the file atomically.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        self.ensure_parent()?;

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path).map_err(|e| self.io_error(e))?;
        tmp_file
            .write_all(toml_string.as_bytes())
            .map_err(|e| self.io_error(e))?;
        tmp_file.sync_all().map_err(|e| self.io_error(e))?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            self.io_error(e)
        })
    }

    /// Read-modify-write under an exclusive lock.
    ///
    /// `f` receives the current document (or `default_value` when there is
    /// none). Nothing is written if `f` fails.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<(), AtomicTomlError>
    where
        F: FnOnce(&mut T) -> Result<(), AtomicTomlError>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data)?;
        self.save(&data)
    }

    fn ensure_parent(&self) -> Result<(), AtomicTomlError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))
            }
            _ => Ok(()),
        }
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicTomlError> {
        let file_name = self.path.file_name().ok_or_else(|| {
            self.io_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }

    fn io_error(&self, source: std::io::Error) -> AtomicTomlError {
        AtomicTomlError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Exclusive lock guard, released (and the lock file removed) on drop.
struct FileLock {
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| AtomicTomlError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| AtomicTomlError::Io {
                path: lock_path.clone(),
                source,
            })?;

        file.lock_exclusive().map_err(|e| {
            AtomicTomlError::Lock(format!(
                "Failed to acquire lock {}: {}",
                lock_path.display(),
                e
            ))
        })?;

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    fn counter(count: u32) -> Counter {
        Counter {
            name: "test".to_string(),
            count,
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("test.toml"));

        file.save(&counter(42)).unwrap();

        assert_eq!(file.load().unwrap(), Some(counter(42)));
    }

    #[test]
    fn test_load_missing_or_blank_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blank.toml");
        let file = AtomicTomlFile::<Counter>::new(path.clone());

        assert!(file.load().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_update_applies_on_top_of_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("test.toml"));

        file.update(counter(0), |c| {
            c.count += 10;
            Ok(())
        })
        .unwrap();
        file.update(counter(0), |c| {
            c.count += 5;
            Ok(())
        })
        .unwrap();

        assert_eq!(file.load().unwrap().unwrap().count, 15);
        assert!(!temp_dir.path().join("test.lock").exists());
    }

    #[test]
    fn test_failed_update_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("test.toml"));
        file.save(&counter(1)).unwrap();

        let result = file.update(counter(0), |c| {
            c.count = 99;
            Err(AtomicTomlError::Lock("abort".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(file.load().unwrap().unwrap().count, 1);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("test.toml");
        let file = AtomicTomlFile::<Counter>::new(path.clone());

        file.save(&counter(3)).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("nested").join(".test.toml.tmp").exists());
    }

    #[test]
    fn test_parse_error_converts_to_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "name = ").unwrap();
        let file = AtomicTomlFile::<Counter>::new(path);

        let err: AuraError = file.load().unwrap_err().into();
        assert!(err.is_serialization());
    }
}
