//! Filesystem and process adapters for the Aura domain traits.

pub mod config_service;
pub mod dto;
pub mod paths;
pub mod shell_executor;
pub mod storage;
pub mod toml_command_repository;
pub mod toml_session_log_repository;
pub mod toml_task_source;

pub use crate::config_service::ConfigService;
pub use crate::paths::AuraPaths;
pub use crate::shell_executor::SystemShellExecutor;
pub use crate::toml_command_repository::TomlCommandRepository;
pub use crate::toml_session_log_repository::TomlSessionLogRepository;
pub use crate::toml_task_source::TomlTaskSource;
