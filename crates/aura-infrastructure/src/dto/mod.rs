//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs describe the on-disk TOML documents. They are private to the
//! infrastructure layer so the domain models can evolve independently of the
//! storage format.

mod command;
mod session;
mod task;

pub use command::{CommandEntryDto, CommandFileDto};
pub use session::{SessionFileDto, TurnDto};
pub use task::{TaskDto, TaskFileDto};
