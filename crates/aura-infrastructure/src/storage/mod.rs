//! Low-level storage helpers.

pub mod atomic_toml;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
