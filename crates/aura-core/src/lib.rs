//! Domain layer of the Aura assistant.
//!
//! Holds the types, traits and pure logic of command routing, custom command
//! resolution, session continuity and idle reminders. Storage, network and
//! console adapters live in the outer crates and plug in through the traits
//! defined here.

pub mod capability;
pub mod command;
pub mod config;
pub mod error;
pub mod idle;
pub mod session;
pub mod shell;
pub mod speech;
pub mod suggestion;
pub mod text;

// Re-export common error type
pub use error::AuraError;
