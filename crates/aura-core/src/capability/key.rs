//! Capability keys identifying the domain that owns an utterance.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A domain that can fully answer an utterance.
///
/// `Custom` is special: it is never backed by a domain handler, utterances
/// routed to it are resolved by the custom command resolver instead.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CapabilityKey {
    Task,
    Note,
    Document,
    Email,
    Weather,
    Entertainment,
    Translation,
    Recommendation,
    Meeting,
    /// Web browsing and search, the broadest domain.
    Web,
    /// User-defined commands persisted in the command store.
    Custom,
}

impl CapabilityKey {
    /// Returns true when this key is served by the command resolver.
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom)
    }
}
