//! Capability routing.
//!
//! This module provides the ordered capability registry used by the router,
//! the capability keys and the domain handler interface.

pub mod handler;
pub mod key;
pub mod registry;

pub use handler::DomainHandler;
pub use key::CapabilityKey;
pub use registry::{default_registry, CapabilityRegistry, CapabilityRule, Predicate};
