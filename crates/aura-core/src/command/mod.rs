//! Custom command definitions and resolution.
//!
//! Custom commands are user-named shell actions. Unknown names are resolved
//! interactively: the user describes the behavior, a generative service
//! suggests an action, and the confirmed action is persisted for reuse.

pub mod model;
pub mod repository;
pub mod resolver;

pub use model::{extract_command_name, CommandRequest, CustomCommand};
pub use repository::CommandRepository;
pub use resolver::{
    is_affirmative, CancelReason, CommandResolver, FailureReason, PromptReply, Prompter,
    Resolution, ResolutionState, UnmatchedPolicy,
};
