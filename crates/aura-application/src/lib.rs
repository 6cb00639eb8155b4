//! Application layer: wires routing, command resolution, the session log and
//! the idle reminder into the interaction loop.

pub mod idle_reminder;
pub mod interaction_loop;
pub mod router;
pub mod speech_prompter;

pub use idle_reminder::IdleReminder;
pub use interaction_loop::{InteractionLoop, Speech};
pub use router::{Dispatch, Router};
pub use speech_prompter::SpeechPrompter;
