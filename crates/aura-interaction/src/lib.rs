//! User-facing adapters: the Gemini suggestion client and the console
//! stand-ins for speech capture, speech output and reminders.

pub mod console;
pub mod gemini_suggestion_service;
pub mod retry;

pub use console::{ConsoleNotifier, ConsoleSpeech};
pub use gemini_suggestion_service::GeminiSuggestionService;
pub use retry::RetryPolicy;
