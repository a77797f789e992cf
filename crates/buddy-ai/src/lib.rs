mod backend;
mod error;
mod prompt;
mod service;

pub use backend::{GenerationBackend, OllamaBackend, OllamaRuntime};
pub use error::AiError;
pub use prompt::build_prompt;
pub use service::DraftGenerator;
