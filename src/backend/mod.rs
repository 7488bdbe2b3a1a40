pub mod llm;
pub mod scripted;
pub mod traits;

pub use llm::LlmBackend;
pub use scripted::{BackendCall, ScriptedBackend};
pub use traits::{BackendFuture, GenerationBackend};
