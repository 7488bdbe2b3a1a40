pub mod file;
pub mod log;
pub mod memory;
pub mod traits;

pub use self::file::FileSink;
pub use self::log::LogSink;
pub use self::memory::MemorySink;
pub use traits::{EscalationReporter, Publisher, Sink};

use crate::config::SinkConfig;
use std::path::Path;
use std::sync::Arc;

/// Publisher and reporter pair handed to the governance loop.
#[derive(Clone)]
pub struct Sinks {
    pub publisher: Arc<dyn Publisher>,
    pub reporter: Arc<dyn EscalationReporter>,
}

impl Sinks {
    /// Use one value for both roles.
    pub fn shared<S>(sink: Arc<S>) -> Self
    where
        S: Publisher + EscalationReporter + 'static,
    {
        Self {
            publisher: sink.clone(),
            reporter: sink,
        }
    }
}

/// Factory: create sinks from config. `default_output_dir` is used by the
/// file sink when `output_dir` is unset.
pub fn create_sinks(config: &SinkConfig, default_output_dir: &Path) -> Sinks {
    match config.backend.as_str() {
        "log" => Sinks::shared(Arc::new(LogSink::new())),
        "file" => {
            let dir = config
                .output_dir
                .clone()
                .unwrap_or_else(|| default_output_dir.to_path_buf());
            Sinks::shared(Arc::new(FileSink::new(dir)))
        }
        "memory" => Sinks::shared(Arc::new(MemorySink::new())),
        _ => {
            tracing::warn!(
                "Unknown sink backend '{}', falling back to log",
                config.backend
            );
            Sinks::shared(Arc::new(LogSink::new()))
        }
    }
}
