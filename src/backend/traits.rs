use crate::error::BackendError;
use crate::governance::Rubric;
use std::future::Future;
use std::pin::Pin;

pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BackendError>> + Send + 'a>>;

/// The three generation capabilities the governance loop consumes.
///
/// Implementations must be shareable across concurrent runs. Failures are
/// returned as-is; the loop never retries them.
pub trait GenerationBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Produce prose from a topic or a corrective instruction.
    fn draft<'a>(&'a self, topic: &'a str) -> BackendFuture<'a, String>;

    /// Score a draft on the three rubric axes and flag bias.
    fn critique<'a>(&'a self, draft: &'a str) -> BackendFuture<'a, Rubric>;

    /// Rewrite `draft` according to `feedback`.
    fn refine<'a>(&'a self, feedback: &'a str, draft: &'a str) -> BackendFuture<'a, String>;
}
