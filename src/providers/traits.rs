use std::future::Future;
use std::pin::Pin;

/// Text-in, text-out chat model.
///
/// The governance loop never talks to a provider directly; the production
/// generation backend wraps one and adds personas, parsing and timeouts.
pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "openai", "ollama").
    fn name(&self) -> &str;

    fn chat_with_system<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        message: &'a str,
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>>;
}
