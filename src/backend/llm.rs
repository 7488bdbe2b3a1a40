use super::traits::{BackendFuture, GenerationBackend};
use crate::error::BackendError;
use crate::governance::Rubric;
use crate::providers::{Provider, scrub_secret_patterns};
use std::sync::Arc;
use std::time::Duration;

const DRAFTER_PERSONA: &str = "You are a technical blogger. Structure every post with \
     'Why', 'How' and 'What' sections, add pros and cons, and cite the sources of your information.";

const REWRITER_PERSONA: &str = "Rewrite the draft based on the feedback provided. \
     Keep the 'Why', 'How' and 'What' sections. Return only the rewritten draft.";

/// Production backend: three fixed personas over one chat provider.
pub struct LlmBackend {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f64,
    critique_temperature: f64,
    timeout: Duration,
}

impl LlmBackend {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, temperature: f64) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            critique_temperature: temperature,
            timeout: Duration::from_secs(120),
        }
    }

    #[must_use]
    pub fn with_critique_temperature(mut self, temperature: f64) -> Self {
        self.critique_temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn critic_system_prompt() -> String {
        [
            "You are a strict editor. Score the draft from 1 to 10 on three axes.",
            "- storytelling: narrative flow and engagement.",
            "- tone: professional, even-handed register.",
            "- simplicity: plain language a newcomer can follow.",
            "Set biasFlag to true when the draft contains stereotypes or biased generalisations.",
            "Put concrete rewrite instructions in feedback.",
            Rubric::schema_prompt(),
        ]
        .join("\n")
    }

    pub(crate) fn rewriter_system_prompt(feedback: &str) -> String {
        format!("{REWRITER_PERSONA}\n\nFeedback:\n{feedback}")
    }

    async fn call(
        &self,
        operation: &'static str,
        system_prompt: &str,
        message: &str,
        temperature: f64,
    ) -> Result<String, BackendError> {
        let request =
            self.provider
                .chat_with_system(Some(system_prompt), message, &self.model, temperature);

        match tokio::time::timeout(self.timeout, request).await {
            Err(_) => Err(BackendError::Timeout {
                operation,
                timeout_secs: self.timeout.as_secs(),
            }),
            Ok(Err(e)) => Err(BackendError::Request {
                operation,
                message: scrub_secret_patterns(&format!("{e:#}")).into_owned(),
            }),
            Ok(Ok(text)) => Ok(text),
        }
    }

    async fn call_for_text(
        &self,
        operation: &'static str,
        system_prompt: &str,
        message: &str,
    ) -> Result<String, BackendError> {
        let text = self
            .call(operation, system_prompt, message, self.temperature)
            .await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(BackendError::EmptyResponse { operation });
        }
        Ok(text.to_string())
    }
}

impl GenerationBackend for LlmBackend {
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn draft<'a>(&'a self, topic: &'a str) -> BackendFuture<'a, String> {
        Box::pin(async move { self.call_for_text("draft", DRAFTER_PERSONA, topic).await })
    }

    fn critique<'a>(&'a self, draft: &'a str) -> BackendFuture<'a, Rubric> {
        Box::pin(async move {
            let system_prompt = Self::critic_system_prompt();
            let response = self
                .call("critique", &system_prompt, draft, self.critique_temperature)
                .await?;
            let rubric = Rubric::parse_response(&response)?;
            tracing::debug!(
                storytelling = rubric.storytelling,
                tone = rubric.tone,
                simplicity = rubric.simplicity,
                bias_flag = rubric.bias_flag,
                "Critique parsed"
            );
            Ok(rubric)
        })
    }

    fn refine<'a>(&'a self, feedback: &'a str, draft: &'a str) -> BackendFuture<'a, String> {
        Box::pin(async move {
            let system_prompt = Self::rewriter_system_prompt(feedback);
            self.call_for_text("refine", &system_prompt, draft).await
        })
    }
}
