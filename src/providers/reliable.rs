use super::traits::Provider;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

const MAX_BACKOFF_MS: u64 = 10_000;

enum AttemptError {
    TimedOut(Duration),
    Failed(anyhow::Error),
}

/// Check if an error is non-retryable (client errors that won't resolve with retries).
fn is_non_retryable(err: &anyhow::Error) -> bool {
    let msg = err.to_string();
    if is_quota_exhausted(&msg) {
        return true;
    }

    if let Some(reqwest_err) = err.downcast_ref::<reqwest::Error>()
        && let Some(status) = reqwest_err.status()
    {
        let code = status.as_u16();
        // 429 and 408 are transient.
        return status.is_client_error() && code != 429 && code != 408;
    }

    msg.split(|c: char| !c.is_ascii_digit())
        .filter_map(|word| word.parse::<u16>().ok())
        .find(|code| (400..500).contains(code))
        .is_some_and(|code| code != 429 && code != 408)
}

fn is_quota_exhausted(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("insufficient_quota") || lower.contains("exceeded your current quota")
}

fn backoff_delay(base_backoff_ms: u64, retry: u32) -> Duration {
    let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
    Duration::from_millis(base_backoff_ms.max(1).saturating_mul(factor).min(MAX_BACKOFF_MS))
}

/// Longest a single call through a [`ReliableProvider`] can take: every
/// provider runs every attempt to its timeout, with full backoff between.
pub fn worst_case_duration(
    provider_count: usize,
    max_retries: u32,
    base_backoff_ms: u64,
    attempt_timeout: Duration,
) -> Duration {
    let attempts = attempt_timeout.saturating_mul(max_retries.saturating_add(1));
    let backoff = (0..max_retries)
        .map(|retry| backoff_delay(base_backoff_ms, retry))
        .fold(Duration::ZERO, Duration::saturating_add);
    let per_provider = attempts.saturating_add(backoff);
    per_provider.saturating_mul(u32::try_from(provider_count.max(1)).unwrap_or(u32::MAX))
}

/// Provider wrapper with retry + fallback behavior.
///
/// This is transport reliability only. The governance loop treats whatever
/// this returns as final. When an attempt timeout is set, a slow attempt
/// counts as a retryable failure instead of stalling the whole call.
pub struct ReliableProvider {
    providers: Vec<(String, Box<dyn Provider>)>,
    max_retries: u32,
    base_backoff_ms: u64,
    attempt_timeout: Option<Duration>,
}

impl ReliableProvider {
    pub fn new(
        providers: Vec<(String, Box<dyn Provider>)>,
        max_retries: u32,
        base_backoff_ms: u64,
    ) -> Self {
        Self {
            providers,
            max_retries,
            base_backoff_ms: base_backoff_ms.max(1),
            attempt_timeout: None,
        }
    }

    #[must_use]
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Upper bound on one `chat_with_system` call, if attempts are bounded.
    pub fn worst_case_duration(&self) -> Option<Duration> {
        self.attempt_timeout.map(|timeout| {
            worst_case_duration(
                self.providers.len(),
                self.max_retries,
                self.base_backoff_ms,
                timeout,
            )
        })
    }

    fn backoff_for(&self, retry: u32) -> Duration {
        backoff_delay(self.base_backoff_ms, retry)
    }

    async fn single_attempt(
        &self,
        provider: &dyn Provider,
        request: (Option<&str>, &str, &str, f64),
    ) -> Result<String, AttemptError> {
        let (system_prompt, message, model, temperature) = request;
        let call = provider.chat_with_system(system_prompt, message, model, temperature);
        match self.attempt_timeout {
            None => call.await.map_err(AttemptError::Failed),
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result.map_err(AttemptError::Failed),
                Err(_) => Err(AttemptError::TimedOut(limit)),
            },
        }
    }

    /// Call one provider up to `max_retries + 1` times, recording each failure.
    async fn attempt_provider(
        &self,
        label: &str,
        provider: &dyn Provider,
        request: (Option<&str>, &str, &str, f64),
        failures: &mut Vec<String>,
    ) -> Option<String> {
        let budget = self.max_retries + 1;

        for retry in 0..budget {
            match self.single_attempt(provider, request).await {
                Ok(text) => {
                    if retry > 0 {
                        tracing::info!(provider = label, retries = retry, "Provider recovered");
                    }
                    return Some(text);
                }
                Err(AttemptError::TimedOut(limit)) => {
                    failures.push(format!(
                        "{label} attempt {}/{budget}: timed out after {}ms",
                        retry + 1,
                        limit.as_millis()
                    ));
                }
                Err(AttemptError::Failed(err)) => {
                    failures.push(format!("{label} attempt {}/{budget}: {err}", retry + 1));
                    if is_non_retryable(&err) {
                        tracing::warn!(provider = label, "Non-retryable provider error: {err}");
                        return None;
                    }
                }
            }
            if retry + 1 < budget {
                let delay = self.backoff_for(retry);
                tracing::warn!(
                    provider = label,
                    retry = retry + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Provider call failed, backing off"
                );
                tokio::time::sleep(delay).await;
            }
        }
        None
    }
}

impl Provider for ReliableProvider {
    fn name(&self) -> &str {
        self.providers
            .first()
            .map_or("reliable", |(name, _)| name.as_str())
    }

    fn chat_with_system<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        message: &'a str,
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let mut failures = Vec::new();
            for (index, (label, provider)) in self.providers.iter().enumerate() {
                if index > 0 {
                    tracing::warn!(provider = label.as_str(), "Falling back to next provider");
                }
                let request = (system_prompt, message, model, temperature);
                if let Some(text) = self
                    .attempt_provider(label, provider.as_ref(), request, &mut failures)
                    .await
                {
                    return Ok(text);
                }
            }
            anyhow::bail!("All providers failed. Attempts:\n{}", failures.join("\n"))
        })
    }
}
