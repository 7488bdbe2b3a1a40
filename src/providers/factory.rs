use super::compatible::OpenAiCompatibleProvider;
use super::ollama::OllamaProvider;
use super::reliable::ReliableProvider;
use super::traits::Provider;
use crate::config::Config;
use std::time::Duration;

/// Resolve API key for a provider from config and environment variables.
///
/// Resolution order:
/// 1. Explicitly provided `api_key` parameter (trimmed, filtered if empty)
/// 2. Provider-specific environment variable (e.g. `OPENROUTER_API_KEY`)
/// 3. Generic fallback variables (`EDITORIAL_GOVERNOR_API_KEY`, `API_KEY`)
pub fn resolve_api_key(name: &str, explicit_api_key: Option<&str>) -> Option<String> {
    if let Some(key) = explicit_api_key.map(str::trim).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    let provider_env: Option<&str> = match name {
        "openrouter" => Some("OPENROUTER_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        "groq" => Some("GROQ_API_KEY"),
        "mistral" => Some("MISTRAL_API_KEY"),
        "deepseek" => Some("DEEPSEEK_API_KEY"),
        _ => None,
    };

    provider_env
        .into_iter()
        .chain(["EDITORIAL_GOVERNOR_API_KEY", "API_KEY"])
        .find_map(|env_var| {
            std::env::var(env_var)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
}

/// Build a single provider by name.
///
/// `base_url` overrides the provider's default endpoint (self-hosted gateways,
/// a remote Ollama host).
pub fn create_provider(
    name: &str,
    api_key: Option<&str>,
    base_url: Option<&str>,
    timeout: Duration,
) -> anyhow::Result<Box<dyn Provider>> {
    let resolved_key = resolve_api_key(name, api_key);
    let api_key = resolved_key.as_deref();
    let compatible = |label: &str, default_url: &str| -> Box<dyn Provider> {
        Box::new(OpenAiCompatibleProvider::new(
            label,
            base_url.unwrap_or(default_url),
            api_key,
            timeout,
        ))
    };

    match name {
        "openrouter" => Ok(compatible("OpenRouter", "https://openrouter.ai/api/v1")),
        "openai" => Ok(compatible("OpenAI", "https://api.openai.com/v1")),
        "groq" => Ok(compatible("Groq", "https://api.groq.com/openai/v1")),
        "mistral" => Ok(compatible("Mistral", "https://api.mistral.ai/v1")),
        "deepseek" => Ok(compatible("DeepSeek", "https://api.deepseek.com/v1")),
        "ollama" => Ok(Box::new(OllamaProvider::new(base_url, timeout))),

        name if name.starts_with("custom:") => {
            let url = name.strip_prefix("custom:").unwrap_or("");
            if url.is_empty() {
                anyhow::bail!("Custom provider requires a URL. Format: custom:https://your-api.com");
            }
            Ok(Box::new(OpenAiCompatibleProvider::new(
                "Custom", url, api_key, timeout,
            )))
        }

        _ => anyhow::bail!(
            "Unknown provider: {name}. Supported: openrouter, openai, groq, mistral, deepseek, ollama.\n\
             Tip: Use \"custom:https://your-api.com\" for OpenAI-compatible endpoints."
        ),
    }
}

/// Primary provider plus configured fallbacks, wrapped in retry/backoff.
///
/// Each attempt is bounded by `backend.request_timeout_secs`, so a stalled
/// request is retried and then handed to the fallbacks.
pub fn create_resilient_provider(
    config: &Config,
    primary_name: &str,
) -> anyhow::Result<ReliableProvider> {
    let timeout = Duration::from_secs(config.backend.request_timeout_secs);
    let base_url = config.backend.base_url.as_deref();

    let mut providers: Vec<(String, Box<dyn Provider>)> = vec![(
        primary_name.to_string(),
        create_provider(primary_name, config.api_key.as_deref(), base_url, timeout)?,
    )];

    for fallback in &config.reliability.fallback_providers {
        if fallback == primary_name || providers.iter().any(|(n, _)| n == fallback) {
            continue;
        }
        // Fallbacks resolve their own key and endpoint.
        match create_provider(fallback, None, None, timeout) {
            Ok(provider) => providers.push((fallback.clone(), provider)),
            Err(e) => {
                tracing::warn!(fallback_provider = fallback.as_str(), "Ignoring invalid fallback provider: {e}");
            }
        }
    }

    Ok(ReliableProvider::new(
        providers,
        config.reliability.provider_retries,
        config.reliability.provider_backoff_ms,
    )
    .with_attempt_timeout(timeout))
}
