use editorial_governor::Config;
use editorial_governor::governance::GovernancePolicy;

pub fn render_status(config: &Config, policy: &GovernancePolicy) -> String {
    let lines = [
        format!("◆ editorial-governor {}", env!("CARGO_PKG_VERSION")),
        String::new(),
        format!("config      {}", config.config_path.display()),
        format!("workspace   {}", config.workspace_dir.display()),
        String::new(),
        format!(
            "provider    {}",
            config.default_provider.as_deref().unwrap_or("openrouter")
        ),
        format!(
            "model       {}",
            config.default_model.as_deref().unwrap_or("(default)")
        ),
        format!("timeout     {}s", config.backend.request_timeout_secs),
        format!(
            "fallbacks   {}",
            if config.reliability.fallback_providers.is_empty() {
                "(none)".to_string()
            } else {
                config.reliability.fallback_providers.join(", ")
            }
        ),
        format!("sink        {}", config.sinks.backend),
        String::new(),
        format!("max retries {}", policy.max_retries),
        format!("pass score  {:.1}", policy.passing_score),
        format!(
            "structure   >= {} words, markers: {}",
            policy.validator.min_words(),
            policy.validator.required_markers().join(", ")
        ),
        format!("blocked     {}", policy.gate.blocked_terms().join(", ")),
    ];
    lines.join("\n")
}
