use crate::app::status::render_status;
use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use editorial_governor::backend::LlmBackend;
use editorial_governor::governance::{GovernanceLoop, GovernancePolicy, RunOutcome};
use editorial_governor::providers::create_resilient_provider;
use editorial_governor::{Config, create_sinks};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const DEFAULT_MODEL: &str = "openai/gpt-4o";

/// Build a governance loop wired to the configured provider and sinks.
fn build_loop(
    config: &Config,
    policy: GovernancePolicy,
    provider_override: Option<&str>,
    model_override: Option<&str>,
    temperature: f64,
) -> Result<GovernanceLoop> {
    let provider_name = provider_override
        .or(config.default_provider.as_deref())
        .unwrap_or("openrouter");
    let model = model_override
        .or(config.default_model.as_deref())
        .unwrap_or(DEFAULT_MODEL);

    let provider = create_resilient_provider(config, provider_name)?;
    // Per-attempt bounds live in the provider; the backend bounds the whole retry chain.
    let call_budget = provider
        .worst_case_duration()
        .unwrap_or(Duration::from_secs(config.backend.request_timeout_secs));
    let backend = LlmBackend::new(Arc::new(provider), model, temperature)
        .with_critique_temperature(config.backend.critique_temperature.unwrap_or(temperature))
        .with_timeout(call_budget);

    info!(provider = provider_name, model, "Generation backend ready");

    let sinks = create_sinks(&config.sinks, &config.sink_output_dir());
    Ok(GovernanceLoop::new(Arc::new(policy), Arc::new(backend), sinks))
}

fn render_outcome(outcome: &RunOutcome) -> String {
    let calls = outcome.calls();
    match outcome {
        RunOutcome::Blocked(notice) => format!(
            "BLOCKED  topic matches '{}' (run {})",
            notice.matched_term, notice.run_id
        ),
        RunOutcome::Published { artifact, .. } => format!(
            "PUBLISHED  score {:.2} on attempt {} (run {}, {} backend calls)\n\n{}",
            artifact.score,
            artifact.attempt,
            artifact.run_id,
            calls.total(),
            artifact.draft
        ),
        RunOutcome::Escalated { report, .. } => {
            let score = report
                .score
                .map_or_else(|| "n/a".to_string(), |s| format!("{s:.2}"));
            format!(
                "ESCALATED  reason {} on attempt {} (run {}, score {score}, {} backend calls)\nfeedback: {}\npreview:  {}",
                report.reason,
                report.attempt,
                report.run_id,
                calls.total(),
                report.feedback,
                report.draft_preview
            )
        }
    }
}

fn validate_file(policy: &GovernancePolicy, file: &Path) -> Result<String> {
    let draft = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read draft {}", file.display()))?;
    let report = policy.validator.inspect(Some(&draft));
    Ok(match report.failure_summary() {
        None => format!("VALID  {} words", report.word_count),
        Some(problem) => format!("INVALID  {problem}"),
    })
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let policy = GovernancePolicy::from_config(&config.governance)?;

    match cli.command {
        Commands::Run {
            topic,
            provider,
            model,
            temperature,
        } => {
            let temperature = temperature.unwrap_or(config.default_temperature);
            let governance = build_loop(
                &config,
                policy,
                provider.as_deref(),
                model.as_deref(),
                temperature,
            )?;
            let outcome = governance.execute(&topic).await?;
            println!("{}", render_outcome(&outcome));
            Ok(())
        }

        Commands::Gate { topic } => {
            match policy.gate.matched_term(&topic) {
                Some(term) => println!("BLOCKED  matches '{term}'"),
                None => println!("ALLOWED"),
            }
            Ok(())
        }

        Commands::Validate { file } => {
            println!("{}", validate_file(&policy, &file)?);
            Ok(())
        }

        Commands::Config => {
            println!("{}", render_status(&config, &policy));
            println!();
            let table = toml::to_string_pretty(&config.governance)
                .context("Failed to serialize governance policy")?;
            println!("[governance]\n{table}");
            Ok(())
        }
    }
}
