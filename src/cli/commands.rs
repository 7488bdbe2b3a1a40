use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `editorial-governor` - governed drafting loop for technical blog posts.
#[derive(Parser, Debug)]
#[command(name = "editorial-governor")]
#[command(version)]
#[command(
    about = "Draft, critique and refine blog posts under an editorial policy.",
    long_about = None
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the governance loop for one topic
    Run {
        /// Topic to write about
        topic: String,

        /// Provider to use (openrouter, openai, groq, mistral, deepseek, ollama, custom:<url>)
        #[arg(short, long)]
        provider: Option<String>,

        /// Model to use
        #[arg(long)]
        model: Option<String>,

        /// Temperature (0.0 - 2.0)
        #[arg(short, long, value_parser = parse_temperature)]
        temperature: Option<f64>,
    },

    /// Check a topic against the blocked-topic list without generating anything
    Gate {
        /// Topic to check
        topic: String,
    },

    /// Run the structural check on a draft file
    Validate {
        /// Path to a Markdown or text draft
        file: PathBuf,
    },

    /// Show the effective configuration and governance policy
    Config,
}

fn parse_temperature(s: &str) -> Result<f64, String> {
    let t: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !(0.0..=2.0).contains(&t) {
        return Err("temperature must be between 0.0 and 2.0".to_string());
    }
    Ok(t)
}
