//! Command-line interface definitions for Global Tech Feed.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The API key can come from a flag or the environment.

use clap::Parser;

/// Command-line arguments for the Global Tech Feed application.
///
/// # Examples
///
/// ```sh
/// # Print the feed using a key from the environment
/// GEMINI_API_KEY=... global_tech_feed
///
/// # Open the detail view of article 3 and keep a JSON copy of the batch
/// global_tech_feed --api-key ... --select 3 -j ./feeds
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Model to use for generation and translation (overrides the config file)
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the Gemini API (overrides the config file)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Output directory for the JSON copy of the batch
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Write the rendered Markdown to this file instead of stdout
    #[arg(short, long)]
    pub markdown_output: Option<String>,

    /// Show the detail view of the article with this id
    #[arg(short, long)]
    pub select: Option<i64>,
}
