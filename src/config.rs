use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "chatlog-inspector", version, about)]
pub struct Cli {
    /// Path to configuration file
    #[clap(long, default_value = "./config.toml")]
    pub config: PathBuf,

    /// Override path of the captured log file to view
    #[clap(long)]
    pub log_file: Option<String>,

    /// Override the conversation document id
    #[clap(long)]
    pub document_id: Option<String>,

    /// Inspect the activity with this id after rendering
    #[clap(long)]
    pub inspect: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub log_file: String,
    pub document_id: String,
}

pub fn load_config(cli: &Cli) -> Result<Config> {
    let config_content = fs::read_to_string(&cli.config)
        .with_context(|| format!("Failed to read config file: {:?}", cli.config))?;

    let mut config: Config =
        toml::from_str(&config_content).context("Failed to parse config file")?;

    // Apply CLI overrides
    if let Some(ref log_file) = cli.log_file {
        config.log_file = log_file.clone();
    }

    if let Some(ref document_id) = cli.document_id {
        config.document_id = document_id.clone();
    }

    Ok(config)
}
