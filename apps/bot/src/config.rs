use std::time::Duration;

use anyhow::{Context, Result};

use crate::messaging::commands::POLL_TIMEOUT_SECS;

const DEFAULT_OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_OPENROUTER_MODEL: &str = "openai/gpt-oss-20b:free";
const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bot_token: String,
    pub openrouter_api_key: String,
    pub openrouter_api_url: String,
    pub openrouter_model: String,
    pub telegram_api_url: String,
    pub port: u16,
    pub rust_log: String,
    pub cycle_interval: Duration,
    pub request_timeout: Duration,
    pub run_once: bool,
    pub poll_commands: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            bot_token: require_env("BOT_TOKEN")?,
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            openrouter_api_url: env_or("OPENROUTER_API_URL", DEFAULT_OPENROUTER_API_URL),
            openrouter_model: env_or("OPENROUTER_MODEL", DEFAULT_OPENROUTER_MODEL),
            telegram_api_url: env_or("TELEGRAM_API_URL", DEFAULT_TELEGRAM_API_URL),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            cycle_interval: parse_secs(
                "CYCLE_INTERVAL_SECS",
                &env_or("CYCLE_INTERVAL_SECS", "86400"),
                0,
            )?,
            // getUpdates long-polls on the same client, so the timeout must outlast it
            request_timeout: parse_secs(
                "REQUEST_TIMEOUT_SECS",
                &env_or("REQUEST_TIMEOUT_SECS", "60"),
                POLL_TIMEOUT_SECS,
            )?,
            run_once: parse_flag("RUN_ONCE", &env_or("RUN_ONCE", "false"))?,
            poll_commands: parse_flag("POLL_COMMANDS", &env_or("POLL_COMMANDS", "true"))?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{key} must be a boolean, got '{other}'"),
    }
}

/// Parses a whole number of seconds that must be greater than `floor`.
fn parse_secs(key: &str, value: &str, floor: u64) -> Result<Duration> {
    let secs = value
        .trim()
        .parse::<u64>()
        .with_context(|| format!("{key} must be a whole number of seconds"))?;
    if secs <= floor {
        anyhow::bail!("{key} must be greater than {floor} seconds, got {secs}");
    }
    Ok(Duration::from_secs(secs))
}
