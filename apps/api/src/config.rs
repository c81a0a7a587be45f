use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

/// Application configuration loaded from environment variables.
/// Nothing is required: a missing API key becomes an empty credential that the
/// Gemini API rejects at call time.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    /// Optional file whose content replaces the built-in refinement instruction.
    pub refine_instruction_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
    /// Sessions nobody has looked at for this long are closed.
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests never touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .unwrap_or_default();

        Ok(Config {
            gemini_api_key,
            gemini_api_base: lookup("GEMINI_API_BASE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            refine_instruction_path: lookup("REFINE_INSTRUCTION_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            session_ttl: Duration::from_secs(
                lookup("SESSION_TTL_SECS")
                    .map(|v| v.parse::<u64>())
                    .transpose()
                    .context("SESSION_TTL_SECS must be a whole number of seconds")?
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_SESSION_TTL_SECS),
            ),
        })
    }

    /// Reads the instruction override file, if one is configured.
    pub fn load_refine_instruction(&self) -> Result<Option<String>> {
        let Some(path) = &self.refine_instruction_path else {
            return Ok(None);
        };
        let text = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read refinement instruction from '{}'", path.display())
        })?;
        Ok(Some(text))
    }
}
