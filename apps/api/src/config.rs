use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// The closed set of supported LLM providers. Picked once at startup;
/// there is no per-request provider switching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenAi,
    Gemini,
}

impl FromStr for AiProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(AiProvider::OpenAi),
            "gemini" => Ok(AiProvider::Gemini),
            other => bail!("Invalid AI_PROVIDER '{other}'. Use 'gemini' or 'openai'."),
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiProvider::OpenAi => write!(f, "openai"),
            AiProvider::Gemini => write!(f, "gemini"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// A missing required variable, an unknown AI_PROVIDER, or a provider
/// without its API key fails startup before the server binds.
#[derive(Debug, Clone)]
pub struct Config {
    pub ai_provider: AiProvider,
    pub ai_api_key: String,
    pub s3_bucket: String,
    pub s3_endpoint: Option<String>,
    pub aws_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub render_timeout_secs: u64,
    pub chrome_executable: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let ai_provider: AiProvider = require_env("AI_PROVIDER")?.parse()?;
        let ai_api_key = match ai_provider {
            AiProvider::OpenAi => {
                require_env("OPENAI_API_KEY").context("OpenAI API key not configured")?
            }
            AiProvider::Gemini => {
                require_env("GEMINI_API_KEY").context("Gemini API key not configured")?
            }
        };

        Ok(Config {
            ai_provider,
            ai_api_key,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: std::env::var("S3_ENDPOINT").ok(),
            aws_region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            upload_dir: PathBuf::from(
                std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            ),
            output_dir: PathBuf::from(
                std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "generated".to_string()),
            ),
            render_timeout_secs: std::env::var("RENDER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("RENDER_TIMEOUT_SECS must be a number of seconds")?,
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parses_known_values_case_insensitively() {
        assert_eq!("openai".parse::<AiProvider>().unwrap(), AiProvider::OpenAi);
        assert_eq!("Gemini".parse::<AiProvider>().unwrap(), AiProvider::Gemini);
        assert_eq!("OPENAI".parse::<AiProvider>().unwrap(), AiProvider::OpenAi);
    }

    #[test]
    fn test_unknown_provider_is_a_configuration_error() {
        let err = "claude".parse::<AiProvider>().unwrap_err();
        assert!(err.to_string().contains("Invalid AI_PROVIDER"));
    }
}
