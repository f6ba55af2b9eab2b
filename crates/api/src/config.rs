use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use sitecopy_core::store::versions::DEFAULT_MAX_VERSIONS;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// Directory holding the canonical document, versions, previews and
    /// template content.
    pub content_dir: PathBuf,
    /// Basic-auth credentials for the admin API. Admin routes reject every
    /// request unless both are set.
    pub admin: Option<AdminCredentials>,
    /// Snapshots kept after each save.
    pub version_retention: usize,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
    pub llm: LlmConfig,
}

#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Chat-completions endpoint used for AI copy generation.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let admin = match (non_empty_var("ADMIN_USERNAME"), non_empty_var("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminCredentials { username, password }),
            _ => None,
        };

        let llm_defaults = LlmConfig::default();
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 3030)?,
            content_dir: env::var("CONTENT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            admin,
            version_retention: parse_var("VERSION_RETENTION", DEFAULT_MAX_VERSIONS)?,
            max_body_bytes: parse_var("MAX_BODY_BYTES", 2 * 1024 * 1024)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            llm: LlmConfig {
                api_url: non_empty_var("LLM_API_URL").unwrap_or(llm_defaults.api_url),
                api_key: non_empty_var("LLM_API_KEY"),
                model: non_empty_var("LLM_MODEL").unwrap_or(llm_defaults.model),
            },
        })
    }

    /// Configuration for a content directory with everything else defaulted.
    /// Used by tests and embedders.
    pub fn for_content_dir(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            content_dir: content_dir.into(),
            admin: None,
            version_retention: DEFAULT_MAX_VERSIONS,
            max_body_bytes: 2 * 1024 * 1024,
            log_level: "info".to_string(),
            llm: LlmConfig::default(),
        }
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty_var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a valid number, got {raw:?}")),
        None => Ok(default),
    }
}
