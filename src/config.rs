use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::PreloadError;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Comma-separated session identifiers. Preferred source.
    /// Env: `SESSION`. Default: empty.
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_string_lax")]
    pub session: String,

    /// Fallback for `session` when that one is empty.
    /// Env: `SESSION_ID`. Default: empty.
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_string_lax")]
    pub session_id: String,

    /// Base URL of the session generator service.
    /// Env: `SESSION_URL`. Only required when remote sessions are listed.
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_string_lax")]
    pub session_url: String,

    /// Database URL for SQLite.
    /// Env: `DATABASE_URL`. Default: `sqlite://data.db`.
    #[serde(default)]
    pub database_url: String,

    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// Env: `LOGLEVEL`. Default: `info`.
    #[serde(default)]
    pub loglevel: String,

    /// Optional upstream HTTP proxy. If set, used for the reqwest client.
    /// Env: `PROXY`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: String::new(),
            session_id: String::new(),
            session_url: String::new(),
            database_url: "sqlite://data.db".to_string(),
            loglevel: "info".to_string(),
            proxy: None,
        }
    }
}

impl Config {
    /// Builds a Figment that merges defaults and environment variables.
    /// Uses raw env mapping, so field names map to env vars in UPPER_SNAKE_CASE.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Env::raw())
    }

    /// Loads configuration from the environment (with defaults).
    pub fn from_env() -> Result<Self, PreloadError> {
        Ok(Self::figment().extract()?)
    }

    /// The settings the preloader actually consumes, with source precedence applied.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            sessions: first_non_empty([self.session.as_str(), self.session_id.as_str()])
                .unwrap_or_default()
                .to_string(),
            session_url: self.session_url.trim().to_string(),
        }
    }
}

/// Resolved preloader inputs, detached from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSettings {
    pub sessions: String,
    pub session_url: String,
}

impl SessionSettings {
    pub fn new(sessions: impl Into<String>, session_url: impl Into<String>) -> Self {
        Self {
            sessions: sessions.into(),
            session_url: session_url.into(),
        }
    }
}

/// Returns the first candidate that is not blank, in the order given.
pub fn first_non_empty<'a>(candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    candidates.into_iter().find(|c| !c.trim().is_empty())
}

fn deserialize_string_lax<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(serde::de::Error::custom("expected a string or a number")),
    }
}
