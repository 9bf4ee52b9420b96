use reqwest::StatusCode;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PreloadError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("SESSION_URL is required for remote sessions")]
    MissingSessionUrl,

    #[error("Session not found or expired")]
    SessionNotFound,

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),
}

impl PreloadError {
    /// True when the session generator reported the session as unknown.
    pub fn is_not_found(&self) -> bool {
        match self {
            PreloadError::SessionNotFound => true,
            PreloadError::UpstreamStatus(code) => *code == StatusCode::NOT_FOUND,
            _ => false,
        }
    }
}

impl From<figment::Error> for PreloadError {
    fn from(e: figment::Error) -> Self {
        PreloadError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_covers_status_variants() {
        assert!(PreloadError::SessionNotFound.is_not_found());
        assert!(PreloadError::UpstreamStatus(StatusCode::NOT_FOUND).is_not_found());
        assert!(!PreloadError::UpstreamStatus(StatusCode::BAD_GATEWAY).is_not_found());
        assert!(!PreloadError::MissingSessionUrl.is_not_found());
    }
}
