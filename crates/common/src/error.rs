//! Error types shared across Heatlens crates.

use std::path::PathBuf;

/// Top-level error type for Heatlens operations.
#[derive(Debug, thiserror::Error)]
pub enum HeatError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Render surface unavailable: {message}")]
    SurfaceUnavailable { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Invalid snapshot: {message}")]
    InvalidSnapshot { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using HeatError.
pub type HeatResult<T> = Result<T, HeatError>;

impl HeatError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn surface_unavailable(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn invalid_snapshot(msg: impl Into<String>) -> Self {
        Self::InvalidSnapshot {
            message: msg.into(),
        }
    }

    /// Whether this error is a configuration problem raised at construction time.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = HeatError::config("viewport width must be > 0");
        assert_eq!(
            err.to_string(),
            "Configuration error: viewport width must be > 0"
        );
        assert!(err.is_config());

        let err = HeatError::surface_unavailable("context lost");
        assert!(!err.is_config());
        assert!(err.to_string().contains("context lost"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: HeatError = parse.into();
        assert!(matches!(err, HeatError::Json(_)));
    }
}
