//! Error types for the Themekit CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=config, 3=not_found, 4=api, etc.)
//! - Context-aware recovery hints

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Themekit operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Shell scripts match on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Config (exit 2)
    ConfigError,

    // Not Found (exit 3)
    ThemeNotFound,

    // API (exit 4)
    ApiError,
    RateLimited,

    // Transport (exit 5)
    TransportError,

    // Sync (exit 6)
    SyncFailed,
    WatchError,
    SassError,

    // I/O (exit 8)
    IoError,
    YamlError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::ConfigError => "CONFIG_ERROR",
            Self::ThemeNotFound => "THEME_NOT_FOUND",
            Self::ApiError => "API_ERROR",
            Self::RateLimited => "RATE_LIMITED",
            Self::TransportError => "TRANSPORT_ERROR",
            Self::SyncFailed => "SYNC_FAILED",
            Self::WatchError => "WATCH_ERROR",
            Self::SassError => "SASS_ERROR",
            Self::IoError => "IO_ERROR",
            Self::YamlError => "YAML_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::ConfigError => 2,
            Self::ThemeNotFound => 3,
            Self::ApiError | Self::RateLimited => 4,
            Self::TransportError => 5,
            Self::SyncFailed | Self::WatchError | Self::SassError => 6,
            Self::IoError | Self::YamlError | Self::JsonError => 8,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in Themekit CLI operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("[{env}] argument {} {} required", .missing.join(", "), if .missing.len() == 1 { "is" } else { "are" })]
    MissingConfig {
        env: String,
        /// Flag spellings of the missing fields, e.g. `-a/--apikey`.
        missing: Vec<String>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Theme id #{theme_id} doesn't exist in the system")]
    ThemeNotFound { theme_id: u64 },

    #[error("{operation} failed{detail}")]
    Api {
        /// Human name of the gateway operation, e.g. "Uploading assets/base.css".
        operation: String,
        status: u16,
        /// Pre-formatted detail extracted from the response body
        /// (empty, or " -> ..." when the body carried field errors).
        detail: String,
    },

    #[error("{operation} rate limited after {attempts} attempts")]
    RateLimited { operation: String, attempts: u32 },

    #[error("Transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{failed} of {total} files failed to sync")]
    SyncFailed { failed: usize, total: usize },

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Sass processing failed: {0}")]
    Sass(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error on {}: {source}", .path.display())]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingConfig { .. } | Self::Config(_) => ErrorCode::ConfigError,
            Self::ThemeNotFound { .. } => ErrorCode::ThemeNotFound,
            Self::Api { .. } => ErrorCode::ApiError,
            Self::RateLimited { .. } => ErrorCode::RateLimited,
            Self::Http(_) => ErrorCode::TransportError,
            Self::SyncFailed { .. } => ErrorCode::SyncFailed,
            Self::Watch(_) => ErrorCode::WatchError,
            Self::Sass(_) => ErrorCode::SassError,
            Self::Io(_) | Self::IoAt { .. } => ErrorCode::IoError,
            Self::Yaml(_) => ErrorCode::YamlError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint for humans.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MissingConfig { .. } => Some(
                "Pass the missing flags on the command line or add them to \
                 config.yml under the current environment."
                    .to_string(),
            ),

            Self::ThemeNotFound { .. } => Some(
                "Use `themekit list` to see available theme ids, or \
                 `themekit init --name <name>` to create one."
                    .to_string(),
            ),

            Self::RateLimited { .. } => {
                Some("The store is rate limiting requests. Wait a moment and retry.".to_string())
            }

            Self::SyncFailed { .. } => Some(
                "Re-run without --strict to continue past individual file failures.".to_string(),
            ),

            Self::Sass(_) => {
                Some("Check that the `sass` executable is installed and on PATH.".to_string())
            }

            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_message_pluralizes() {
        let one = Error::MissingConfig {
            env: "development".to_string(),
            missing: vec!["-a/--apikey".to_string()],
        };
        assert_eq!(
            one.to_string(),
            "[development] argument -a/--apikey is required"
        );

        let two = Error::MissingConfig {
            env: "production".to_string(),
            missing: vec!["-a/--apikey".to_string(), "-t/--theme-id".to_string()],
        };
        assert_eq!(
            two.to_string(),
            "[production] argument -a/--apikey, -t/--theme-id are required"
        );
    }

    #[test]
    fn exit_codes_by_category() {
        let config = Error::Config("bad".to_string());
        assert_eq!(config.exit_code(), 2);

        let not_found = Error::ThemeNotFound { theme_id: 5 };
        assert_eq!(not_found.exit_code(), 3);

        let api = Error::Api {
            operation: "Uploading assets/base.css".to_string(),
            status: 400,
            detail: String::new(),
        };
        assert_eq!(api.exit_code(), 4);

        let sync = Error::SyncFailed { failed: 1, total: 3 };
        assert_eq!(sync.exit_code(), 6);
    }

    #[test]
    fn api_error_includes_detail() {
        let err = Error::Api {
            operation: "Uploading assets/base.css".to_string(),
            status: 400,
            detail: " -> \"content\": This field is required.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Uploading assets/base.css failed -> \"content\": This field is required."
        );
    }
}
