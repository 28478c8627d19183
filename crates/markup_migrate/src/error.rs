use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MigrateError>;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("{usage}")]
    Usage { usage: String },

    #[error("input file does not exist: {path}")]
    InputNotFound { path: PathBuf },

    #[error("error converting file {path}: {source}")]
    Conversion {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("invalid conversion tables ({origin}): {message}")]
    Tables { origin: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tag pattern: {0}")]
    Pattern(#[from] regex_lite::Error),
}

impl MigrateError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        1
    }

    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage { .. })
    }

    #[must_use]
    pub fn conversion(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Conversion {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn tables(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tables {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::MigrateError;

    #[test]
    fn usage_error_displays_usage_text_verbatim() {
        let error = MigrateError::Usage {
            usage: "Usage: markup_migrate <input-file> <output-file>".to_string(),
        };
        assert!(error.is_usage());
        assert_eq!(error.exit_code(), 1);
        assert_eq!(
            error.to_string(),
            "Usage: markup_migrate <input-file> <output-file>"
        );
    }

    #[test]
    fn conversion_error_carries_underlying_message() {
        let error = MigrateError::conversion(
            "/tmp/out.tsx",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(error.exit_code(), 1);
        assert!(!error.is_usage());
        let message = error.to_string();
        assert!(message.contains("/tmp/out.tsx"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn input_not_found_reports_path() {
        let error = MigrateError::InputNotFound {
            path: PathBuf::from("/tmp/missing.jsx"),
        };
        assert_eq!(error.to_string(), "input file does not exist: /tmp/missing.jsx");
    }

    #[test]
    fn invalid_argument_exits_with_failure() {
        let error = MigrateError::invalid("component name must be capitalized");
        assert_eq!(error.exit_code(), 1);
        assert_eq!(
            error.to_string(),
            "invalid argument: component name must be capitalized"
        );
    }

    #[test]
    fn tables_constructor_preserves_origin_and_message() {
        let error = MigrateError::tables("builtin", "duplicate token: p-4");
        assert!(matches!(
            &error,
            MigrateError::Tables { origin, message }
                if origin == "builtin" && message.contains("p-4")
        ));
    }
}
