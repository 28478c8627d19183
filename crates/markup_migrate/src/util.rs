use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use fastapi_output::RichOutput;
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlmodel_console::OutputMode as SqlModelOutputMode;

use crate::error::{MigrateError, Result};

#[must_use]
pub fn now_utc_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[must_use]
pub fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputIntegration {
    pub fastapi_mode: String,
    pub fastapi_agent: bool,
    pub fastapi_ci: bool,
    pub fastapi_tty: bool,
    pub sqlmodel_mode: String,
    pub sqlmodel_agent: bool,
}

impl OutputIntegration {
    #[must_use]
    pub fn detect() -> Self {
        let fastapi_detection = fastapi_output::detect_environment();
        let fastapi_mode = fastapi_output::OutputMode::auto();
        let sqlmodel_mode = SqlModelOutputMode::detect();
        Self {
            fastapi_mode: fastapi_mode.as_str().to_string(),
            fastapi_agent: fastapi_detection.is_agent,
            fastapi_ci: fastapi_detection.is_ci,
            fastapi_tty: fastapi_detection.is_tty,
            sqlmodel_mode: sqlmodel_mode.as_str().to_string(),
            sqlmodel_agent: SqlModelOutputMode::is_agent_environment(),
        }
    }

    #[must_use]
    pub fn should_emit_json(&self) -> bool {
        self.sqlmodel_mode == "json"
    }
}

#[derive(Debug, Clone)]
pub struct CliOutput {
    inner: RichOutput,
    enabled: bool,
}

impl CliOutput {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            inner: RichOutput::auto(),
            enabled,
        }
    }

    pub fn rule(&self, title: Option<&str>) {
        if self.enabled {
            self.inner.rule(title);
        }
    }

    pub fn info(&self, message: &str) {
        if self.enabled {
            self.inner.info(message);
        }
    }

    pub fn success(&self, message: &str) {
        if self.enabled {
            self.inner.success(message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.enabled {
            self.inner.warning(message);
        }
    }
}

#[must_use]
pub fn output_for(integration: &OutputIntegration) -> CliOutput {
    CliOutput::new(!integration.should_emit_json())
}

/// Absolute form of `path`, resolved against the working directory.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|error| MigrateError::conversion(path, error))
}

/// Resolve `path` and require it to name an existing regular file.
pub fn ensure_input_file(path: &Path) -> Result<PathBuf> {
    let resolved = resolve_path(path)?;
    if resolved.is_file() {
        Ok(resolved)
    } else {
        Err(MigrateError::InputNotFound { path: resolved })
    }
}

/// Read UTF-8 text; invalid UTF-8 surfaces as a conversion error.
pub fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|error| MigrateError::conversion(path, error))
}

pub fn write_string(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|error| MigrateError::conversion(path, error))?;
    }
    fs::write(path, content).map_err(|error| MigrateError::conversion(path, error))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::tempdir;

    use crate::error::MigrateError;

    use super::{
        OutputIntegration, ensure_input_file, now_utc_iso, output_for, read_input, resolve_path,
        sha256_hex, write_string,
    };

    #[test]
    fn output_for_disables_human_output_when_json_mode_requested() {
        let json_integration = OutputIntegration {
            fastapi_mode: "plain".to_string(),
            fastapi_agent: true,
            fastapi_ci: false,
            fastapi_tty: false,
            sqlmodel_mode: "json".to_string(),
            sqlmodel_agent: true,
        };
        let human_integration = OutputIntegration {
            sqlmodel_mode: "plain".to_string(),
            ..json_integration.clone()
        };

        assert!(!output_for(&json_integration).enabled);
        assert!(output_for(&human_integration).enabled);
    }

    #[test]
    fn sha256_hex_matches_known_digest() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(sha256_hex("<div/>").len(), 64);
    }

    #[test]
    fn now_utc_iso_is_second_precision_utc() {
        let stamp = now_utc_iso();
        assert_eq!(stamp.len(), 20);
        assert!(stamp.ends_with('Z'));
    }

    #[test]
    fn resolve_path_makes_relative_paths_absolute() {
        let resolved = resolve_path(Path::new("some/relative.jsx")).expect("resolve");
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/relative.jsx"));
    }

    #[test]
    fn ensure_input_file_reports_absolute_missing_path() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("missing.jsx");
        let error = ensure_input_file(&missing).expect_err("missing input");
        assert!(matches!(
            &error,
            MigrateError::InputNotFound { path } if path.is_absolute() && path.ends_with("missing.jsx")
        ));
    }

    #[test]
    fn ensure_input_file_rejects_directories() {
        let temp = tempdir().expect("tempdir");
        let error = ensure_input_file(temp.path()).expect_err("directory input");
        assert!(matches!(error, MigrateError::InputNotFound { .. }));
    }

    #[test]
    fn read_input_rejects_invalid_utf8() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("bad.jsx");
        std::fs::write(&path, [0x3c, 0xff, 0xfe, 0x3e]).expect("write bytes");
        let error = read_input(&path).expect_err("invalid utf-8");
        assert!(matches!(error, MigrateError::Conversion { .. }));
    }

    #[test]
    fn write_string_creates_parent_dirs_and_overwrites() {
        let temp = tempdir().expect("tempdir");
        let target = temp.path().join("nested/dir/out.tsx");
        write_string(&target, "first").expect("first write");
        write_string(&target, "second").expect("second write");
        let content = std::fs::read_to_string(&target).expect("read file");
        assert_eq!(content, "second");
    }
}
