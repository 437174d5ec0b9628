//! Structured error types shared across labbook crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`LabError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (keys, paths, sizes).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for labbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum LabError {
    /// A sweep template violates the axis rules.
    #[error("invalid template: {0}")]
    InvalidTemplate(ErrorInfo),
    /// A naming policy is malformed.
    #[error("invalid policy: {0}")]
    InvalidPolicy(ErrorInfo),
    /// An artifact could not be loaded or parsed.
    #[error("load failure: {0}")]
    Load(ErrorInfo),
    /// A derived-field extractor failed.
    #[error("extractor failure: {0}")]
    Extractor(ErrorInfo),
    /// Project discovery, activation or initialisation errors.
    #[error("project error: {0}")]
    Project(ErrorInfo),
    /// Filesystem errors outside of artifact loading.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl LabError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            LabError::InvalidTemplate(info)
            | LabError::InvalidPolicy(info)
            | LabError::Load(info)
            | LabError::Extractor(info)
            | LabError::Project(info)
            | LabError::Io(info)
            | LabError::Serde(info) => info,
        }
    }

    /// Wraps an I/O failure on `path` under the given code.
    pub fn io(code: &str, path: &std::path::Path, err: impl ToString) -> Self {
        LabError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
        )
    }
}
