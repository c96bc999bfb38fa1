//! Error model for the faf crates.
//!
//! Recoverable findings are [`Diagnostic`]s collected on the result; only
//! conditions that stop a compilation (or a config/IO operation) become a
//! [`FafError`]. The CLI wraps it with `color-eyre`.

use std::path::PathBuf;

use crate::types::Diagnostic;

#[derive(Debug, thiserror::Error)]
pub enum FafError {
    /// `~/.faf/faf.toml` could not be located, parsed or written.
    #[error("config error: {message}")]
    Config { message: String },

    /// The project inspector could not examine a directory.
    #[error("discovery failed: {0}")]
    Discovery(String),

    #[error("cannot access {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Fatal compilation failure with every diagnostic recorded before the abort.
    #[error("compilation failed: {message}")]
    Compile {
        message: String,
        diagnostics: Vec<Diagnostic>,
    },
}

pub type Result<T> = std::result::Result<T, FafError>;

impl FafError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// Attach the offending path to an I/O failure.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Diagnostics carried by a compile failure; empty otherwise.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Compile { diagnostics, .. } => diagnostics,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let err = FafError::config("could not determine home directory");
        assert_eq!(err.to_string(), "config error: could not determine home directory");

        let err = FafError::io(
            "/srv/app/project.faf",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(err.to_string().starts_with("cannot access \"/srv/app/project.faf\""));
    }

    #[test]
    fn compile_error_keeps_diagnostics() {
        let err = FafError::Compile {
            message: "document root must be a mapping".into(),
            diagnostics: vec![Diagnostic::error("Invalid document: root must be a mapping")],
        };
        assert!(err.to_string().starts_with("compilation failed"));
        assert_eq!(err.diagnostics().len(), 1);
        assert!(FafError::discovery("boom").diagnostics().is_empty());
    }
}
