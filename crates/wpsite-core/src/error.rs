// ── Core error types ──
//
// User-facing errors from wpsite-core. Transport details (sqlx errors,
// raw io errors from child processes) are flattened into these variants
// so the binary never matches on third-party error types.

use thiserror::Error;

use crate::pipeline::Stage;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input ────────────────────────────────────────────────────────
    #[error("{message}")]
    Validation { message: String },

    // ── External commands ────────────────────────────────────────────
    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` {}", describe_exit(.code))]
    CommandFailed {
        command: String,
        /// Exit code, `None` when the process was terminated by a signal.
        code: Option<i32>,
        stderr: String,
    },

    // ── Database ─────────────────────────────────────────────────────
    #[error("Cannot connect to database server at {host}:{port}: {reason}")]
    DatabaseConnection {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("Failed to create database `{name}`: {reason}")]
    DatabaseQuery { name: String, reason: String },

    // ── Pipeline ─────────────────────────────────────────────────────
    #[error("{stage} failed")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<CoreError>,
    },
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Strip any `Stage` wrappers and return the underlying failure.
    pub fn root(&self) -> &CoreError {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

#[allow(clippy::ref_option)] // thiserror passes fields by reference
fn describe_exit(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".into(),
    }
}
