//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use wpsite_config::ConfigError;
use wpsite_core::{CoreError, Stage};

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const CONFIG: u8 = 3;
    pub const DATABASE: u8 = 4;
    pub const TOOL: u8 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input ────────────────────────────────────────────────────────

    #[error("Prompt failed: {reason}")]
    #[diagnostic(
        code(wpsite::prompt),
        help("wpsite is interactive; run it from a terminal.")
    )]
    Prompt { reason: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wpsite::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid configuration: {reason}")]
    #[diagnostic(
        code(wpsite::config),
        help("Check the configuration file at {path} and any WPSITE_* environment variables.")
    )]
    Config { path: String, reason: String },

    // ── Database ─────────────────────────────────────────────────────

    #[error("{stage}: cannot connect to MySQL at {host}:{port}")]
    #[diagnostic(
        code(wpsite::database::connection),
        help(
            "Is the database server running?\n\
             Server said: {reason}\n\
             Adjust [database] in the config file or WPSITE_DATABASE__* variables."
        )
    )]
    DatabaseConnection {
        stage: Stage,
        host: String,
        port: u16,
        reason: String,
    },

    #[error("{stage}: could not create database `{name}`")]
    #[diagnostic(code(wpsite::database::query), help("Server said: {reason}"))]
    DatabaseQuery {
        stage: Stage,
        name: String,
        reason: String,
    },

    // ── External tools ───────────────────────────────────────────────

    #[error("{stage}: could not run `{program}`")]
    #[diagnostic(
        code(wpsite::tool::missing),
        help(
            "Make sure `{program}` is installed and on your PATH,\n\
             or point [tools] in the config file at it."
        )
    )]
    ToolMissing {
        stage: Stage,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage}: {message}")]
    #[diagnostic(code(wpsite::tool::failed), help("{output}"))]
    ToolFailed {
        stage: Stage,
        message: String,
        output: String,
    },

    // ── Catch-all ────────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(wpsite::core))]
    Core(CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Prompt { .. } | Self::Validation { .. } => exit_code::USAGE,
            Self::Config { .. } => exit_code::CONFIG,
            Self::DatabaseConnection { .. } | Self::DatabaseQuery { .. } => exit_code::DATABASE,
            Self::ToolMissing { .. } | Self::ToolFailed { .. } => exit_code::TOOL,
            Self::Core(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }

    /// Wrap a configuration failure, remembering which file was read.
    pub fn config(path: &std::path::Path, err: &ConfigError) -> Self {
        Self::Config {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Prompt {
        reason: e.to_string(),
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Stage { stage, source } => from_stage(stage, *source),
            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            other => CliError::Core(other),
        }
    }
}

fn from_stage(stage: Stage, err: CoreError) -> CliError {
    match err {
        CoreError::Spawn { program, source } => CliError::ToolMissing {
            stage,
            program,
            source,
        },
        CoreError::CommandFailed {
            ref stderr,
            ..
        } => {
            let output = if stderr.is_empty() {
                "The command produced no error output; rerun with -vv for details.".to_owned()
            } else {
                stderr.clone()
            };
            CliError::ToolFailed {
                stage,
                message: err.to_string(),
                output,
            }
        }
        CoreError::DatabaseConnection { host, port, reason } => CliError::DatabaseConnection {
            stage,
            host,
            port,
            reason,
        },
        CoreError::DatabaseQuery { name, reason } => CliError::DatabaseQuery {
            stage,
            name,
            reason,
        },
        CoreError::Validation { message } => CliError::Validation {
            field: stage.to_string(),
            reason: message,
        },
        CoreError::Stage { stage, source } => from_stage(stage, *source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_command_maps_to_tool_error_with_stderr() {
        let err = CoreError::Stage {
            stage: Stage::DownloadCore,
            source: Box::new(CoreError::CommandFailed {
                command: "wp core download --path=my-blog".into(),
                code: Some(1),
                stderr: "Error: Could not create directory.".into(),
            }),
        };
        let cli: CliError = err.into();
        assert_eq!(cli.exit_code(), exit_code::TOOL);
        assert_eq!(
            cli.to_string(),
            "Download WordPress: `wp core download --path=my-blog` exited with status 1"
        );
        match cli {
            CliError::ToolFailed { output, .. } => {
                assert_eq!(output, "Error: Could not create directory.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn spawn_failure_maps_to_missing_tool() {
        let err = CoreError::Stage {
            stage: Stage::SecureDomain,
            source: Box::new(CoreError::Spawn {
                program: "herd".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        };
        let cli = CliError::from(err);
        assert!(matches!(cli, CliError::ToolMissing { ref program, .. } if program == "herd"));
        assert_eq!(cli.exit_code(), exit_code::TOOL);
    }

    #[test]
    fn database_errors_use_database_exit_code() {
        let err = CoreError::Stage {
            stage: Stage::CreateDatabase,
            source: Box::new(CoreError::DatabaseConnection {
                host: "127.0.0.1".into(),
                port: 3306,
                reason: "Connection refused".into(),
            }),
        };
        let cli = CliError::from(err);
        assert_eq!(cli.exit_code(), exit_code::DATABASE);
        assert_eq!(
            cli.to_string(),
            "Create database: cannot connect to MySQL at 127.0.0.1:3306"
        );
    }

    #[test]
    fn stage_validation_is_a_usage_error() {
        let err = CoreError::Stage {
            stage: Stage::CreateDatabase,
            source: Box::new(CoreError::Validation {
                message: "Database name cannot be empty".into(),
            }),
        };
        assert_eq!(CliError::from(err).exit_code(), exit_code::USAGE);
    }

    #[test]
    fn prompt_errors_are_usage_errors() {
        assert_eq!(prompt_err("not a terminal").exit_code(), exit_code::USAGE);
    }
}
