//! Provisioning core for `wpsite`, a local WordPress site scaffolder.
//!
//! The crate turns three answers (folder name, site title, database name)
//! into a ready-to-use local site:
//!
//! - **[`naming`]**: [`SiteSlug`] normalization and the derived default
//!   title and database name.
//! - **[`process`]**: [`CommandSpec`] (program + argument vector, never a
//!   shell string) and the [`CommandRunner`] seam; [`SystemRunner`] runs
//!   real child processes via `tokio::process`.
//! - **[`database`]**: [`DatabaseProvisioner`] and the sqlx-backed
//!   [`MySqlProvisioner`] issuing `CREATE DATABASE IF NOT EXISTS`.
//! - **[`wordpress`]** / **[`herd`]**: builders for the wp-cli and Herd
//!   invocations.
//! - **[`pipeline`]**: [`Provisioner`], which runs every [`Stage`] in order
//!   and stops at the first failure.
//!
//! Configuration arrives pre-built as a [`ProvisionConfig`]; this crate
//! never reads config files or talks to the terminal.

pub mod config;
pub mod database;
pub mod error;
pub mod herd;
pub mod naming;
pub mod pipeline;
pub mod process;
pub mod wordpress;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AdminAccount, DatabaseConfig, ProvisionConfig, ToolPaths};
pub use database::{DatabaseProvisioner, MySqlProvisioner};
pub use error::CoreError;
pub use herd::Herd;
pub use naming::{SiteRequest, SiteSlug, default_database_name, default_title};
pub use pipeline::{ProvisionReport, Provisioner, Stage, StageReporter};
pub use process::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
pub use wordpress::WpCli;
