//! Configuration for wpsite.
//!
//! Built-in defaults, an optional TOML file and `WPSITE_*` environment
//! variables are layered with figment, then translated into
//! `wpsite_core::ProvisionConfig`. The defaults reproduce a stock local
//! setup: MySQL root with no password on 127.0.0.1, an `admin`/`admin`
//! administrator, `.test` domains served by Herd.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wpsite_core::{AdminAccount, DatabaseConfig, ProvisionConfig, ToolPaths};

/// Prefix for environment overrides, e.g. `WPSITE_DATABASE__HOST`.
pub const ENV_PREFIX: &str = "WPSITE_";

/// Keys whose environment values are taken verbatim. figment would parse
/// `123456` as an integer and `007` as `7`.
const VERBATIM_ENV_KEYS: [&str; 4] = [
    "database.user",
    "database.password",
    "admin.user",
    "admin.password",
];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseSection,

    #[serde(default)]
    pub admin: AdminSection,

    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub tools: ToolsSection,
}

/// `[database]`: server the site database is created on.
#[derive(Debug, Deserialize, Serialize)]
pub struct DatabaseSection {
    #[serde(default = "default_db_host")]
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default = "default_db_user")]
    pub user: String,

    /// Password (plaintext -- prefer `password_env`).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: None,
            password_env: None,
        }
    }
}

fn default_db_host() -> String {
    "127.0.0.1".into()
}
fn default_db_port() -> u16 {
    wpsite_core::config::DEFAULT_MYSQL_PORT
}
fn default_db_user() -> String {
    "root".into()
}

/// `[admin]`: WordPress administrator created at install time.
#[derive(Debug, Deserialize, Serialize)]
pub struct AdminSection {
    #[serde(default = "default_admin_user")]
    pub user: String,

    #[serde(default = "default_admin_password")]
    pub password: String,

    #[serde(default = "default_admin_email")]
    pub email: String,
}

impl Default for AdminSection {
    fn default() -> Self {
        Self {
            user: default_admin_user(),
            password: default_admin_password(),
            email: default_admin_email(),
        }
    }
}

fn default_admin_user() -> String {
    "admin".into()
}
fn default_admin_password() -> String {
    "admin".into()
}
fn default_admin_email() -> String {
    "admin@email.com".into()
}

/// `[site]`: where sites go and which optional stages run.
#[derive(Debug, Deserialize, Serialize)]
pub struct SiteSection {
    /// Local top-level domain (`test` → `https://<slug>.test`).
    #[serde(default = "default_tld")]
    pub tld: String,

    /// Parent directory for new sites. Defaults to the working directory.
    pub sites_dir: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub debug: bool,

    #[serde(default = "default_true")]
    pub remove_default_plugins: bool,

    #[serde(default = "default_true")]
    pub secure: bool,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            tld: default_tld(),
            sites_dir: None,
            debug: true,
            remove_default_plugins: true,
            secure: true,
        }
    }
}

fn default_tld() -> String {
    "test".into()
}
fn default_true() -> bool {
    true
}

/// `[tools]`: executables for wp-cli and Herd.
#[derive(Debug, Deserialize, Serialize)]
pub struct ToolsSection {
    #[serde(default = "default_wp")]
    pub wp: String,

    #[serde(default = "default_herd")]
    pub herd: String,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            wp: default_wp(),
            herd: default_herd(),
        }
    }
}

fn default_wp() -> String {
    "wp".into()
}
fn default_herd() -> String {
    "herd".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "wpsite", "wpsite").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("wpsite");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from defaults, the file at `path`, and environment.
///
/// A missing file is not an error; a malformed one is.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let env = Env::prefixed(ENV_PREFIX).split("__");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(env.clone().ignore(&VERBATIM_ENV_KEYS));

    let mut config: Config = figment.extract()?;
    apply_verbatim_env(
        &mut config,
        env.only(&VERBATIM_ENV_KEYS)
            .iter()
            .map(|(key, value)| (key.into_string(), value)),
    );
    Ok(config)
}

/// Overlay unparsed `(dotted key, value)` environment pairs.
fn apply_verbatim_env(config: &mut Config, vars: impl IntoIterator<Item = (String, String)>) {
    for (key, value) in vars {
        match key.as_str() {
            "database.user" => config.database.user = value,
            "database.password" => config.database.password = Some(value),
            "admin.user" => config.admin.user = value,
            "admin.password" => config.admin.password = value,
            _ => {}
        }
    }
}

// ── Translation into core types ─────────────────────────────────────

/// Resolve the database password: `password_env` → plaintext → empty.
pub fn resolve_database_password(section: &DatabaseSection) -> SecretString {
    if let Some(ref env_name) = section.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return SecretString::from(val);
        }
    }

    SecretString::from(section.password.clone().unwrap_or_default())
}

/// Build a `ProvisionConfig` from a loaded `Config`.
///
/// `cwd` is the fallback parent directory when `site.sites_dir` is unset.
/// This is the single boundary where config types cross into core types.
pub fn to_provision_config(config: &Config, cwd: &Path) -> Result<ProvisionConfig, ConfigError> {
    let tld = config.site.tld.trim().trim_start_matches('.');
    if tld.is_empty() {
        return Err(ConfigError::Validation {
            field: "site.tld".into(),
            reason: "top-level domain cannot be empty".into(),
        });
    }

    if config.database.port == 0 {
        return Err(ConfigError::Validation {
            field: "database.port".into(),
            reason: "port must be between 1 and 65535".into(),
        });
    }

    if !config.admin.email.contains('@') {
        return Err(ConfigError::Validation {
            field: "admin.email".into(),
            reason: format!("'{}' is not an email address", config.admin.email),
        });
    }

    let workdir = match config.site.sites_dir {
        Some(ref dir) if dir.is_absolute() => dir.clone(),
        Some(ref dir) => cwd.join(dir),
        None => cwd.to_path_buf(),
    };

    Ok(ProvisionConfig {
        workdir,
        database: DatabaseConfig {
            host: config.database.host.clone(),
            port: config.database.port,
            user: config.database.user.clone(),
            password: resolve_database_password(&config.database),
        },
        admin: AdminAccount {
            user: config.admin.user.clone(),
            password: SecretString::from(config.admin.password.clone()),
            email: config.admin.email.clone(),
        },
        tld: tld.to_owned(),
        debug: config.site.debug,
        remove_default_plugins: config.site.remove_default_plugins,
        secure: config.site.secure,
        tools: ToolPaths {
            wp: config.tools.wp.clone(),
            herd: config.tools.herd.clone(),
        },
    })
}
