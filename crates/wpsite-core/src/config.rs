// ── Runtime provisioning configuration ──
//
// These types describe *where* a site is created and *which* credentials
// and tools are used. They never touch disk: the binary builds a
// `ProvisionConfig` from its config layer and hands it in.

use std::path::PathBuf;

use secrecy::SecretString;

/// Default MySQL port; omitted from `--dbhost` when in use.
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Connection settings for the local database server.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: DEFAULT_MYSQL_PORT,
            user: "root".into(),
            password: SecretString::from(String::new()),
        }
    }
}

impl DatabaseConfig {
    /// Host as passed to `wp config create --dbhost`.
    pub fn wp_host(&self) -> String {
        if self.port == DEFAULT_MYSQL_PORT {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Administrator account created by `wp core install`.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub user: String,
    pub password: SecretString,
    pub email: String,
}

impl Default for AdminAccount {
    fn default() -> Self {
        Self {
            user: "admin".into(),
            password: SecretString::from("admin".to_owned()),
            email: "admin@email.com".into(),
        }
    }
}

/// Executables invoked by the pipeline (name on PATH or absolute path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub wp: String,
    pub herd: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            wp: "wp".into(),
            herd: "herd".into(),
        }
    }
}

/// Everything the pipeline needs besides the per-site request.
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    /// Directory the site folder is created in.
    pub workdir: PathBuf,
    pub database: DatabaseConfig,
    pub admin: AdminAccount,
    /// Local top-level domain, without the leading dot.
    pub tld: String,
    /// Inject `WP_DEBUG` / `WP_DEBUG_LOG` into wp-config.php.
    pub debug: bool,
    pub remove_default_plugins: bool,
    pub secure: bool,
    pub tools: ToolPaths,
}

impl ProvisionConfig {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            database: DatabaseConfig::default(),
            admin: AdminAccount::default(),
            tld: "test".into(),
            debug: true,
            remove_default_plugins: true,
            secure: true,
            tools: ToolPaths::default(),
        }
    }
}
