// ── Database provisioning ──
//
// A single connection and a single `CREATE DATABASE IF NOT EXISTS`.
// Database names cannot be bound as statement parameters, so the name is
// validated and quoted as an identifier before it reaches the server.

use std::future::Future;

use secrecy::ExposeSecret;
use sqlx::Connection;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};

use crate::config::DatabaseConfig;
use crate::error::CoreError;

/// MySQL limit for database identifiers, in characters.
pub const MAX_DATABASE_NAME_LEN: usize = 64;

/// Creates the database backing a new site.
///
/// The returned future is awaited on the caller's task and need not be `Send`.
pub trait DatabaseProvisioner {
    fn create_database(&self, name: &str) -> impl Future<Output = Result<(), CoreError>>;
}

/// Check a database name before any connection is attempted.
pub fn validate_database_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::validation("Database name cannot be empty"));
    }
    let len = name.chars().count();
    if len > MAX_DATABASE_NAME_LEN {
        return Err(CoreError::validation(format!(
            "Database name is {len} characters long; MySQL allows at most {MAX_DATABASE_NAME_LEN}"
        )));
    }
    Ok(())
}

/// Quote a name as a MySQL identifier: `` my`db `` → `` `my``db` ``.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// The statement issued for `name`.
pub fn create_database_sql(name: &str) -> String {
    format!("CREATE DATABASE IF NOT EXISTS {}", quote_identifier(name))
}

// ── MySQL ───────────────────────────────────────────────────────────

/// Provisioner speaking the MySQL wire protocol via sqlx.
#[derive(Debug, Clone)]
pub struct MySqlProvisioner {
    config: DatabaseConfig,
}

impl MySqlProvisioner {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .username(&self.config.user);
        let password = self.config.password.expose_secret();
        if password.is_empty() {
            options
        } else {
            options.password(password)
        }
    }
}

impl DatabaseProvisioner for MySqlProvisioner {
    async fn create_database(&self, name: &str) -> Result<(), CoreError> {
        validate_database_name(name)?;

        tracing::debug!(
            host = %self.config.host,
            port = self.config.port,
            user = %self.config.user,
            "connecting to database server"
        );
        let mut conn = MySqlConnection::connect_with(&self.connect_options())
            .await
            .map_err(|e| CoreError::DatabaseConnection {
                host: self.config.host.clone(),
                port: self.config.port,
                reason: e.to_string(),
            })?;

        let sql = create_database_sql(name);
        tracing::debug!(%sql, "creating database");
        sqlx::raw_sql(&sql)
            .execute(&mut conn)
            .await
            .map_err(|e| CoreError::DatabaseQuery {
                name: name.to_owned(),
                reason: e.to_string(),
            })?;

        if let Err(e) = conn.close().await {
            tracing::warn!(error = %e, "failed to close database connection cleanly");
        }

        tracing::info!(database = name, "database ready");
        Ok(())
    }
}
