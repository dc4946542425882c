// ── wp-cli command builders ──
//
// Pure builders: each returns the `CommandSpec` for one wp-cli call.
// Nothing here spawns a process.

use std::path::Path;

use secrecy::ExposeSecret;

use crate::config::{AdminAccount, DatabaseConfig};
use crate::naming::{SiteRequest, SiteSlug};
use crate::process::CommandSpec;

/// PHP appended to wp-config.php when debugging is enabled.
pub const DEBUG_PHP: &str = "define( 'WP_DEBUG', true );\ndefine( 'WP_DEBUG_LOG', true );\n";

/// wp-cli invoked through a configurable executable.
#[derive(Debug, Clone)]
pub struct WpCli {
    program: String,
}

impl WpCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self) -> CommandSpec {
        CommandSpec::new(self.program.as_str())
    }

    /// `wp core download --path=<slug>`, run from the parent directory.
    pub fn download_core(&self, workdir: &Path, slug: &SiteSlug) -> CommandSpec {
        self.command()
            .args(["core", "download"])
            .arg(format!("--path={slug}"))
            .current_dir(workdir)
    }

    /// `wp config create`, with the debug constants piped in as extra PHP.
    pub fn create_config(
        &self,
        site_dir: &Path,
        database_name: &str,
        database: &DatabaseConfig,
        debug: bool,
    ) -> CommandSpec {
        let mut spec = self
            .command()
            .args(["config", "create"])
            .arg(format!("--dbname={database_name}"))
            .arg(format!("--dbuser={}", database.user));

        let password = database.password.expose_secret();
        if !password.is_empty() {
            spec = spec.arg(format!("--dbpass={password}"));
        }
        spec = spec
            .arg(format!("--dbhost={}", database.wp_host()))
            .current_dir(site_dir);

        if debug {
            spec = spec.arg("--extra-php").stdin(DEBUG_PHP);
        }
        spec
    }

    /// `wp core install` for the site's local HTTPS URL.
    pub fn install(
        &self,
        site_dir: &Path,
        site: &SiteRequest,
        tld: &str,
        admin: &AdminAccount,
    ) -> CommandSpec {
        self.command()
            .args(["core", "install"])
            .arg(format!("--url={}", site.site_url(tld)))
            .arg(format!("--title={}", site.title))
            .arg(format!("--admin_user={}", admin.user))
            .arg(format!("--admin_password={}", admin.password.expose_secret()))
            .arg(format!("--admin_email={}", admin.email))
            .current_dir(site_dir)
    }

    /// `wp plugin delete --all`.
    pub fn delete_all_plugins(&self, site_dir: &Path) -> CommandSpec {
        self.command()
            .args(["plugin", "delete", "--all"])
            .current_dir(site_dir)
    }
}
