// ── Provisioning pipeline ──
//
// Stages run strictly in order and each is awaited before the next one
// starts. The first failure stops the pipeline and is returned wrapped in
// `CoreError::Stage`; nothing is rolled back.

use std::path::PathBuf;

use strum::{Display, EnumIter};

use crate::config::ProvisionConfig;
use crate::database::DatabaseProvisioner;
use crate::error::CoreError;
use crate::herd::Herd;
use crate::naming::SiteRequest;
use crate::process::{CommandRunner, CommandSpec};
use crate::wordpress::WpCli;

// ── Stage ───────────────────────────────────────────────────────────

/// One provisioning step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Stage {
    #[strum(to_string = "Create database")]
    CreateDatabase,
    #[strum(to_string = "Download WordPress")]
    DownloadCore,
    #[strum(to_string = "Write wp-config.php")]
    WriteConfig,
    #[strum(to_string = "Install WordPress")]
    Install,
    #[strum(to_string = "Remove default plugins")]
    RemovePlugins,
    #[strum(to_string = "Secure local domain")]
    SecureDomain,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::CreateDatabase,
        Stage::DownloadCore,
        Stage::WriteConfig,
        Stage::Install,
        Stage::RemovePlugins,
        Stage::SecureDomain,
    ];
}

// ── Reporting ───────────────────────────────────────────────────────

/// Progress callbacks. Every method defaults to a no-op; `()` reports nothing.
pub trait StageReporter {
    fn stage_started(&self, _stage: Stage) {}
    fn stage_finished(&self, _stage: Stage, _summary: Option<&str>) {}
    fn stage_skipped(&self, _stage: Stage) {}
    fn stage_failed(&self, _stage: Stage, _error: &CoreError) {}
}

impl StageReporter for () {}

/// Outcome of a completed pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub url: String,
    pub path: PathBuf,
    pub completed: Vec<Stage>,
    pub skipped: Vec<Stage>,
}

// ── Provisioner ─────────────────────────────────────────────────────

/// Drives a site through every [`Stage`].
pub struct Provisioner<R, D> {
    config: ProvisionConfig,
    runner: R,
    database: D,
    wp: WpCli,
    herd: Herd,
}

impl<R: CommandRunner, D: DatabaseProvisioner> Provisioner<R, D> {
    pub fn new(config: ProvisionConfig, runner: R, database: D) -> Self {
        let wp = WpCli::new(config.tools.wp.as_str());
        let herd = Herd::new(config.tools.herd.as_str());
        Self {
            config,
            runner,
            database,
            wp,
            herd,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    /// Folder the site is created in.
    pub fn site_dir(&self, site: &SiteRequest) -> PathBuf {
        self.config.workdir.join(site.slug.as_str())
    }

    fn is_enabled(&self, stage: Stage) -> bool {
        match stage {
            Stage::RemovePlugins => self.config.remove_default_plugins,
            Stage::SecureDomain => self.config.secure,
            _ => true,
        }
    }

    /// The external command for a stage; `None` for the database stage.
    pub fn command_for(&self, stage: Stage, site: &SiteRequest) -> Option<CommandSpec> {
        let site_dir = self.site_dir(site);
        let spec = match stage {
            Stage::CreateDatabase => return None,
            Stage::DownloadCore => self.wp.download_core(&self.config.workdir, &site.slug),
            Stage::WriteConfig => self.wp.create_config(
                &site_dir,
                &site.database,
                &self.config.database,
                self.config.debug,
            ),
            Stage::Install => {
                self.wp
                    .install(&site_dir, site, &self.config.tld, &self.config.admin)
            }
            Stage::RemovePlugins => self.wp.delete_all_plugins(&site_dir),
            Stage::SecureDomain => self.herd.secure(&site_dir),
        };
        Some(spec)
    }

    #[allow(clippy::future_not_send)]
    async fn run_stage(&self, stage: Stage, site: &SiteRequest) -> Result<Option<String>, CoreError> {
        match self.command_for(stage, site) {
            None => {
                self.database.create_database(&site.database).await?;
                Ok(Some(format!("Database `{}` is ready", site.database)))
            }
            Some(spec) => {
                let output = self.runner.run(&spec).await?;
                Ok(output.summary().map(str::to_owned))
            }
        }
    }

    /// Run every stage for `site`, stopping at the first failure.
    #[allow(clippy::future_not_send)]
    pub async fn provision(
        &self,
        site: &SiteRequest,
        reporter: &(impl StageReporter + Sync),
    ) -> Result<ProvisionReport, CoreError> {
        let mut completed = Vec::new();
        let mut skipped = Vec::new();

        for stage in Stage::ALL {
            if !self.is_enabled(stage) {
                tracing::info!(%stage, "stage disabled, skipping");
                reporter.stage_skipped(stage);
                skipped.push(stage);
                continue;
            }

            tracing::info!(%stage, site = %site.slug, "starting stage");
            reporter.stage_started(stage);

            match self.run_stage(stage, site).await {
                Ok(summary) => {
                    reporter.stage_finished(stage, summary.as_deref());
                    completed.push(stage);
                }
                Err(err) => {
                    tracing::error!(%stage, error = %err, "stage failed");
                    reporter.stage_failed(stage, &err);
                    return Err(CoreError::Stage {
                        stage,
                        source: Box::new(err),
                    });
                }
            }
        }

        Ok(ProvisionReport {
            url: site.site_url(&self.config.tld),
            path: self.site_dir(site),
            completed,
            skipped,
        })
    }
}
