//! Pipeline tests with recording fakes in place of wp-cli, Herd and MySQL.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use pretty_assertions::assert_eq;

use wpsite_core::{
    CommandOutput, CommandRunner, CommandSpec, CoreError, DatabaseConfig, DatabaseProvisioner,
    MySqlProvisioner, ProvisionConfig, Provisioner, SiteRequest, SiteSlug, Stage, StageReporter,
};

// ── Fakes ───────────────────────────────────────────────────────────

/// Records every command and fails the first one whose args contain `fail_on`.
#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    fail_on: Option<&'static str>,
}

impl RecordingRunner {
    fn failing_on(arg: &'static str) -> Self {
        Self {
            calls: Mutex::default(),
            fail_on: Some(arg),
        }
    }

    fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CoreError> {
        self.calls.lock().unwrap().push(spec.clone());
        if let Some(needle) = self.fail_on {
            if spec.args.iter().any(|a| a == needle) {
                return Err(CoreError::CommandFailed {
                    command: spec.to_string(),
                    code: Some(1),
                    stderr: format!("Error: simulated failure on {needle}"),
                });
            }
        }
        Ok(CommandOutput {
            code: Some(0),
            stdout: format!("Success: {} done.\n", spec.args.join(" ")),
            stderr: String::new(),
        })
    }
}

#[derive(Default)]
struct RecordingDatabase {
    created: Mutex<Vec<String>>,
    unreachable: bool,
}

impl DatabaseProvisioner for RecordingDatabase {
    async fn create_database(&self, name: &str) -> Result<(), CoreError> {
        if self.unreachable {
            return Err(CoreError::DatabaseConnection {
                host: "127.0.0.1".into(),
                port: 3306,
                reason: "Connection refused".into(),
            });
        }
        self.created.lock().unwrap().push(name.to_owned());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl StageReporter for RecordingReporter {
    fn stage_started(&self, stage: Stage) {
        self.events.lock().unwrap().push(format!("start {stage}"));
    }
    fn stage_finished(&self, stage: Stage, _summary: Option<&str>) {
        self.events.lock().unwrap().push(format!("done {stage}"));
    }
    fn stage_skipped(&self, stage: Stage) {
        self.events.lock().unwrap().push(format!("skip {stage}"));
    }
    fn stage_failed(&self, stage: Stage, _error: &CoreError) {
        self.events.lock().unwrap().push(format!("fail {stage}"));
    }
}

fn my_blog() -> SiteRequest {
    SiteRequest::with_defaults(SiteSlug::parse("My Blog").unwrap())
}

fn program_and_args(spec: &CommandSpec) -> String {
    format!("{} {}", spec.program, spec.args.join(" "))
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn runs_every_stage_in_order() {
    let provisioner = Provisioner::new(
        ProvisionConfig::new("/sites"),
        RecordingRunner::default(),
        RecordingDatabase::default(),
    );

    let report = provisioner.provision(&my_blog(), &()).await.unwrap();

    assert_eq!(report.completed, Stage::ALL);
    assert!(report.skipped.is_empty());
    assert_eq!(report.url, "https://my-blog.test");
    assert_eq!(report.path, PathBuf::from("/sites/my-blog"));
}

#[tokio::test]
async fn end_to_end_commands_for_my_blog() {
    let runner = RecordingRunner::default();
    let database = RecordingDatabase::default();
    let provisioner = Provisioner::new(ProvisionConfig::new("/sites"), runner, database);

    provisioner.provision(&my_blog(), &()).await.unwrap();

    let calls = provisioner_runner_calls(&provisioner);
    let lines: Vec<String> = calls.iter().map(program_and_args).collect();
    assert_eq!(
        lines,
        [
            "wp core download --path=my-blog",
            "wp config create --dbname=my_blog --dbuser=root --dbhost=127.0.0.1 --extra-php",
            "wp core install --url=https://my-blog.test --title=My Blog --admin_user=admin \
             --admin_password=admin --admin_email=admin@email.com",
            "wp plugin delete --all",
            "herd secure",
        ]
    );

    assert_eq!(calls[0].cwd.as_deref(), Some(Path::new("/sites")));
    for spec in &calls[1..] {
        assert_eq!(spec.cwd.as_deref(), Some(Path::new("/sites/my-blog")));
    }
}

#[tokio::test]
async fn creates_database_before_any_command() {
    let database = RecordingDatabase::default();
    let reporter = RecordingReporter::default();
    let provisioner = Provisioner::new(
        ProvisionConfig::new("/sites"),
        RecordingRunner::default(),
        database,
    );

    provisioner.provision(&my_blog(), &reporter).await.unwrap();

    assert_eq!(*provisioner.database().created.lock().unwrap(), ["my_blog"]);
    let events = reporter.events.lock().unwrap().clone();
    assert_eq!(events[0], "start Create database");
    assert_eq!(events[1], "done Create database");
    assert_eq!(events[2], "start Download WordPress");
}

#[tokio::test]
async fn failing_download_stops_the_pipeline() {
    let reporter = RecordingReporter::default();
    let provisioner = Provisioner::new(
        ProvisionConfig::new("/sites"),
        RecordingRunner::failing_on("download"),
        RecordingDatabase::default(),
    );

    let err = provisioner.provision(&my_blog(), &reporter).await.unwrap_err();

    match &err {
        CoreError::Stage { stage, source } => {
            assert_eq!(*stage, Stage::DownloadCore);
            assert!(matches!(**source, CoreError::CommandFailed { code: Some(1), .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(provisioner_runner_calls(&provisioner).len(), 1);
    let events = reporter.events.lock().unwrap().clone();
    assert_eq!(events.last().unwrap(), "fail Download WordPress");
    assert!(!events.iter().any(|e| e.contains("wp-config.php")));
}

#[tokio::test]
async fn each_failing_stage_prevents_the_next() {
    let cases = [
        ("download", Stage::DownloadCore, 1),
        ("config", Stage::WriteConfig, 2),
        ("install", Stage::Install, 3),
        ("plugin", Stage::RemovePlugins, 4),
        ("secure", Stage::SecureDomain, 5),
    ];

    for (needle, expected_stage, expected_calls) in cases {
        let provisioner = Provisioner::new(
            ProvisionConfig::new("/sites"),
            RecordingRunner::failing_on(needle),
            RecordingDatabase::default(),
        );

        let err = provisioner.provision(&my_blog(), &()).await.unwrap_err();
        assert!(
            matches!(err, CoreError::Stage { stage, .. } if stage == expected_stage),
            "{needle}: unexpected error {err:?}"
        );
        assert_eq!(
            provisioner_runner_calls(&provisioner).len(),
            expected_calls,
            "{needle}: commands after the failing stage were run"
        );
    }
}

#[tokio::test]
async fn unreachable_database_runs_no_commands() {
    let provisioner = Provisioner::new(
        ProvisionConfig::new("/sites"),
        RecordingRunner::default(),
        RecordingDatabase {
            unreachable: true,
            ..RecordingDatabase::default()
        },
    );

    let err = provisioner.provision(&my_blog(), &()).await.unwrap_err();

    assert!(matches!(
        err.root(),
        CoreError::DatabaseConnection { port: 3306, .. }
    ));
    assert!(provisioner_runner_calls(&provisioner).is_empty());
}

#[tokio::test]
async fn mysql_connection_failure_stops_before_download() {
    let mut config = ProvisionConfig::new("/sites");
    config.database = DatabaseConfig {
        host: "127.0.0.1".into(),
        port: 1,
        ..DatabaseConfig::default()
    };
    let database = MySqlProvisioner::new(config.database.clone());
    let provisioner = Provisioner::new(config, RecordingRunner::default(), database);

    let err = provisioner.provision(&my_blog(), &()).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Stage {
            stage: Stage::CreateDatabase,
            ..
        }
    ));
    assert!(matches!(
        err.root(),
        CoreError::DatabaseConnection { port: 1, .. }
    ));
    assert!(provisioner.runner().calls().is_empty());
}

#[tokio::test]
async fn disabled_stages_are_skipped() {
    let mut config = ProvisionConfig::new("/sites");
    config.remove_default_plugins = false;
    config.secure = false;
    let reporter = RecordingReporter::default();
    let provisioner = Provisioner::new(
        config,
        RecordingRunner::default(),
        RecordingDatabase::default(),
    );

    let report = provisioner.provision(&my_blog(), &reporter).await.unwrap();

    assert_eq!(report.skipped, [Stage::RemovePlugins, Stage::SecureDomain]);
    assert_eq!(provisioner_runner_calls(&provisioner).len(), 3);
    let events = reporter.events.lock().unwrap().clone();
    assert!(events.contains(&"skip Secure local domain".to_owned()));
}

#[tokio::test]
async fn custom_tools_and_tld_are_used() {
    let mut config = ProvisionConfig::new("/srv/www");
    config.tld = "localhost".into();
    config.tools.wp = "/opt/wp-cli/wp".into();
    config.tools.herd = "valet".into();
    config.debug = false;
    let provisioner = Provisioner::new(
        config,
        RecordingRunner::default(),
        RecordingDatabase::default(),
    );

    let report = provisioner.provision(&my_blog(), &()).await.unwrap();

    assert_eq!(report.url, "https://my-blog.localhost");
    let calls = provisioner_runner_calls(&provisioner);
    assert_eq!(calls[0].program, "/opt/wp-cli/wp");
    assert_eq!(calls[1].stdin, None);
    assert_eq!(program_and_args(&calls[4]), "valet secure");
}

fn provisioner_runner_calls(
    provisioner: &Provisioner<RecordingRunner, RecordingDatabase>,
) -> Vec<CommandSpec> {
    provisioner.runner().calls()
}
