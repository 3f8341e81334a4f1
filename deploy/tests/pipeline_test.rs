//! Full installer run against stubbed collaborators

mod common;

use common::{FakeProvider, RecordingRunner, ScriptedPrompter, StaticFetcher};
use easy_install::config::InstallerSettings;
use easy_install::{InstallError, Installer};
use std::fs;

#[tokio::test]
async fn test_full_run_reaches_initialization() {
    let dir = tempfile::tempdir().expect("tempdir");
    let work_dir = dir.path().join("work");
    let settings = InstallerSettings {
        env_file: dir.path().join(".env"),
        work_dir: Some(work_dir.clone()),
        ..InstallerSettings::default()
    };
    fs::write(
        &settings.env_file,
        "MYSQL_ROOT_PASSWORD=admin\nSITES=site1.local\nLETSENCRYPT_EMAIL=ops@example.com\n",
    )
    .expect("write env");

    let provider = FakeProvider::root()
        .with_commands(&["git", "docker"])
        .with_user("frappe", dir.path().join("home"));
    let fetcher = StaticFetcher::new();
    let runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new([
        "n", // networking
        "1", // edge
        "",  // keep password
        "",  // keep sites
        "",  // confirm
        "",  // username frappe
        "",  // project name
    ]);

    let summary = Installer::new(&settings, &provider, &fetcher, &runner, &mut prompter)
        .run()
        .await
        .expect("installation completes");

    assert_eq!(summary.site, "site1.local");
    assert_eq!(summary.project_name, "erpnext_docker");
    assert_eq!(summary.account.username, "frappe");
    assert!(!summary.account.created);
    assert_eq!(summary.selection.fragments().len(), 3);
    assert!(summary.warnings.is_empty());
    assert_eq!(prompter.remaining(), 0);

    assert_eq!(
        fs::read_to_string(&settings.env_file).expect("read env"),
        "VERSION=edge\nMYSQL_ROOT_PASSWORD=admin\nSITES=site1.local\n"
    );
    assert_eq!(
        fs::read_to_string(work_dir.join("frappe_docker").join(".env")).expect("read deployed env"),
        "VERSION=edge\nMYSQL_ROOT_PASSWORD=admin\nSITES=site1.local\n"
    );
    let lines = runner.command_lines();
    assert!(lines.last().expect("exec").contains("exec -e SITE_NAME=site1.local"));
}

#[tokio::test]
async fn test_failed_prerequisite_stops_before_any_prompt() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = InstallerSettings {
        env_file: dir.path().join(".env"),
        ..InstallerSettings::default()
    };
    let provider = FakeProvider::default();
    let fetcher = StaticFetcher::new();
    let runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

    let err = Installer::new(&settings, &provider, &fetcher, &runner, &mut prompter)
        .run()
        .await
        .expect_err("not root");

    assert!(matches!(err, InstallError::Permission));
    assert_eq!(err.exit_code(), 1);
    assert!(prompter.prompts.is_empty());
    assert!(runner.calls().is_empty());
}
