// tests/run_file.rs

mod common;
use crate::common::{TestResult, init_tracing};

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use mesarun::build_requests;
use mesarun::config::load_and_validate;
use mesarun::errors::MesarunError;
use mesarun::exec::CommandSpec;
use mesarun::types::{DataFormat, RunMode};
use mesarun_test_utils::builders::RunFileBuilder;

fn write_toml(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn minimal_run_file_gets_defaults() -> TestResult {
    init_tracing();
    let file = write_toml(
        r#"
[run]
dir = "/tmp/project"
command = "./rn"
"#,
    );

    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg.run.dir, PathBuf::from("/tmp/project"));
    assert_eq!(cfg.run.command, CommandSpec::from("./rn"));
    assert_eq!(cfg.run.log, PathBuf::from("run.log"));
    assert!(cfg.run.silent);
    assert!(cfg.gyre.is_none());
    assert_eq!(cfg.batch.jobs, 1);

    let requests = build_requests(&cfg);
    assert_eq!(requests.len(), 1);
    assert!(requests[0].gyre.is_none());
    Ok(())
}

#[test]
fn argv_command_and_gyre_section_are_parsed() -> TestResult {
    init_tracing();
    let file = write_toml(
        r#"
[run]
dir = "/tmp/LOGS"
command = ["/opt/gyre/bin/gyre", "gyre.in"]
silent = false

[gyre]
data_format = "GYRE"
files = ["1.data.GYRE", "2.data.GYRE"]

[batch]
jobs = 4
"#,
    );

    let cfg = load_and_validate(file.path())?;
    assert_eq!(
        cfg.run.command,
        CommandSpec::Argv(vec!["/opt/gyre/bin/gyre".into(), "gyre.in".into()])
    );
    assert!(!cfg.run.silent);

    let gyre = cfg.active_gyre().expect("gyre section enabled by default");
    assert_eq!(gyre.data_format, DataFormat::Gyre);
    assert_eq!(gyre.namelist, PathBuf::from("gyre.in"));
    assert_eq!(gyre.completion_log, PathBuf::from("gyre.log"));
    assert_eq!(cfg.batch.jobs, 4);

    let requests = build_requests(&cfg);
    let targets: Vec<&str> = requests
        .iter()
        .map(|r| r.gyre.as_ref().unwrap().target_file.as_str())
        .collect();
    assert_eq!(targets, vec!["1.data.GYRE", "2.data.GYRE"]);
    assert!(requests.iter().all(|r| !r.silent && r.mode == RunMode::Single));
    Ok(())
}

#[test]
fn relative_dir_resolves_against_run_file() -> TestResult {
    init_tracing();
    let root = tempfile::tempdir()?;
    fs::create_dir(root.path().join("work"))?;
    let path = RunFileBuilder::new("work", "./rn").write_to(root.path().join("Mesarun.toml"));

    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.run.dir, root.path().join("work"));
    Ok(())
}

#[test]
fn enabled_gyre_without_files_is_rejected() {
    let file = write_toml(
        r#"
[run]
dir = "/tmp"
command = "gyre gyre.in"

[gyre]
enabled = true
"#,
    );

    match load_and_validate(file.path()) {
        Err(MesarunError::ConfigError(msg)) => assert!(msg.contains("files")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn disabled_gyre_section_is_ignored() -> TestResult {
    let file = write_toml(
        r#"
[run]
dir = "/tmp"
command = "./rn"

[gyre]
enabled = false
"#,
    );

    let cfg = load_and_validate(file.path())?;
    assert!(cfg.active_gyre().is_none());
    assert!(build_requests(&cfg)[0].gyre.is_none());
    Ok(())
}

#[test]
fn colliding_gyre_stems_are_rejected() {
    let file = write_toml(
        r#"
[run]
dir = "/tmp"
command = "gyre gyre.in"

[gyre]
files = ["7.data.GYRE", "7.data.FGONG"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(MesarunError::ConfigError(msg)) => assert!(msg.contains("'7.'")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn zero_jobs_is_rejected() {
    let file = write_toml(
        r#"
[run]
dir = "/tmp"
command = "./rn"

[batch]
jobs = 0
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(MesarunError::ConfigError(_))
    ));
}

#[test]
fn unusable_command_is_rejected() {
    let file = write_toml(
        r#"
[run]
dir = "/tmp"
command = "./rn 'unterminated"
"#,
    );

    match load_and_validate(file.path()) {
        Err(MesarunError::ConfigError(msg)) => assert!(msg.contains("[run].command")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn unknown_data_format_is_a_toml_error() {
    let file = write_toml(
        r#"
[run]
dir = "/tmp"
command = "gyre gyre.in"

[gyre]
data_format = "OSC"
files = ["1.osc"]
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(MesarunError::TomlError(_))
    ));
}

#[test]
fn missing_run_file_reports_its_path() {
    let err = load_and_validate("/definitely/not/here/Mesarun.toml").unwrap_err();
    match err {
        MesarunError::File { path, .. } => {
            assert_eq!(path, PathBuf::from("/definitely/not/here/Mesarun.toml"))
        }
        other => panic!("expected File error, got {other:?}"),
    }
}
