// tests/process_runner.rs
#![cfg(unix)]

mod common;
use crate::common::{TestResult, init_tracing, with_timeout};

use std::fs;
use std::path::Path;
use std::sync::Arc;

use mesarun::errors::MesarunError;
use mesarun::exec::{CommandSpec, ProcessRunner, RunRequest};
use mesarun::namelist::GyreContext;
use mesarun::types::{DataFormat, FailureReason, RunMode, Verdict};
use mesarun_test_utils::builders::{GYRE_TEMPLATE, write_script};
use mesarun_test_utils::recording_sink::RecordingSink;

fn separator() -> String {
    format!("\n\n{}\n\n", "*".repeat(100))
}

fn script_command(path: &Path) -> CommandSpec {
    CommandSpec::Argv(vec![path.display().to_string()])
}

#[tokio::test]
async fn clean_exit_without_marker_is_success() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let script = write_script(
        dir.path(),
        "rn",
        "echo 'step 1'\necho '1.234e+02 years 0.1 Lnuc'\nexit 0",
    );

    let sink = Arc::new(RecordingSink::new());
    let request =
        RunRequest::new(script_command(&script), dir.path(), "run.log").with_progress_sink(sink.clone());

    let verdict = with_timeout(ProcessRunner::new().run(&request)).await?;

    assert_eq!(verdict, Verdict::Success);
    assert_eq!(sink.updates(), vec!["Age: 123.400 years".to_string()]);

    let log = fs::read_to_string(dir.path().join("run.log"))?;
    assert_eq!(
        log,
        format!("step 1\n1.234e+02 years 0.1 Lnuc\n{}", separator())
    );
    Ok(())
}

#[tokio::test]
async fn termination_marker_fails_despite_zero_exit() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let script = write_script(
        dir.path(),
        "rn",
        "echo '5.0 0.1 0.2 Lnuc'\n\
         echo 'terminated evolution: cannot find acceptable model'\n\
         echo '6.0 0.1 0.2 Lnuc'\n\
         exit 0",
    );

    let request = RunRequest::new(script_command(&script), dir.path(), "run.log");
    let verdict = with_timeout(ProcessRunner::new().run(&request)).await?;

    assert_eq!(verdict, Verdict::Failed(FailureReason::TerminatedEarly));
    Ok(())
}

#[tokio::test]
async fn nonzero_exit_fails_with_stderr_tail() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let script = write_script(
        dir.path(),
        "rn",
        "echo 'starting'\necho 'first problem' >&2\necho 'fatal: bad inlist' >&2\nexit 3",
    );

    let request = RunRequest::new(script_command(&script), dir.path(), "run.log");
    let verdict = with_timeout(ProcessRunner::new().run(&request)).await?;

    assert_eq!(
        verdict,
        Verdict::Failed(FailureReason::Exit {
            code: 3,
            stderr_tail: "first problem\nfatal: bad inlist".to_string(),
        })
    );

    // stdout first, then stderr, then the separator.
    let log = fs::read_to_string(dir.path().join("run.log"))?;
    assert_eq!(
        log,
        format!("starting\nfirst problem\nfatal: bad inlist\n{}", separator())
    );
    Ok(())
}

#[tokio::test]
async fn exit_code_wins_over_termination_marker() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let script = write_script(
        dir.path(),
        "rn",
        "echo 'terminated evolution: max_model_number'\nexit 1",
    );

    let request = RunRequest::new(script_command(&script), dir.path(), "run.log");
    let verdict = with_timeout(ProcessRunner::new().run(&request)).await?;

    assert!(matches!(
        verdict,
        Verdict::Failed(FailureReason::Exit { code: 1, .. })
    ));
    Ok(())
}

#[tokio::test]
async fn missing_binary_is_a_launch_error() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let request = RunRequest::new(
        CommandSpec::Argv(vec![dir.path().join("no-such-rn").display().to_string()]),
        dir.path(),
        "run.log",
    );

    match ProcessRunner::new().run(&request).await {
        Err(MesarunError::Launch { dir: launch_dir, .. }) => assert_eq!(launch_dir, dir.path()),
        other => panic!("expected launch error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn missing_working_directory_is_an_error_not_a_verdict() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let gone = dir.path().join("gone");
    let request = RunRequest::new("true", &gone, "run.log");

    assert!(ProcessRunner::new().run(&request).await.is_err());
    Ok(())
}

#[tokio::test]
async fn child_runs_inside_working_directory() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let script = write_script(dir.path(), "rn", "pwd");

    let request = RunRequest::new(script_command(&script), dir.path(), "run.log");
    with_timeout(ProcessRunner::new().run(&request)).await?;

    let log = fs::read_to_string(dir.path().join("run.log"))?;
    let first = log.lines().next().unwrap_or_default();
    assert_eq!(
        fs::canonicalize(first)?,
        fs::canonicalize(dir.path())?
    );
    Ok(())
}

#[tokio::test]
async fn log_is_appended_across_runs() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let script = write_script(dir.path(), "rn", "echo hello");

    let request = RunRequest::new(script_command(&script), dir.path(), "run.log");
    let runner = ProcessRunner::new();
    with_timeout(runner.run(&request)).await?;
    with_timeout(runner.run(&request)).await?;

    let log = fs::read_to_string(dir.path().join("run.log"))?;
    assert_eq!(log, format!("hello\n{sep}hello\n{sep}", sep = separator()));
    Ok(())
}

#[tokio::test]
async fn echoed_output_is_not_scanned() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let script = write_script(
        dir.path(),
        "rn",
        "echo '2.0 0.1 0.2 Lnuc'\necho 'terminated evolution: max_age'",
    );

    let sink = Arc::new(RecordingSink::new());
    let request = RunRequest::new(script_command(&script), dir.path(), "run.log")
        .silent(false)
        .with_progress_sink(sink.clone());
    let verdict = with_timeout(ProcessRunner::new().run(&request)).await?;

    assert_eq!(verdict, Verdict::Success);
    assert!(sink.updates().is_empty());
    Ok(())
}

#[tokio::test]
async fn parallel_runs_leave_the_status_display_alone() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let script = write_script(dir.path(), "rn", "echo '2.0 0.1 0.2 Lnuc'");

    let sink = Arc::new(RecordingSink::new());
    let request = RunRequest::new(script_command(&script), dir.path(), "run.log")
        .with_progress_sink(sink.clone())
        .with_mode(RunMode::ParallelBatch);
    let verdict = with_timeout(ProcessRunner::new().run(&request)).await?;

    assert_eq!(verdict, Verdict::Success);
    assert!(sink.updates().is_empty());
    Ok(())
}

#[tokio::test]
async fn heavy_stderr_does_not_stall_the_run() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let script = write_script(
        dir.path(),
        "rn",
        "i=0\n\
         while [ $i -lt 5000 ]; do\n\
           echo \"warning $i: padding padding padding padding padding\" >&2\n\
           i=$((i+1))\n\
         done\n\
         echo done",
    );

    let request = RunRequest::new(script_command(&script), dir.path(), "run.log");
    let verdict = with_timeout(ProcessRunner::new().run(&request)).await?;

    assert_eq!(verdict, Verdict::Success);
    let log = fs::read_to_string(dir.path().join("run.log"))?;
    assert!(log.starts_with("done\nwarning 0:"));
    assert!(log.contains("warning 4999:"));
    Ok(())
}

#[tokio::test]
async fn gyre_run_patches_namelist_and_ignores_markers() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("gyre.in"), GYRE_TEMPLATE)?;
    let script = write_script(
        dir.path(),
        "gyre",
        "cat \"$1\"\necho 'terminated evolution: not a MESA run'",
    );

    let request = RunRequest::new(
        CommandSpec::Argv(vec![script.display().to_string(), "gyre.in".to_string()]),
        dir.path(),
        "run.log",
    )
    .with_gyre(GyreContext::new("15.data.GYRE", DataFormat::Gyre));

    let verdict = with_timeout(ProcessRunner::new().run(&request)).await?;
    assert_eq!(verdict, Verdict::Success);

    let log = fs::read_to_string(dir.path().join("run.log"))?;
    assert!(log.contains("    file = '15.data.GYRE'    ! Changed\n"));
    assert!(log.contains("    file_format = 'MESA'    ! Changed\n"));
    assert!(log.contains("    summary_file = '15-freqs.dat'    ! Changed\n"));
    assert!(log.contains("    summary_file = 'freq_output_nonad.txt'    ! Added\n"));

    // Single runs patch in place and leave no completion note.
    assert!(!dir.path().join("gyre15.in").exists());
    assert!(!dir.path().join("gyre.log").exists());
    Ok(())
}

#[tokio::test]
async fn unwritable_completion_log_keeps_verdict_and_removes_copy() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("gyre.in"), GYRE_TEMPLATE)?;
    fs::create_dir(dir.path().join("gyre.log"))?;

    let request = RunRequest::new("true gyre.in", dir.path(), "run.log")
        .with_gyre(GyreContext::new("7.data.GYRE", DataFormat::Gyre))
        .with_mode(RunMode::ParallelBatch);
    let verdict = with_timeout(ProcessRunner::new().run(&request)).await?;

    assert_eq!(verdict, Verdict::Success);
    assert!(!dir.path().join("gyre7.in").exists());
    assert_eq!(fs::read_to_string(dir.path().join("gyre.in"))?, GYRE_TEMPLATE);
    Ok(())
}
