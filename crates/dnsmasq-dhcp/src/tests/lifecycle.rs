//! Start and stop behaviour against fake executables.

use std::fs;

use rstest::{fixture, rstest};

use super::support::{
    FAILING_DNSMASQ, FAILING_KILL, FakeTools, GARBAGE_PID_DNSMASQ, LATE_FAILING_DNSMASQ,
    PID_WRITING_DNSMASQ, QUIET_DNSMASQ, RECORDING_KILL, SPAWN_LOCK,
};

#[fixture]
fn tools() -> FakeTools {
    let tools = FakeTools::new();
    tools.install_kill(RECORDING_KILL);
    tools
}

#[rstest]
#[tokio::test]
async fn start_returns_output_and_records_pid(tools: FakeTools) {
    let _spawn = SPAWN_LOCK.lock().await;
    tools.install_dnsmasq(PID_WRITING_DNSMASQ);
    let mut server = tools.server();

    let output = server.start().await.expect("start");

    assert_eq!(output.stdout.as_deref(), Some("dnsmasq started successfully"));
    assert_eq!(output.stderr, None);
    assert_eq!(output.code, 0);
    assert_eq!(server.pid(), Some(4242));
    assert_eq!(tools.recorded_arguments(), server.arguments());
}

#[rstest]
#[tokio::test]
async fn start_without_pid_file_leaves_pid_unset(tools: FakeTools) {
    let _spawn = SPAWN_LOCK.lock().await;
    tools.install_dnsmasq(QUIET_DNSMASQ);
    let mut server = tools.server();

    let output = server.start().await.expect("start");

    assert!(output.success());
    assert_eq!(server.pid(), None);
}

#[rstest]
#[tokio::test]
async fn failing_process_reports_its_output(tools: FakeTools) {
    let _spawn = SPAWN_LOCK.lock().await;
    tools.install_dnsmasq(FAILING_DNSMASQ);
    let mut server = tools.server();

    let error = server.start().await.expect_err("nonzero exit");

    let output = error.output().expect("process output");
    assert_eq!(output.code, 3);
    assert_eq!(output.stdout, None);
    assert_eq!(
        output.stderr.as_deref(),
        Some("dnsmasq: unknown interface eth9")
    );
    assert_eq!(
        error.to_string(),
        "dnsmasq exited with status 3: dnsmasq: unknown interface eth9"
    );
    assert_eq!(server.pid(), None);
}

#[rstest]
#[tokio::test]
async fn pid_written_before_failure_is_still_recorded(tools: FakeTools) {
    let _spawn = SPAWN_LOCK.lock().await;
    tools.install_dnsmasq(LATE_FAILING_DNSMASQ);
    let mut server = tools.server();

    let error = server.start().await.expect_err("nonzero exit");

    assert_eq!(error.output().map(|output| output.code), Some(2));
    assert_eq!(server.pid(), Some(4343));
    assert_eq!(server.stop(None).await.expect("stop"), Some(4343));
    assert_eq!(tools.signalled_pids(), ["4343"]);
}

#[rstest]
#[tokio::test]
async fn unreadable_pid_does_not_fail_a_clean_start(tools: FakeTools) {
    let _spawn = SPAWN_LOCK.lock().await;
    tools.install_dnsmasq(GARBAGE_PID_DNSMASQ);
    let mut server = tools.server();

    let output = server.start().await.expect("exit 0 starts cleanly");

    assert!(output.success());
    assert_eq!(output.stdout.as_deref(), Some("dnsmasq started successfully"));
    assert_eq!(server.pid(), None);
}

#[rstest]
#[tokio::test]
async fn unreadable_pid_keeps_previously_recorded_pid(tools: FakeTools) {
    let _spawn = SPAWN_LOCK.lock().await;
    tools.install_dnsmasq(GARBAGE_PID_DNSMASQ);
    let mut server = tools.server();
    server.set_pid(Some(1234));

    server.start().await.expect("exit 0 starts cleanly");

    assert_eq!(server.pid(), Some(1234));
}

#[rstest]
#[tokio::test]
async fn start_then_stop_signals_and_cleans_up(tools: FakeTools) {
    let _spawn = SPAWN_LOCK.lock().await;
    tools.install_dnsmasq(PID_WRITING_DNSMASQ);
    let mut server = tools.server();
    server.start().await.expect("start");
    assert!(tools.pid_file().exists());

    let stopped = server.stop(None).await.expect("stop");

    assert_eq!(stopped, Some(4242));
    assert_eq!(server.pid(), None);
    assert!(!tools.pid_file().exists());
    assert_eq!(tools.signalled_pids(), ["4242"]);
}

#[rstest]
#[tokio::test]
async fn override_pid_is_used_when_none_recorded(tools: FakeTools) {
    let _spawn = SPAWN_LOCK.lock().await;
    let mut server = tools.server();

    assert_eq!(server.stop(Some(77)).await.expect("stop"), Some(77));
    assert_eq!(tools.signalled_pids(), ["77"]);
}

#[rstest]
#[tokio::test]
async fn recorded_pid_takes_precedence_over_override(tools: FakeTools) {
    let _spawn = SPAWN_LOCK.lock().await;
    let mut server = tools.server();
    server.set_pid(Some(10));

    assert_eq!(server.stop(Some(20)).await.expect("stop"), Some(10));
    assert_eq!(tools.signalled_pids(), ["10"]);
}

#[rstest]
#[tokio::test]
async fn repeated_stop_signals_once(tools: FakeTools) {
    let _spawn = SPAWN_LOCK.lock().await;
    let mut server = tools.server();
    server.set_pid(Some(5));

    assert_eq!(server.stop(None).await.expect("first stop"), Some(5));
    assert_eq!(server.stop(None).await.expect("second stop"), None);
    assert_eq!(tools.signalled_pids(), ["5"]);
}

#[rstest]
#[tokio::test]
async fn stale_pid_file_is_removed_without_signalling(tools: FakeTools) {
    let mut server = tools.server();
    fs::write(tools.pid_file(), "31337\n").expect("write stale pid");

    assert_eq!(server.stop(None).await.expect("stop"), None);
    assert!(!tools.pid_file().exists());
    assert!(tools.signalled_pids().is_empty());
}

#[rstest]
#[tokio::test]
async fn failing_termination_utility_is_not_an_error(tools: FakeTools) {
    let _spawn = SPAWN_LOCK.lock().await;
    tools.install_kill(FAILING_KILL);
    let mut server = tools.server();
    server.set_pid(Some(9));

    assert_eq!(server.stop(None).await.expect("stop"), Some(9));
    assert_eq!(server.pid(), None);
}
