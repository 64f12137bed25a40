//! 命令行端到端测试（不需要运行中的求解服务）

use assert_cmd::Command;
use predicates::prelude::*;

fn cli(config: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("hpp-cli").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn test_config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("hpp").join("config.toml");

    cli(&config)
        .args(["config", "set", "--address", "/run/hpp.sock", "--robot", "romeo"])
        .assert()
        .success();
    assert!(config.exists());

    cli(&config)
        .args(["config", "get", "address"])
        .assert()
        .success()
        .stdout("/run/hpp.sock\n");

    cli(&config)
        .args(["config", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name = \"romeo\""));
}

#[test]
fn test_config_get_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir.path().join("config.toml"))
        .args(["config", "get", "serial"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("serial"));
}

#[test]
fn test_unreachable_service() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("nobody.sock");
    cli(&dir.path().join("config.toml"))
        .arg("--address")
        .arg(&socket)
        .args(["available", "PathPlanner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("连接求解服务失败"));
}

#[test]
fn test_requires_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir.path().join("config.toml")).assert().failure();
}
