//! Command-line behaviour of the `sdkbuilder` binary.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
settings:
  sdkRepo: https://github.com/acme/sdk-java.git
  swagger:
    oldSwaggerPath: ${COMMON_ROOT}/old.json
    newSwaggerPath: ${COMMON_ROOT}/new.json
  swaggerCodegen:
    language: java
stageSettings:
  postbuild:
    publishRelease: false
envVars:
  TARGET_DIR: ${SDK_REPO}/build
"#;

fn sdkbuilder() -> Command {
    let mut cmd = Command::cargo_bin("sdkbuilder").expect("sdkbuilder binary");
    cmd.env_remove("SDKBUILDER_CONFIG")
        .env_remove("SDKBUILDER_LOCAL_CONFIG")
        .env_remove("RUST_LOG")
        .env_remove("ENABLE_LOGGER_COLOR");
    cmd
}

fn workspace(config: &str) -> TempDir {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("config.yml"), config).expect("write config");
    temp
}

#[test]
fn help_lists_subcommands() {
    sdkbuilder()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("full-build"))
        .stdout(predicate::str::contains("check-config"));
}

#[test]
fn check_config_prints_resolved_json() {
    let temp = workspace(CONFIG);

    let output = sdkbuilder()
        .current_dir(temp.path())
        .args(["--config", "config.yml", "check-config"])
        .output()
        .expect("run sdkbuilder");
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(
        doc["settings"]["sdkRepo"],
        "https://github.com/acme/sdk-java.git"
    );
    let new_path = doc["settings"]["swagger"]["newSwaggerPath"].as_str().unwrap();
    assert!(new_path.ends_with("/new.json"));
    assert!(!new_path.contains("${"));
    let target = doc["envVars"]["TARGET_DIR"].as_str().unwrap();
    assert!(target.ends_with("output/java/build"));
}

#[test]
fn config_can_come_from_environment() {
    let temp = workspace(CONFIG);

    sdkbuilder()
        .current_dir(temp.path())
        .env("SDKBUILDER_CONFIG", "config.yml")
        .arg("check-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("sdk-java"));
}

#[test]
fn missing_config_option_exits_one() {
    sdkbuilder()
        .arg("check-config")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--config"));
}

#[test]
fn missing_config_file_exits_one() {
    let temp = tempfile::tempdir().expect("tempdir");

    sdkbuilder()
        .current_dir(temp.path())
        .args(["--config", "nope.yml", "check-config"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config file doesn't exist"));
}

#[test]
fn invalid_config_exits_one() {
    let temp = workspace("settings:\n  swagger:\n    oldSwaggerPath: a.json\n");

    sdkbuilder()
        .current_dir(temp.path())
        .args(["--config", "config.yml", "check-config"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("settings.sdkRepo must be set"));
}

#[test]
fn postbuild_without_publishing_succeeds() {
    let temp = workspace(CONFIG);

    sdkbuilder()
        .current_dir(temp.path())
        .args(["--config", "config.yml", "postbuild"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Release publishing skipped"))
        .stderr(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn logger_color_can_be_enabled_from_config() {
    let config = format!("{CONFIG}  ENABLE_LOGGER_COLOR: \"true\"\n");
    let temp = workspace(&config);

    sdkbuilder()
        .current_dir(temp.path())
        .args(["--config", "config.yml", "postbuild"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Release publishing skipped"))
        .stderr(predicate::str::contains("\u{1b}["));
}

#[test]
fn shared_options_are_accepted_after_the_subcommand() {
    let temp = workspace(CONFIG);

    sdkbuilder()
        .current_dir(temp.path())
        .args(["check-config", "--config", "config.yml", "--root", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("sdk-java"));
}

#[test]
fn unknown_subcommand_exits_one() {
    sdkbuilder()
        .args(["--config", "config.yml", "deploy"])
        .assert()
        .code(1);
}
