//! Integration tests for the auditbucket binary
//!
//! Runs the built binary against config files in temporary directories.
//! Only offline commands are exercised; plan and apply need a provider.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

// ─── Helpers ───────────────────────────────────────────────────────────────

fn auditbucket(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_auditbucket"))
        .args(args)
        .current_dir(dir)
        .env_remove("AUDITBUCKET_CONFIG")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run auditbucket")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn write_config(dir: &TempDir, body: &str) {
    std::fs::write(dir.path().join("auditbucket.yaml"), body).unwrap();
}

const CUSTOM: &str = r#"
label:
  namespace: eg
  tenant: default
  environment: ue2
  stage: test
  name: test
  attributes: [custom]
lifecycle:
  standard_transition_days: 30
  glacier_transition_days: 90
  expiration_days: 180
"#;

// ─── Tests ─────────────────────────────────────────────────────────────────

#[test]
fn test_version_json() {
    let dir = TempDir::new().unwrap();
    let output = auditbucket(dir.path(), &["version", "--json"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["name"], "auditbucket");
}

#[test]
fn test_init_then_validate() {
    let dir = TempDir::new().unwrap();

    let init = auditbucket(dir.path(), &["config", "init", "--name", "audit-logs"]);
    assert!(init.status.success(), "stderr: {}", stderr(&init));
    assert!(dir.path().join("auditbucket.yaml").exists());

    let again = auditbucket(dir.path(), &["config", "init"]);
    assert!(!again.status.success());
    assert!(stderr(&again).contains("--force"));

    let validate = auditbucket(dir.path(), &["config", "validate"]);
    assert!(validate.status.success(), "stderr: {}", stderr(&validate));
    assert!(stdout(&validate).contains("eg-prod-audit-logs"));
}

#[test]
fn test_verbose_logs_config_resolution_to_stderr() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, CUSTOM);

    let output = auditbucket(dir.path(), &["-v", "render", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(
        stderr(&output).contains("Loaded configuration from"),
        "stderr: {}",
        stderr(&output)
    );
    // stdout stays machine-readable
    serde_json::from_str::<serde_json::Value>(&stdout(&output)).unwrap();

    let quiet = auditbucket(dir.path(), &["render", "--json"]);
    assert!(!stderr(&quiet).contains("Loaded configuration from"));
}

#[test]
fn test_version_text_names_binary() {
    let dir = TempDir::new().unwrap();
    let output = auditbucket(dir.path(), &["version"]);

    assert!(output.status.success());
    assert!(stdout(&output).starts_with(&format!("auditbucket {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_render_json() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, CUSTOM);

    let output = auditbucket(dir.path(), &["render", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let spec: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(spec["name"], "eg-default-ue2-test-test-custom");
    assert_eq!(spec["tags"]["Name"], "eg-default-ue2-test-test-custom");
    assert_eq!(spec["access"]["public_access_block"]["block_public_acls"], true);

    let rule = &spec["lifecycle"]["rules"][0];
    assert_eq!(rule["status"], "enabled");
    assert_eq!(rule["transitions"][0]["days"], 30);
    assert_eq!(rule["transitions"][0]["tier"], "infrequent-access");
    assert_eq!(rule["transitions"][1]["days"], 90);
    assert_eq!(rule["expiration"]["days"], 180);
}

#[test]
fn test_render_with_explicit_config_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("elsewhere.yaml");
    std::fs::write(&path, CUSTOM).unwrap();

    let output = auditbucket(
        dir.path(),
        &["--config", path.to_str().unwrap(), "render", "--json"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("eg-default-ue2-test-test-custom"));
}

#[test]
fn test_disabled_component_renders_nothing() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, &format!("enabled: false\n{CUSTOM}"));

    let output = auditbucket(dir.path(), &["render", "--json"]);
    assert!(output.status.success());
    assert!(stdout(&output).trim().is_empty());
    assert!(stderr(&output).contains("disabled"));
}

#[test]
fn test_decreasing_transitions_fail() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        "label:\n  name: audit\nlifecycle:\n  standard_transition_days: 90\n  glacier_transition_days: 60\n",
    );

    let output = auditbucket(dir.path(), &["render"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("glacier_transition_days (60)"));
}

#[test]
fn test_validate_reports_schema_errors() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "label:\n  name: audit\nlifecycle:\n  expiration_days: soon\n");

    let output = auditbucket(dir.path(), &["config", "validate"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Schema validation failed"));
}

#[test]
fn test_missing_config() {
    let dir = TempDir::new().unwrap();
    let output = auditbucket(dir.path(), &["render"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to load configuration"));
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    let output = auditbucket(dir.path(), &["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("auditbucket"));
}
