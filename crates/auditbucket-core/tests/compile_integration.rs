//! Integration tests for config loading and desired-state compilation
//!
//! Each fixture mirrors a deployment shape: the basic audit bucket, a custom
//! lifecycle, lifecycle turned off, and the whole component disabled.

use auditbucket_core::{
    build_identity, compile_bucket, diff, Change, LifecyclePolicy, LoadedConfig, NamingConfig,
    ObservedBucket, SchemaValidator, StorageTier, TagSet,
};
use camino::Utf8PathBuf;
use proptest::prelude::*;
use tempfile::TempDir;

// ─── Helpers ───────────────────────────────────────────────────────────────

const LABELS: &str = r#"
label:
  namespace: eg
  tenant: default
  environment: ue2
  stage: test
  name: test
"#;

fn write_config(dir: &TempDir, body: &str) -> Utf8PathBuf {
    let path = Utf8PathBuf::try_from(dir.path().join("auditbucket.yaml")).unwrap();
    std::fs::write(&path, body).unwrap();
    path
}

fn load(body: &str) -> LoadedConfig {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, body);
    let validator = SchemaValidator::new().unwrap();
    LoadedConfig::load_and_validate(Some(&path), &validator).unwrap()
}

// ─── Fixtures ──────────────────────────────────────────────────────────────

#[test]
fn test_basic_fixture() {
    let body = format!(
        "{LABELS}lifecycle:
  standard_transition_days: 60
  glacier_transition_days: 180
  expiration_days: 365
  noncurrent_version_transition_days: 30
  noncurrent_version_expiration_days: 180
"
    );
    let spec = compile_bucket(&load(&body).config).unwrap().unwrap();

    assert_eq!(spec.name, "eg-default-ue2-test-test");
    let rule = &spec.lifecycle.rule_set().unwrap().rules[0];
    assert_eq!(rule.transitions.len(), 2);
    assert_eq!(rule.transitions[1].tier, StorageTier::Glacier);
    assert_eq!(rule.expiration.map(|e| e.days), Some(365));
    assert_eq!(rule.noncurrent_version_transitions[0].days, 30);
    assert_eq!(rule.noncurrent_version_expiration.map(|e| e.days), Some(180));
}

#[test]
fn test_custom_lifecycle_fixture() {
    let body = format!(
        "{LABELS}  attributes: [custom]
lifecycle:
  standard_transition_days: 30
  glacier_transition_days: 90
  expiration_days: 180
"
    );
    let spec = compile_bucket(&load(&body).config).unwrap().unwrap();

    assert_eq!(spec.name, "eg-default-ue2-test-test-custom");
    let rule = &spec.lifecycle.rule_set().unwrap().rules[0];
    let days: Vec<u32> = rule.transitions.iter().map(|t| t.days).collect();
    assert_eq!(days, vec![30, 90]);
    assert_eq!(rule.expiration.map(|e| e.days), Some(180));
}

#[test]
fn test_no_lifecycle_fixture() {
    let body = format!("{LABELS}lifecycle:\n  enabled: false\n");
    let spec = compile_bucket(&load(&body).config).unwrap().unwrap();
    assert_eq!(spec.lifecycle, LifecyclePolicy::Absent);

    let changes = diff(&spec, &ObservedBucket::absent());
    assert!(!changes.iter().any(|c| matches!(c, Change::PutLifecycle(_))));
}

#[test]
fn test_disabled_fixture() {
    let body = format!("enabled: false\n{LABELS}");
    assert!(compile_bucket(&load(&body).config).unwrap().is_none());
}

#[test]
fn test_decreasing_transitions_rejected_after_schema() {
    let body = format!(
        "{LABELS}lifecycle:
  standard_transition_days: 90
  glacier_transition_days: 60
"
    );
    let err = compile_bucket(&load(&body).config).unwrap_err();
    assert!(err.to_string().contains("glacier_transition_days"));
}

// ─── Properties ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn prop_identity_is_deterministic(
        namespace in "[a-zA-Z0-9 _.-]{0,12}",
        stage in "[a-z]{0,8}",
        name in "[a-zA-Z0-9]{1,16}",
        limit in 0usize..40,
    ) {
        let cfg = NamingConfig {
            namespace: Some(namespace),
            stage: Some(stage),
            name: Some(name),
            id_length_limit: limit,
            ..Default::default()
        };
        let first = build_identity(&cfg, &TagSet::new()).unwrap();
        let second = build_identity(&cfg, &TagSet::new()).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert!(limit == 0 || first.name.len() <= limit);
        prop_assert!(!first.name.ends_with('-'));
        prop_assert_eq!(first.tags.get("Name"), Some(&first.name));
    }
}
