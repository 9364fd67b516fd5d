//! Lifecycle policy: storage-tier transitions and expirations for a bucket
//!
//! [`compile_lifecycle`] turns a handful of day thresholds into a
//! [`LifecyclePolicy`]: either `Absent` (no lifecycle configuration should
//! exist on the bucket) or a validated [`LifecycleRuleSet`].

mod compiler;
mod config;

pub use compiler::compile_lifecycle;
pub use config::LifecycleConfig;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage class an object can transition into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageTier {
    InfrequentAccess,
    OneZoneInfrequentAccess,
    IntelligentTiering,
    GlacierInstantRetrieval,
    /// Cold/archival tier
    Glacier,
    DeepArchive,
}

impl StorageTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageTier::InfrequentAccess => "infrequent-access",
            StorageTier::OneZoneInfrequentAccess => "one-zone-infrequent-access",
            StorageTier::IntelligentTiering => "intelligent-tiering",
            StorageTier::GlacierInstantRetrieval => "glacier-instant-retrieval",
            StorageTier::Glacier => "glacier",
            StorageTier::DeepArchive => "deep-archive",
        }
    }
}

impl fmt::Display for StorageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Enabled,
    Disabled,
}

/// Move object data to `tier` after `days`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Transition {
    pub days: u32,
    pub tier: StorageTier,
}

impl Transition {
    pub fn new(days: u32, tier: StorageTier) -> Self {
        Self { days, tier }
    }
}

/// Delete object data after `days`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expiration {
    pub days: u32,
}

/// A single lifecycle rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleRule {
    pub id: String,

    /// Object key prefix the rule applies to (empty = whole bucket)
    #[serde(default)]
    pub prefix: String,

    pub status: RuleStatus,

    #[serde(default)]
    pub transitions: Vec<Transition>,

    #[serde(default)]
    pub noncurrent_version_transitions: Vec<Transition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<Expiration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noncurrent_version_expiration: Option<Expiration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_incomplete_multipart_upload_days: Option<u32>,
}

impl LifecycleRule {
    /// Copy with transitions sorted by day, then tier
    pub fn normalized(&self) -> Self {
        let mut rule = self.clone();
        rule.transitions.sort();
        rule.noncurrent_version_transitions.sort();
        rule
    }
}

/// Ordered lifecycle rules for one bucket. A value, recomputed on every pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LifecycleRuleSet {
    pub rules: Vec<LifecycleRule>,
}

impl LifecycleRuleSet {
    pub fn new(rules: Vec<LifecycleRule>) -> Self {
        Self { rules }
    }

    /// Copy with rules sorted by id and every rule's transitions sorted
    pub fn normalized(&self) -> Self {
        let mut rules: Vec<LifecycleRule> =
            self.rules.iter().map(LifecycleRule::normalized).collect();
        rules.sort_by(|a, b| a.id.cmp(&b.id));
        Self { rules }
    }

    /// Compare ignoring transition and rule order.
    ///
    /// Providers are free to report transitions in a different order than
    /// they were submitted in.
    pub fn equivalent(&self, other: &LifecycleRuleSet) -> bool {
        self.normalized() == other.normalized()
    }
}

/// Compiled lifecycle outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LifecyclePolicy {
    /// No lifecycle configuration should be applied; an existing one is removed
    Absent,
    Rules(LifecycleRuleSet),
}

impl LifecyclePolicy {
    pub fn is_absent(&self) -> bool {
        matches!(self, LifecyclePolicy::Absent)
    }

    pub fn rule_set(&self) -> Option<&LifecycleRuleSet> {
        match self {
            LifecyclePolicy::Absent => None,
            LifecyclePolicy::Rules(set) => Some(set),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(transitions: Vec<Transition>) -> LifecycleRule {
        LifecycleRule {
            id: "r".into(),
            prefix: String::new(),
            status: RuleStatus::Enabled,
            transitions,
            noncurrent_version_transitions: vec![],
            expiration: Some(Expiration { days: 365 }),
            noncurrent_version_expiration: None,
            abort_incomplete_multipart_upload_days: None,
        }
    }

    #[test]
    fn test_equivalent_ignores_transition_order() {
        let a = LifecycleRuleSet::new(vec![rule(vec![
            Transition::new(60, StorageTier::InfrequentAccess),
            Transition::new(180, StorageTier::Glacier),
        ])]);
        let b = LifecycleRuleSet::new(vec![rule(vec![
            Transition::new(180, StorageTier::Glacier),
            Transition::new(60, StorageTier::InfrequentAccess),
        ])]);

        assert_ne!(a, b);
        assert!(a.equivalent(&b));
    }

    #[test]
    fn test_equivalent_detects_day_change() {
        let a = LifecycleRuleSet::new(vec![rule(vec![Transition::new(
            60,
            StorageTier::InfrequentAccess,
        )])]);
        let b = LifecycleRuleSet::new(vec![rule(vec![Transition::new(
            30,
            StorageTier::InfrequentAccess,
        )])]);
        assert!(!a.equivalent(&b));
    }

    #[test]
    fn test_wire_shape_json() {
        let set = LifecycleRuleSet::new(vec![rule(vec![Transition::new(
            60,
            StorageTier::InfrequentAccess,
        )])]);
        let json = serde_json::to_value(&set).unwrap();
        let rule = &json["rules"][0];
        assert_eq!(rule["status"], "enabled");
        assert_eq!(rule["transitions"][0]["days"], 60);
        assert_eq!(rule["transitions"][0]["tier"], "infrequent-access");
        assert_eq!(rule["expiration"]["days"], 365);
        assert!(rule.get("noncurrentVersionExpiration").is_none());
        assert!(rule["noncurrentVersionTransitions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_absent_serializes_as_null() {
        let json = serde_json::to_value(LifecyclePolicy::Absent).unwrap();
        assert!(json.is_null());
    }
}
