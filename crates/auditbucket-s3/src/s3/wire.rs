//! Conversion between lifecycle rule sets and the S3 lifecycle wire types

use crate::error::StoreError;
use auditbucket_core::lifecycle::Expiration;
use auditbucket_core::{
    LifecycleRule, LifecycleRuleSet, ObservedLifecycle, RuleStatus, StorageTier, Transition,
};
use aws_sdk_s3::types::{
    AbortIncompleteMultipartUpload, ExpirationStatus, LifecycleExpiration,
    LifecycleRule as WireRule, LifecycleRuleFilter, NoncurrentVersionExpiration,
    NoncurrentVersionTransition, Transition as WireTransition, TransitionStorageClass,
};

fn storage_class(tier: StorageTier) -> TransitionStorageClass {
    match tier {
        StorageTier::InfrequentAccess => TransitionStorageClass::StandardIa,
        StorageTier::OneZoneInfrequentAccess => TransitionStorageClass::OnezoneIa,
        StorageTier::IntelligentTiering => TransitionStorageClass::IntelligentTiering,
        StorageTier::GlacierInstantRetrieval => TransitionStorageClass::GlacierIr,
        StorageTier::Glacier => TransitionStorageClass::Glacier,
        StorageTier::DeepArchive => TransitionStorageClass::DeepArchive,
    }
}

fn storage_tier(class: &TransitionStorageClass) -> Option<StorageTier> {
    match class {
        TransitionStorageClass::StandardIa => Some(StorageTier::InfrequentAccess),
        TransitionStorageClass::OnezoneIa => Some(StorageTier::OneZoneInfrequentAccess),
        TransitionStorageClass::IntelligentTiering => Some(StorageTier::IntelligentTiering),
        TransitionStorageClass::GlacierIr => Some(StorageTier::GlacierInstantRetrieval),
        TransitionStorageClass::Glacier => Some(StorageTier::Glacier),
        TransitionStorageClass::DeepArchive => Some(StorageTier::DeepArchive),
        _ => None,
    }
}

fn wire_days(rule: &str, days: u32) -> Result<i32, StoreError> {
    i32::try_from(days).map_err(|_| {
        StoreError::wire(
            format!("lifecycle rule {rule}"),
            format!("{days} days is out of range"),
        )
    })
}

/// Encode a rule set as S3 lifecycle rules
pub fn encode_rules(set: &LifecycleRuleSet) -> Result<Vec<WireRule>, StoreError> {
    set.rules.iter().map(encode_rule).collect()
}

fn encode_rule(rule: &LifecycleRule) -> Result<WireRule, StoreError> {
    let id = rule.id.as_str();
    let status = match rule.status {
        RuleStatus::Enabled => ExpirationStatus::Enabled,
        RuleStatus::Disabled => ExpirationStatus::Disabled,
    };

    let mut builder = WireRule::builder()
        .id(id)
        .filter(LifecycleRuleFilter::builder().prefix(&rule.prefix).build())
        .status(status);

    for t in &rule.transitions {
        builder = builder.transitions(
            WireTransition::builder()
                .days(wire_days(id, t.days)?)
                .storage_class(storage_class(t.tier))
                .build(),
        );
    }

    for t in &rule.noncurrent_version_transitions {
        builder = builder.noncurrent_version_transitions(
            NoncurrentVersionTransition::builder()
                .noncurrent_days(wire_days(id, t.days)?)
                .storage_class(storage_class(t.tier))
                .build(),
        );
    }

    if let Some(exp) = rule.expiration {
        builder = builder.expiration(
            LifecycleExpiration::builder()
                .days(wire_days(id, exp.days)?)
                .build(),
        );
    }

    if let Some(exp) = rule.noncurrent_version_expiration {
        builder = builder.noncurrent_version_expiration(
            NoncurrentVersionExpiration::builder()
                .noncurrent_days(wire_days(id, exp.days)?)
                .build(),
        );
    }

    if let Some(days) = rule.abort_incomplete_multipart_upload_days {
        builder = builder.abort_incomplete_multipart_upload(
            AbortIncompleteMultipartUpload::builder()
                .days_after_initiation(wire_days(id, days)?)
                .build(),
        );
    }

    builder
        .build()
        .map_err(|e| StoreError::wire(format!("lifecycle rule {id}"), e.to_string()))
}

/// Decode the provider's lifecycle rules.
///
/// Rules that use features a rule set cannot express (dates, tag or size
/// filters, version counts, unknown storage classes) make the whole
/// configuration `Unrecognized`, which the reconciler overwrites.
pub fn decode_rules(rules: &[WireRule]) -> ObservedLifecycle {
    if rules.is_empty() {
        return ObservedLifecycle::Absent;
    }

    match rules.iter().map(decode_rule).collect::<Result<Vec<_>, String>>() {
        Ok(decoded) => ObservedLifecycle::Rules(LifecycleRuleSet::new(decoded)),
        Err(reason) => ObservedLifecycle::Unrecognized(reason),
    }
}

fn days(value: Option<i32>, what: &str, rule: &str) -> Result<u32, String> {
    value
        .and_then(|d| u32::try_from(d).ok())
        .ok_or_else(|| format!("rule '{rule}' has a {what} without a day count"))
}

/// Rules written by older clients carry the prefix outside the filter
#[allow(deprecated)]
fn legacy_prefix(rule: &WireRule) -> String {
    rule.prefix().unwrap_or_default().to_string()
}

fn decode_rule(rule: &WireRule) -> Result<LifecycleRule, String> {
    let id = rule.id().unwrap_or_default().to_string();

    let prefix = match rule.filter() {
        Some(filter) => {
            if filter.tag().is_some()
                || filter.and().is_some()
                || filter.object_size_greater_than().is_some()
                || filter.object_size_less_than().is_some()
            {
                return Err(format!("rule '{id}' uses a tag or size filter"));
            }
            filter.prefix().unwrap_or_default().to_string()
        }
        None => legacy_prefix(rule),
    };

    let status = match rule.status() {
        ExpirationStatus::Enabled => RuleStatus::Enabled,
        ExpirationStatus::Disabled => RuleStatus::Disabled,
        other => return Err(format!("rule '{id}' has unknown status {}", other.as_str())),
    };

    let mut transitions = Vec::new();
    for t in rule.transitions() {
        if t.date().is_some() {
            return Err(format!("rule '{id}' has a date-based transition"));
        }
        let tier = t
            .storage_class()
            .and_then(storage_tier)
            .ok_or_else(|| format!("rule '{id}' transitions to an unsupported storage class"))?;
        transitions.push(Transition::new(days(t.days(), "transition", &id)?, tier));
    }

    let mut noncurrent_version_transitions = Vec::new();
    for t in rule.noncurrent_version_transitions() {
        if t.newer_noncurrent_versions().is_some() {
            return Err(format!("rule '{id}' retains a number of noncurrent versions"));
        }
        let tier = t
            .storage_class()
            .and_then(storage_tier)
            .ok_or_else(|| format!("rule '{id}' transitions to an unsupported storage class"))?;
        noncurrent_version_transitions.push(Transition::new(
            days(t.noncurrent_days(), "noncurrent transition", &id)?,
            tier,
        ));
    }

    let expiration = match rule.expiration() {
        None => None,
        Some(exp) if exp.date().is_some() => {
            return Err(format!("rule '{id}' has a date-based expiration"))
        }
        Some(exp) if exp.expired_object_delete_marker().is_some() && exp.days().is_none() => {
            return Err(format!("rule '{id}' expires delete markers"))
        }
        Some(exp) => Some(Expiration {
            days: days(exp.days(), "expiration", &id)?,
        }),
    };

    let noncurrent_version_expiration = match rule.noncurrent_version_expiration() {
        None => None,
        Some(exp) if exp.newer_noncurrent_versions().is_some() => {
            return Err(format!("rule '{id}' retains a number of noncurrent versions"))
        }
        Some(exp) => Some(Expiration {
            days: days(exp.noncurrent_days(), "noncurrent expiration", &id)?,
        }),
    };

    let abort_incomplete_multipart_upload_days = match rule.abort_incomplete_multipart_upload() {
        None => None,
        Some(abort) => Some(days(
            abort.days_after_initiation(),
            "multipart abort",
            &id,
        )?),
    };

    Ok(LifecycleRule {
        id,
        prefix,
        status,
        transitions,
        noncurrent_version_transitions,
        expiration,
        noncurrent_version_expiration,
        abort_incomplete_multipart_upload_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditbucket_core::{compile_lifecycle, LifecycleConfig, LifecyclePolicy};
    use aws_sdk_s3::primitives::DateTime;

    fn compiled(cfg: &LifecycleConfig) -> LifecycleRuleSet {
        match compile_lifecycle(cfg).unwrap() {
            LifecyclePolicy::Rules(set) => set,
            LifecyclePolicy::Absent => panic!("expected rules"),
        }
    }

    #[test]
    fn test_round_trip_is_equivalent() {
        let cfg = LifecycleConfig {
            standard_transition_days: 60,
            glacier_transition_days: 180,
            expiration_days: 365,
            noncurrent_version_transition_days: 30,
            noncurrent_version_expiration_days: 180,
            prefix: "logs/".into(),
            abort_incomplete_multipart_upload_days: 7,
            ..Default::default()
        };
        let set = compiled(&cfg);

        let mut wire = encode_rules(&set).unwrap();
        // Providers may report transitions in any order.
        wire = wire
            .into_iter()
            .map(|r| {
                let mut reversed = r.transitions().to_vec();
                reversed.reverse();
                let mut rebuilt = r.clone();
                rebuilt.transitions = Some(reversed);
                rebuilt
            })
            .collect();

        match decode_rules(&wire) {
            ObservedLifecycle::Rules(decoded) => assert!(decoded.equivalent(&set)),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_encode_shape() {
        let set = compiled(&LifecycleConfig::default());
        let wire = encode_rules(&set).unwrap();

        assert_eq!(wire.len(), 1);
        let rule = &wire[0];
        assert_eq!(rule.id(), Some("audit-log-retention"));
        assert_eq!(rule.status(), &ExpirationStatus::Enabled);
        assert_eq!(rule.transitions().len(), 2);
        assert_eq!(
            rule.transitions()[0].storage_class(),
            Some(&TransitionStorageClass::StandardIa)
        );
        assert_eq!(
            rule.transitions()[1].storage_class(),
            Some(&TransitionStorageClass::Glacier)
        );
        assert_eq!(rule.expiration().and_then(|e| e.days()), Some(90));
        assert!(rule.abort_incomplete_multipart_upload().is_none());
    }

    #[test]
    fn test_empty_is_absent() {
        assert_eq!(decode_rules(&[]), ObservedLifecycle::Absent);
    }

    #[test]
    fn test_date_based_expiration_is_unrecognized() {
        let rule = WireRule::builder()
            .id("legacy")
            .status(ExpirationStatus::Enabled)
            .expiration(
                LifecycleExpiration::builder()
                    .date(DateTime::from_secs(1_700_000_000))
                    .build(),
            )
            .build()
            .unwrap();

        assert!(matches!(
            decode_rules(&[rule]),
            ObservedLifecycle::Unrecognized(reason) if reason.contains("date-based")
        ));
    }

    #[test]
    fn test_unsupported_storage_class_is_unrecognized() {
        let rule = WireRule::builder()
            .id("odd")
            .status(ExpirationStatus::Enabled)
            .transitions(
                WireTransition::builder()
                    .days(10)
                    .storage_class(TransitionStorageClass::from("FUTURE_TIER"))
                    .build(),
            )
            .build()
            .unwrap();

        assert!(matches!(
            decode_rules(&[rule]),
            ObservedLifecycle::Unrecognized(_)
        ));
    }
}
