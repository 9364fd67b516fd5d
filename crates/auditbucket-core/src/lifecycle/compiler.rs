//! Lifecycle rule derivation

use super::{
    Expiration, LifecycleConfig, LifecyclePolicy, LifecycleRule, LifecycleRuleSet, RuleStatus,
    StorageTier, Transition,
};
use crate::error::ConfigurationError;

/// Compile lifecycle inputs into a rule set, or `Absent` when disabled.
///
/// Emits one enabled rule covering the configured prefix:
/// - infrequent-access transition at `standard_transition_days` (always)
/// - cold-tier transition at `glacier_transition_days` (if enabled)
/// - current-version expiration (if `expiration_days > 0`)
/// - non-current infrequent-access transition and expiration (each if `> 0`)
///
/// Day thresholds within a version class must strictly increase; a violation
/// is reported naming both fields. Values are never reordered or clamped.
pub fn compile_lifecycle(cfg: &LifecycleConfig) -> Result<LifecyclePolicy, ConfigurationError> {
    if !cfg.enabled {
        return Ok(LifecyclePolicy::Absent);
    }

    if cfg.rule_id.trim().is_empty() {
        return Err(ConfigurationError::invalid("lifecycle rule_id must not be empty"));
    }

    let mut transitions = vec![Transition::new(
        cfg.standard_transition_days,
        StorageTier::InfrequentAccess,
    )];
    let mut last: (&'static str, u32) = ("standard_transition_days", cfg.standard_transition_days);

    if cfg.glacier_transition_enabled {
        ensure_increasing(last, ("glacier_transition_days", cfg.glacier_transition_days))?;
        transitions.push(Transition::new(
            cfg.glacier_transition_days,
            StorageTier::Glacier,
        ));
        last = ("glacier_transition_days", cfg.glacier_transition_days);
    }

    let expiration = if cfg.expiration_days > 0 {
        ensure_increasing(last, ("expiration_days", cfg.expiration_days))?;
        Some(Expiration {
            days: cfg.expiration_days,
        })
    } else {
        None
    };

    let mut noncurrent_version_transitions = Vec::new();
    if cfg.noncurrent_version_transition_days > 0 {
        noncurrent_version_transitions.push(Transition::new(
            cfg.noncurrent_version_transition_days,
            StorageTier::InfrequentAccess,
        ));
    }

    let noncurrent_version_expiration = if cfg.noncurrent_version_expiration_days > 0 {
        if cfg.noncurrent_version_transition_days > 0 {
            ensure_increasing(
                (
                    "noncurrent_version_transition_days",
                    cfg.noncurrent_version_transition_days,
                ),
                (
                    "noncurrent_version_expiration_days",
                    cfg.noncurrent_version_expiration_days,
                ),
            )?;
        }
        Some(Expiration {
            days: cfg.noncurrent_version_expiration_days,
        })
    } else {
        None
    };

    let abort_incomplete_multipart_upload_days =
        (cfg.abort_incomplete_multipart_upload_days > 0)
            .then_some(cfg.abort_incomplete_multipart_upload_days);

    transitions.sort();

    let rule = LifecycleRule {
        id: cfg.rule_id.clone(),
        prefix: cfg.prefix.clone(),
        status: RuleStatus::Enabled,
        transitions,
        noncurrent_version_transitions,
        expiration,
        noncurrent_version_expiration,
        abort_incomplete_multipart_upload_days,
    };

    Ok(LifecyclePolicy::Rules(LifecycleRuleSet::new(vec![rule])))
}

fn ensure_increasing(
    earlier: (&'static str, u32),
    later: (&'static str, u32),
) -> Result<(), ConfigurationError> {
    if later.1 > earlier.1 {
        Ok(())
    } else {
        Err(ConfigurationError::transition_order(
            earlier.0, earlier.1, later.0, later.1,
        ))
    }
}
