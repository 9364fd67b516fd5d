//! Identity building: sanitize, case, order, join, truncate, tag

use super::{Identity, LabelKind, NamingConfig, TagSet};
use crate::error::ConfigurationError;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

/// Build a resource name and tag set from naming labels.
///
/// Steps, in order:
/// 1. remove characters matching `regex_replace_chars` from every label value
/// 2. apply the label's casing rule, then filter again so casing cannot
///    reintroduce characters the pattern removes
/// 3. join the non-empty labels in `label_order` with the delimiter
/// 4. truncate to `id_length_limit` (see [`truncate_id`])
/// 5. tag every label in `labels_as_tags`, set `Name` to the rendered name,
///    then overlay `extra_tags` (caller values win)
///
/// Pure: identical inputs always give identical output.
pub fn build_identity(
    cfg: &NamingConfig,
    extra_tags: &TagSet,
) -> Result<Identity, ConfigurationError> {
    let order = cfg.resolved_order()?;
    let tag_labels = cfg.resolved_tag_labels()?;
    let pattern = Regex::new(&cfg.regex_replace_chars).map_err(|e| {
        ConfigurationError::InvalidPattern {
            pattern: cfg.regex_replace_chars.clone(),
            message: e.to_string(),
        }
    })?;

    let rendered = render_labels(cfg, &pattern);

    let parts: Vec<&str> = order
        .iter()
        .filter_map(|kind| rendered.get(kind).map(String::as_str))
        .collect();

    if parts.is_empty() {
        return Err(ConfigurationError::NoLabels);
    }

    let full = parts.join(&cfg.delimiter);
    let name = truncate_id(&full, cfg.id_length_limit, &cfg.delimiter);
    if name.is_empty() {
        return Err(ConfigurationError::invalid(format!(
            "id_length_limit {} leaves an empty name for '{}'",
            cfg.id_length_limit, full
        )));
    }
    if name.len() != full.len() {
        debug!(
            "Truncated id '{}' to '{}' (limit {})",
            full, name, cfg.id_length_limit
        );
    }

    let mut tags = TagSet::new();
    for kind in &tag_labels {
        if *kind == LabelKind::Name {
            continue;
        }
        if let Some(value) = rendered.get(kind) {
            tags.insert(cfg.label_key_case.apply(kind.as_str()), value.clone());
        }
    }
    tags.insert(
        cfg.label_key_case.apply(LabelKind::Name.as_str()),
        name.clone(),
    );
    for (key, value) in extra_tags {
        tags.insert(key.clone(), value.clone());
    }

    Ok(Identity { name, tags })
}

/// Sanitize and case every present label; empty results are dropped
fn render_labels(cfg: &NamingConfig, pattern: &Regex) -> BTreeMap<LabelKind, String> {
    let clean = |raw: &str, kind: LabelKind| -> Option<String> {
        let sanitized = pattern.replace_all(raw.trim(), "");
        let cased = cfg.case_for(kind).apply(&sanitized);
        let rendered = pattern.replace_all(&cased, "");
        if rendered.is_empty() {
            None
        } else {
            Some(rendered.into_owned())
        }
    };

    let mut rendered = BTreeMap::new();

    for kind in LabelKind::ALL {
        if kind == LabelKind::Attributes {
            let attributes: Vec<String> = cfg
                .attributes
                .iter()
                .filter_map(|a| clean(a, kind))
                .collect();
            if !attributes.is_empty() {
                rendered.insert(kind, attributes.join(&cfg.delimiter));
            }
        } else if let Some(value) = cfg.single(kind).and_then(|raw| clean(raw, kind)) {
            rendered.insert(kind, value);
        }
    }

    rendered
}

/// Truncate an id to at most `limit` characters (0 = unlimited).
///
/// Keeps the leading characters. A cut that lands inside a delimiter backs
/// off to the start of that delimiter, and trailing delimiters are stripped,
/// so the result never ends in a partial or dangling delimiter. When the kept
/// prefix is nothing but delimiters it is returned as-is instead.
pub fn truncate_id(id: &str, limit: usize, delimiter: &str) -> String {
    if limit == 0 || id.chars().count() <= limit {
        return id.to_string();
    }

    let mut cut = id
        .char_indices()
        .nth(limit)
        .map(|(idx, _)| idx)
        .unwrap_or(id.len());

    if !delimiter.is_empty() {
        if let Some((start, _)) = id
            .match_indices(delimiter)
            .find(|(start, _)| *start < cut && cut < start + delimiter.len())
        {
            cut = start;
        }
    }

    let prefix = &id[..cut];
    let mut truncated = prefix;
    if !delimiter.is_empty() {
        while let Some(stripped) = truncated.strip_suffix(delimiter) {
            truncated = stripped;
        }
    }

    if truncated.is_empty() {
        prefix.to_string()
    } else {
        truncated.to_string()
    }
}
