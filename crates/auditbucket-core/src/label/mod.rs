//! Resource identity: a deterministic name and tag set derived from naming labels
//!
//! A bucket's identity is built from up to six ordered labels (namespace,
//! tenant, environment, stage, name, attributes). Each label is sanitized,
//! cased and joined with a delimiter to form the name; the same labels
//! (plus a `Name` tag carrying the full name) form the tag set.

mod builder;
mod case;

pub use builder::build_identity;
pub use case::LetterCase;

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Tag key to tag value, ordered by key
pub type TagSet = BTreeMap<String, String>;

/// Default characters removed from every label value
pub const DEFAULT_REGEX_REPLACE_CHARS: &str = "[^-a-zA-Z0-9]";

/// Default delimiter between rendered labels
pub const DEFAULT_DELIMITER: &str = "-";

/// Keyword in `labels_as_tags` that selects every label
const ALL_LABELS_KEYWORD: &str = "default";

/// The six recognized naming labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelKind {
    Namespace,
    Tenant,
    Environment,
    Stage,
    Name,
    Attributes,
}

impl LabelKind {
    /// All labels in default order
    pub const ALL: [LabelKind; 6] = [
        LabelKind::Namespace,
        LabelKind::Tenant,
        LabelKind::Environment,
        LabelKind::Stage,
        LabelKind::Name,
        LabelKind::Attributes,
    ];

    /// Lowercase label name as used in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelKind::Namespace => "namespace",
            LabelKind::Tenant => "tenant",
            LabelKind::Environment => "environment",
            LabelKind::Stage => "stage",
            LabelKind::Name => "name",
            LabelKind::Attributes => "attributes",
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        LabelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ConfigurationError::unknown_label(s))
    }
}

/// Naming labels and formatting options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Organization namespace (e.g. "eg")
    pub namespace: Option<String>,

    /// Tenant within the organization
    pub tenant: Option<String>,

    /// Environment or region code (e.g. "ue2")
    pub environment: Option<String>,

    /// Stage (e.g. "prod", "test")
    pub stage: Option<String>,

    /// Free-form component name
    pub name: Option<String>,

    /// Extra attributes appended as one label, joined by the delimiter
    pub attributes: Vec<String>,

    /// Delimiter between labels
    pub delimiter: String,

    /// Label order; `None` uses the default order
    pub label_order: Option<Vec<String>>,

    /// Maximum rendered name length (0 = unlimited)
    pub id_length_limit: usize,

    /// Case applied to every label value
    pub label_value_case: LetterCase,

    /// Case applied to tag keys
    pub label_key_case: LetterCase,

    /// Per-label overrides of `label_value_case`
    pub case_overrides: BTreeMap<LabelKind, LetterCase>,

    /// Regex of characters removed from label values
    pub regex_replace_chars: String,

    /// Labels emitted as tags; `["default"]` selects all of them
    pub labels_as_tags: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            tenant: None,
            environment: None,
            stage: None,
            name: None,
            attributes: Vec::new(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            label_order: None,
            id_length_limit: 0,
            label_value_case: LetterCase::Lower,
            label_key_case: LetterCase::Title,
            case_overrides: BTreeMap::new(),
            regex_replace_chars: DEFAULT_REGEX_REPLACE_CHARS.to_string(),
            labels_as_tags: vec![ALL_LABELS_KEYWORD.to_string()],
        }
    }
}

impl NamingConfig {
    /// Raw value of a single-valued label
    fn single(&self, kind: LabelKind) -> Option<&str> {
        match kind {
            LabelKind::Namespace => self.namespace.as_deref(),
            LabelKind::Tenant => self.tenant.as_deref(),
            LabelKind::Environment => self.environment.as_deref(),
            LabelKind::Stage => self.stage.as_deref(),
            LabelKind::Name => self.name.as_deref(),
            LabelKind::Attributes => None,
        }
    }

    /// Case to apply to a given label
    pub fn case_for(&self, kind: LabelKind) -> LetterCase {
        self.case_overrides
            .get(&kind)
            .copied()
            .unwrap_or(self.label_value_case)
    }

    /// Resolve `label_order` into label kinds
    pub fn resolved_order(&self) -> Result<Vec<LabelKind>, ConfigurationError> {
        let Some(order) = &self.label_order else {
            return Ok(LabelKind::ALL.to_vec());
        };

        if order.is_empty() {
            return Err(ConfigurationError::EmptyLabelOrder);
        }

        let mut kinds: Vec<LabelKind> = Vec::with_capacity(order.len());
        for entry in order {
            let kind: LabelKind = entry.parse()?;
            if kinds.contains(&kind) {
                return Err(ConfigurationError::duplicate_label(kind.as_str()));
            }
            kinds.push(kind);
        }
        Ok(kinds)
    }

    /// Resolve `labels_as_tags` into label kinds
    pub fn resolved_tag_labels(&self) -> Result<Vec<LabelKind>, ConfigurationError> {
        let mut kinds: Vec<LabelKind> = Vec::new();
        for entry in &self.labels_as_tags {
            if entry.trim().eq_ignore_ascii_case(ALL_LABELS_KEYWORD) {
                return Ok(LabelKind::ALL.to_vec());
            }
            let kind: LabelKind = entry.parse()?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(kinds)
    }
}

/// A rendered resource name and its tag set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Fully rendered resource name
    pub name: String,

    /// Tags derived from the labels, plus `Name` and any caller tags
    pub tags: TagSet,
}
