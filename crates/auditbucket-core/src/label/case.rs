//! Letter casing rules for label values and tag keys

use serde::{Deserialize, Serialize};

/// Casing rule applied to a rendered label or tag key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterCase {
    #[default]
    Lower,
    Upper,
    /// First letter of each word upper, rest lower. Any character other than
    /// a letter, digit or underscore starts a new word.
    Title,
    /// Leave as-is
    None,
}

impl LetterCase {
    /// Apply this casing rule
    pub fn apply(&self, value: &str) -> String {
        match self {
            LetterCase::Lower => value.to_lowercase(),
            LetterCase::Upper => value.to_uppercase(),
            LetterCase::Title => title_case(value),
            LetterCase::None => value.to_string(),
        }
    }
}

fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;

    for c in value.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }

    out
}
