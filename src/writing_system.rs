//! Writing system identifiers

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Language subtag, optional script/region/variant subtags and an optional
/// private-use section, e.g. `en`, `fr-CA`, `zh-Hans-CN`, `qaa-x-kal`.
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z]{2,3}(-[a-zA-Z0-9]{2,8})*(-x(-[a-zA-Z0-9]{1,8})+)?$")
        .expect("writing system tag pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid writing system tag: '{0}'")]
pub struct InvalidWritingSystem(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WritingSystemRecord")]
pub struct WritingSystem {
    tag: String,
    name: String,
}

#[derive(Deserialize)]
struct WritingSystemRecord {
    tag: String,
    #[serde(default)]
    name: Option<String>,
}

impl TryFrom<WritingSystemRecord> for WritingSystem {
    type Error = InvalidWritingSystem;

    fn try_from(record: WritingSystemRecord) -> Result<Self, Self::Error> {
        let name = record.name.unwrap_or_else(|| record.tag.clone());
        WritingSystem::new(record.tag, name)
    }
}

impl WritingSystem {
    pub fn new(tag: impl Into<String>, name: impl Into<String>) -> Result<Self, InvalidWritingSystem> {
        let tag = tag.into();
        if !is_valid_tag(&tag) {
            return Err(InvalidWritingSystem(tag));
        }
        Ok(Self {
            tag,
            name: name.into(),
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for WritingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.tag)
    }
}

pub fn is_valid_tag(tag: &str) -> bool {
    TAG_PATTERN.is_match(tag)
}
