//! Tag value type.
//!
//! # Invariants
//! - A tag name is a single ASCII alphanumeric word after trimming.
//! - Tags compare by exact (case-sensitive) name.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static TAG_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid tag name regex"));

/// Label attached to an activity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    /// Parses one tag from user or persisted input.
    pub fn parse(value: &str) -> Result<Self, TagError> {
        let trimmed = value.trim();
        if !TAG_NAME_RE.is_match(trimmed) {
            return Err(TagError::InvalidTagName(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Tag {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value.as_str())
    }
}

impl From<Tag> for String {
    fn from(value: Tag) -> Self {
        value.0
    }
}

/// Tag parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    InvalidTagName(String),
}

impl Display for TagError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTagName(value) => {
                write!(f, "invalid tag name `{value}`; tags must be alphanumeric")
            }
        }
    }
}

impl Error for TagError {}

#[cfg(test)]
mod tests {
    use super::{Tag, TagError};

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let tag = Tag::parse("  friends ").expect("tag should parse");
        assert_eq!(tag.as_str(), "friends");
    }

    #[test]
    fn parse_rejects_blank_and_symbolic_names() {
        assert_eq!(
            Tag::parse("   ").unwrap_err(),
            TagError::InvalidTagName("   ".to_string())
        );
        assert!(Tag::parse("not-a-tag").is_err());
        assert!(Tag::parse("two words").is_err());
    }

    #[test]
    fn tags_compare_case_sensitively() {
        assert_ne!(Tag::parse("Work").unwrap(), Tag::parse("work").unwrap());
    }
}
