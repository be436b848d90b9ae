use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_NAME_CHARS: usize = 100;

/// A collection name that is safe to use as a file stem in the data directory.
///
/// Rules:
/// - surrounding whitespace is trimmed
/// - 1 to 100 characters after trimming
/// - no `/`, `\`, NUL or other control characters
/// - no leading `.` (rules out `.`, `..` and hidden files)
/// - none of the characters Windows refuses in file names
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CollectionName(String);

#[derive(Debug, Error, PartialEq)]
pub enum NameError {
    #[error("collection name must not be empty")]
    Empty,

    #[error("collection name must be at most 100 characters")]
    TooLong,

    #[error("collection name must not start with '.'")]
    LeadingDot,

    #[error("collection name must not contain {0:?}")]
    ForbiddenChar(char),
}

impl CollectionName {
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(NameError::TooLong);
        }
        if name.starts_with('.') {
            return Err(NameError::LeadingDot);
        }
        if let Some(c) = name.chars().find(|&c| is_forbidden(c)) {
            return Err(NameError::ForbiddenChar(c));
        }
        Ok(CollectionName(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the collection's entry file.
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.0)
    }
}

fn is_forbidden(c: char) -> bool {
    c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CollectionName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionName::parse(s)
    }
}

impl<'de> Deserialize<'de> for CollectionName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CollectionName::parse(&raw).map_err(serde::de::Error::custom)
    }
}
