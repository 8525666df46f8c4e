//! Extracted relations and their output line format.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// One user/tag association scraped from a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub user: String,
    pub tag: String,
}

impl Relation {
    pub fn new(user: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            tag: tag.into(),
        }
    }
}

/// A single output line, `tag:<user>:<tag>`, without the newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord(String);

impl ResultRecord {
    pub const PREFIX: &'static str = "tag";

    /// Format a relation as an output record.
    pub fn from_relation(relation: &Relation) -> Self {
        Self(format!("{}:{}:{}", Self::PREFIX, relation.user, relation.tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bytes of the record as ASCII, failing on anything else.
    pub fn ascii_bytes(&self) -> Result<&[u8]> {
        if !self.0.is_ascii() {
            return Err(AppError::NonAscii {
                record: self.0.clone(),
            });
        }
        Ok(self.0.as_bytes())
    }
}

impl From<&Relation> for ResultRecord {
    fn from(relation: &Relation) -> Self {
        Self::from_relation(relation)
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
