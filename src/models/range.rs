//! Inclusive identifier range.

use crate::error::{AppError, Result};

/// Numeric key of one remote user page.
pub type Identifier = u64;

/// A validated `[start, end]` range, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdRange {
    start: Identifier,
    end: Identifier,
}

impl IdRange {
    /// Build a range, rejecting `start > end` before any work begins.
    pub fn new(start: Identifier, end: Identifier) -> Result<Self> {
        if start > end {
            return Err(AppError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Identifier {
        self.start
    }

    pub fn end(&self) -> Identifier {
        self.end
    }

    /// Number of identifiers covered. Saturates for the full `u64` span.
    pub fn count(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    /// Identifiers in increasing order.
    pub fn iter(&self) -> std::ops::RangeInclusive<Identifier> {
        self.start..=self.end
    }
}

impl std::fmt::Display for IdRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
