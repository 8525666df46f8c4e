// src/services/extractor.rs

//! User/tag relation extraction.
//!
//! Users and tags are found by two independent pattern scans over the page.
//! With no positional link between the scans, every distinct user is paired
//! with every distinct tag. A user page normally names one user, so in
//! practice this is that user times each of its tags.

use std::collections::HashSet;

use regex::Regex;

use crate::error::Result;
use crate::models::{ExtractConfig, Relation};

/// Compiled extraction patterns.
#[derive(Debug, Clone)]
pub struct Extractor {
    user_re: Regex,
    tag_re: Regex,
}

impl Extractor {
    pub fn new(config: &ExtractConfig) -> Result<Self> {
        Ok(Self {
            user_re: Regex::new(&config.user_pattern)?,
            tag_re: Regex::new(&config.tag_pattern)?,
        })
    }

    /// All relations in `body`; empty when either scan finds nothing.
    pub fn extract(&self, body: &str) -> Vec<Relation> {
        let users = Self::capture_distinct(&self.user_re, body);
        if users.is_empty() {
            return Vec::new();
        }
        let tags = Self::capture_distinct(&self.tag_re, body);

        users
            .iter()
            .flat_map(|user| tags.iter().map(move |tag| Relation::new(*user, *tag)))
            .collect()
    }

    /// First capture group of every match, first occurrence order, no repeats.
    fn capture_distinct<'a>(re: &Regex, body: &'a str) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        re.captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|token| seen.insert(*token))
            .collect()
    }
}

impl Default for Extractor {
    fn default() -> Self {
        // Built-in patterns are known to compile
        Self::new(&ExtractConfig::default()).expect("default extract patterns are valid")
    }
}
