// src/lib.rs

//! Tag Crawler Library
//!
//! Walks a numeric range of user pages and records every user/tag pair found
//! on them into a gzip text file, one `tag:<user>:<tag>` line each.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
