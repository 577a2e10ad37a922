//! Common types and utilities shared across Markflow crates

pub mod config;
pub mod error;
pub mod types;

pub use error::{Error, Result};
