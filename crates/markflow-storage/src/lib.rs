//! Markflow Storage - template persistence
//!
//! This crate provides the persistence layer for Markflow: a PostgreSQL
//! repository for email templates plus a per-client local JSON cache used as
//! a write-through fallback when the remote store is unavailable.

pub mod cache;
pub mod db;
pub mod models;
pub mod repository;
pub mod store;

pub use cache::LocalTemplateCache;
pub use db::DatabasePool;
pub use models::*;
pub use repository::TemplateRepository;
pub use store::TemplateStore;
