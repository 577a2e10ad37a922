//! Repository layer for data access

pub mod templates;

pub use templates::TemplateRepository;
