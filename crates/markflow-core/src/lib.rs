//! Markflow Core - page analysis and template synthesis
//!
//! This crate provides the two cores of Markflow: the stateless page
//! analyzer (URL in, SEO report out) and the template synthesizer (generation
//! options in, persisted email template out), together with the brand-styling
//! post-processor and the layout engine they share.

pub mod analyzer;
pub mod branding;
pub mod layout;
pub mod synth;

pub use analyzer::{AnalysisReport, PageAnalyzer};
pub use branding::apply_brand_styles;
pub use layout::{LayoutData, LayoutOptions, TemplateKind};
pub use synth::{
    HttpTextGenerator, ImageGenerator, Recovery, StaticGenerator, Synthesizer, TextGenerator,
};
