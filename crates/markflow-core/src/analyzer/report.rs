//! Analysis report types
//!
//! The report is transient: owned by a single request/response cycle, never
//! persisted. Serialized camelCase to match what API consumers expect.

use serde::{Deserialize, Serialize};

/// Full SEO analysis report for a single page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub metadata: PageMetadata,
    pub headings: Headings,
    pub links: LinkReport,
    pub images: ImageReport,
    pub social_media: SocialMedia,
    pub structured_data: StructuredData,
}

/// Head metadata; absent attributes come back as empty strings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub canonical: String,
    pub robots: String,
    pub viewport: String,
}

/// H1/H2/H3 text in document order, empty entries filtered.
///
/// Document order is significant: downstream SEO heuristics depend on it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
}

/// Anchor partition. Anchors that are neither internal nor external
/// (mailto:, tel:, bare relative paths) appear in neither bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkReport {
    pub internal: Vec<String>,
    pub external: Vec<String>,
    pub internal_count: usize,
    pub external_count: usize,
}

/// Image inventory with alt-coverage counts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReport {
    pub total: usize,
    pub with_alt: usize,
    pub without_alt: usize,
    pub images: Vec<ImageInfo>,
}

/// A single `<img>` element.
///
/// `has_alt` reflects attribute presence, so an explicit `alt=""` counts as
/// labeled (decorative images are distinguishable from missing labels).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub src: String,
    pub alt: String,
    pub has_alt: bool,
}

/// OpenGraph and Twitter card fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMedia {
    pub og_title: String,
    pub og_description: String,
    pub og_image: String,
    pub og_url: String,
    pub twitter_card: String,
    pub twitter_title: String,
    pub twitter_description: String,
    pub twitter_image: String,
}

/// JSON-LD presence plus raw script bodies.
///
/// Blocks are left as opaque strings: consumers parse and validate
/// independently, so malformed JSON-LD never fails the analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredData {
    pub present: bool,
    pub blocks: Vec<String>,
}
