//! DOM extraction
//!
//! Pure functions over a parsed document so the whole extraction path is
//! testable without network access. No fallback heuristics beyond
//! "attribute absent means empty string".

use scraper::{Html, Selector};
use std::sync::LazyLock;

use super::report::{
    AnalysisReport, Headings, ImageInfo, ImageReport, LinkReport, PageMetadata, SocialMedia,
    StructuredData,
};

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("static selector"));
static CANONICAL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("link[rel='canonical']").expect("static selector"));
static H1_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("static selector"));
static H2_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("static selector"));
static H3_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3").expect("static selector"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));
static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("static selector"));
static JSON_LD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script[type='application/ld+json']").expect("static selector")
});

/// Build the full report from a parsed document
pub fn extract_report(document: &Html, url: &str) -> AnalysisReport {
    AnalysisReport {
        metadata: extract_metadata(document),
        headings: extract_headings(document),
        links: extract_links(document, url),
        images: extract_images(document),
        social_media: extract_social_media(document),
        structured_data: extract_structured_data(document),
    }
}

/// First `<title>` text plus the usual head meta tags
pub fn extract_metadata(document: &Html) -> PageMetadata {
    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let canonical = document
        .select(&CANONICAL_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("href"))
        .unwrap_or_default()
        .to_string();

    PageMetadata {
        title,
        description: meta_content(document, "description"),
        keywords: meta_content(document, "keywords"),
        canonical,
        robots: meta_content(document, "robots"),
        viewport: meta_content(document, "viewport"),
    }
}

fn meta_content(document: &Html, name: &str) -> String {
    let selector = Selector::parse(&format!("meta[name='{}']", name)).expect("meta selector");
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or_default()
        .to_string()
}

fn meta_property(document: &Html, property: &str) -> String {
    let selector =
        Selector::parse(&format!("meta[property='{}']", property)).expect("meta selector");
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or_default()
        .to_string()
}

/// H1/H2/H3 text, trimmed, empty strings filtered, DOM order preserved
pub fn extract_headings(document: &Html) -> Headings {
    let collect = |selector: &Selector| -> Vec<String> {
        document
            .select(selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect()
    };

    Headings {
        h1: collect(&H1_SELECTOR),
        h2: collect(&H2_SELECTOR),
        h3: collect(&H3_SELECTOR),
    }
}

/// Partition anchors into internal and external links.
///
/// An href starting with `/` or with the exact input url is internal; one
/// starting with `http` but not with the input url is external. Everything
/// else (mailto:, tel:, bare relative paths) is dropped from both buckets.
pub fn extract_links(document: &Html, url: &str) -> LinkReport {
    let mut internal = Vec::new();
    let mut external = Vec::new();

    for el in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };

        if href.starts_with('/') || href.starts_with(url) {
            internal.push(href.to_string());
        } else if href.starts_with("http") {
            external.push(href.to_string());
        }
    }

    LinkReport {
        internal_count: internal.len(),
        external_count: external.len(),
        internal,
        external,
    }
}

/// Every `<img>`, with alt coverage computed from attribute presence
pub fn extract_images(document: &Html) -> ImageReport {
    let images: Vec<ImageInfo> = document
        .select(&IMG_SELECTOR)
        .map(|el| {
            let has_alt = el.value().attr("alt").is_some();
            ImageInfo {
                src: el.value().attr("src").unwrap_or_default().to_string(),
                alt: el.value().attr("alt").unwrap_or_default().to_string(),
                has_alt,
            }
        })
        .collect();

    let with_alt = images.iter().filter(|i| i.has_alt).count();

    ImageReport {
        total: images.len(),
        with_alt,
        without_alt: images.len() - with_alt,
        images,
    }
}

/// OpenGraph and Twitter card tags
pub fn extract_social_media(document: &Html) -> SocialMedia {
    SocialMedia {
        og_title: meta_property(document, "og:title"),
        og_description: meta_property(document, "og:description"),
        og_image: meta_property(document, "og:image"),
        og_url: meta_property(document, "og:url"),
        twitter_card: meta_content(document, "twitter:card"),
        twitter_title: meta_content(document, "twitter:title"),
        twitter_description: meta_content(document, "twitter:description"),
        twitter_image: meta_content(document, "twitter:image"),
    }
}

/// Raw JSON-LD script bodies, not parsed
pub fn extract_structured_data(document: &Html) -> StructuredData {
    let blocks: Vec<String> = document
        .select(&JSON_LD_SELECTOR)
        .map(|el| el.text().collect::<String>())
        .collect();

    StructuredData {
        present: !blocks.is_empty(),
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head>
    <title> Example Site </title>
    <meta name="description" content="A sample page">
    <meta name="keywords" content="seo, sample">
    <meta name="robots" content="index, follow">
    <meta name="viewport" content="width=device-width">
    <link rel="canonical" href="https://example.com/">
    <meta property="og:title" content="Example OG">
    <meta property="og:image" content="https://example.com/og.png">
    <meta name="twitter:card" content="summary">
    <script type="application/ld+json">{"@type":"Organization"}</script>
</head>
<body>
    <h1>Main Heading</h1>
    <h2>Section One</h2>
    <h2>   </h2>
    <h3>Detail</h3>
    <h1>Second Main</h1>
    <a href="/about">About</a>
    <a href="https://example.com/pricing">Pricing</a>
    <a href="https://elsewhere.org/">Elsewhere</a>
    <a href="mailto:x@y.com">Mail</a>
    <a href="tel:+15551234567">Call</a>
    <a href="relative/path">Relative</a>
    <img src="/a.png" alt="Logo">
    <img src="/b.png" alt="">
    <img src="/c.png">
</body>
</html>
"#;

    fn report() -> AnalysisReport {
        let document = Html::parse_document(PAGE);
        extract_report(&document, "https://example.com")
    }

    #[test]
    fn test_metadata_extraction() {
        let r = report();
        assert_eq!(r.metadata.title, "Example Site");
        assert_eq!(r.metadata.description, "A sample page");
        assert_eq!(r.metadata.keywords, "seo, sample");
        assert_eq!(r.metadata.canonical, "https://example.com/");
        assert_eq!(r.metadata.robots, "index, follow");
        assert_eq!(r.metadata.viewport, "width=device-width");
    }

    #[test]
    fn test_headings_in_document_order_without_blanks() {
        let r = report();
        assert_eq!(r.headings.h1, vec!["Main Heading", "Second Main"]);
        assert_eq!(r.headings.h2, vec!["Section One"]);
        assert_eq!(r.headings.h3, vec!["Detail"]);
    }

    #[test]
    fn test_link_partition_drops_other_schemes() {
        let r = report();
        assert_eq!(r.links.internal, vec!["/about", "https://example.com/pricing"]);
        assert_eq!(r.links.external, vec!["https://elsewhere.org/"]);
        assert_eq!(r.links.internal_count, 2);
        assert_eq!(r.links.external_count, 1);

        // mailto:, tel: and bare relative paths land in neither bucket
        let all: Vec<&String> = r.links.internal.iter().chain(&r.links.external).collect();
        assert!(!all.iter().any(|h| h.starts_with("mailto:")));
        assert!(!all.iter().any(|h| h.starts_with("tel:")));
        assert!(!all.iter().any(|h| h.as_str() == "relative/path"));
    }

    #[test]
    fn test_internal_and_external_disjoint() {
        let r = report();
        for href in &r.links.internal {
            assert!(!r.links.external.contains(href));
        }
    }

    #[test]
    fn test_image_alt_coverage() {
        let r = report();
        assert_eq!(r.images.total, 3);
        // alt="" still counts as labeled; only the attribute-less image is uncovered
        assert_eq!(r.images.with_alt, 2);
        assert_eq!(r.images.without_alt, 1);
        assert_eq!(r.images.with_alt + r.images.without_alt, r.images.total);
        assert!(r.images.images[1].has_alt);
        assert_eq!(r.images.images[1].alt, "");
        assert!(!r.images.images[2].has_alt);
    }

    #[test]
    fn test_social_and_structured_data() {
        let r = report();
        assert_eq!(r.social_media.og_title, "Example OG");
        assert_eq!(r.social_media.twitter_card, "summary");
        assert_eq!(r.social_media.twitter_title, "");
        assert!(r.structured_data.present);
        assert_eq!(r.structured_data.blocks, vec![r#"{"@type":"Organization"}"#]);
    }

    #[test]
    fn test_title_only_page() {
        let document = Html::parse_document("<html><head><title>Example</title></head></html>");
        let r = extract_report(&document, "https://example.com");
        assert_eq!(r.metadata.title, "Example");
        assert_eq!(r.metadata.description, "");
        assert_eq!(r.metadata.canonical, "");
        assert!(!r.structured_data.present);
        assert_eq!(r.links.internal_count, 0);
        assert_eq!(r.images.total, 0);
    }
}
