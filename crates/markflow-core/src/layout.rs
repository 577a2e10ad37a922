//! Layout Template Engine
//!
//! Pure functions rendering typed data into one of several static,
//! email-safe responsive HTML shells. Placeholder substitution is literal
//! string replacement on sentinel tokens; plain-text fields are HTML-escaped
//! before substitution, and only `content` fields are treated as trusted
//! HTML.

use markflow_common::config::BrandProfile;
use serde::{Deserialize, Serialize};

/// Which static layout to compose around the generated content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    Simple,
    Newsletter,
    Promotional,
    Welcome,
    Announcement,
    PersonalTouch,
}

impl TemplateKind {
    /// Parse a kind string; unrecognized kinds fall back to `Simple`
    pub fn parse(s: &str) -> Self {
        match s {
            "newsletter" => TemplateKind::Newsletter,
            "promotional" => TemplateKind::Promotional,
            "welcome" => TemplateKind::Welcome,
            "announcement" => TemplateKind::Announcement,
            "personal-touch" => TemplateKind::PersonalTouch,
            _ => TemplateKind::Simple,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Simple => "simple",
            TemplateKind::Newsletter => "newsletter",
            TemplateKind::Promotional => "promotional",
            TemplateKind::Welcome => "welcome",
            TemplateKind::Announcement => "announcement",
            TemplateKind::PersonalTouch => "personal-touch",
        }
    }
}

/// Brand-level options shared by every layout
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub client_name: String,
    pub brand: BrandProfile,
    pub unsubscribe_url: String,
}

/// A newsletter section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    /// Trusted HTML
    pub body: String,
}

/// A promotional product card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCard {
    pub name: String,
    pub description: String,
    pub price: String,
    pub cta_url: String,
}

/// Kind-specific content for a render call
#[derive(Debug, Clone, Default)]
pub struct LayoutData {
    /// Plain text, escaped
    pub title: String,
    /// Plain text, escaped; hidden preview line
    pub preheader: String,
    /// Trusted HTML body
    pub content: String,
    /// Newsletter sections
    pub sections: Vec<Section>,
    /// Promotional product cards
    pub products: Vec<ProductCard>,
    /// Welcome numbered steps (plain text)
    pub steps: Vec<String>,
}

/// Escape a plain-text field for embedding in HTML
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const BASE_SHELL: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{{title}}</title>
</head>
<body style="margin: 0; padding: 0; background-color: #f4f4f7; font-family: Arial, Helvetica, sans-serif;">
<div style="display: none; max-height: 0; overflow: hidden;">{{preheader}}</div>
<table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="background-color: #f4f4f7;">
<tr><td align="center" style="padding: 24px 12px;">
<table role="presentation" width="600" cellpadding="0" cellspacing="0" style="max-width: 600px; width: 100%; background-color: #ffffff; border-radius: 8px; overflow: hidden;">
<tr><td align="center" style="padding: 24px;">{{logo}}</td></tr>
<tr><td style="padding: 0 32px 24px 32px;">
{{body}}
</td></tr>
<tr><td style="padding: 24px 32px; background-color: #fafafa; border-top: 1px solid #eeeeee;">
<p style="margin: 0 0 8px 0; font-size: 12px; color: #888888;">{{client_name}}{{footer_contact}}</p>
<p style="margin: 0; font-size: 12px; color: #888888;"><a href="{{unsubscribe_url}}" style="color: #888888;">Unsubscribe</a></p>
</td></tr>
</table>
</td></tr>
</table>
</body>
</html>"#;

/// Render a layout of the given kind around the supplied data
pub fn render(kind: TemplateKind, options: &LayoutOptions, data: &LayoutData) -> String {
    let body = match kind {
        TemplateKind::Simple => simple_body(data),
        TemplateKind::Newsletter => newsletter_body(data),
        TemplateKind::Promotional => promotional_body(data),
        TemplateKind::Welcome => welcome_body(options, data),
        TemplateKind::Announcement => announcement_body(data),
        TemplateKind::PersonalTouch => personal_touch_body(options, data),
    };

    let logo = if options.brand.logo_url.is_empty() {
        format!(
            r#"<span style="font-size: 20px; font-weight: bold;">{}</span>"#,
            escape_html(&options.client_name)
        )
    } else {
        format!(
            r#"<img src="{}" alt="{}" width="140" style="max-width: 140px;">"#,
            escape_html(&options.brand.logo_url),
            escape_html(&options.client_name)
        )
    };

    let mut contact = String::new();
    if !options.brand.address.is_empty() {
        contact.push_str(&format!(" &middot; {}", escape_html(&options.brand.address)));
    }
    if !options.brand.phone.is_empty() {
        contact.push_str(&format!(" &middot; {}", escape_html(&options.brand.phone)));
    }
    if !options.brand.website.is_empty() {
        contact.push_str(&format!(" &middot; {}", escape_html(&options.brand.website)));
    }

    BASE_SHELL
        .replace("{{title}}", &escape_html(&data.title))
        .replace("{{preheader}}", &escape_html(&data.preheader))
        .replace("{{logo}}", &logo)
        .replace("{{body}}", &body)
        .replace("{{client_name}}", &escape_html(&options.client_name))
        .replace("{{footer_contact}}", &contact)
        .replace("{{unsubscribe_url}}", &options.unsubscribe_url)
}

fn heading(text: &str) -> String {
    format!(
        r#"<h1 style="margin: 0 0 16px 0; font-size: 24px;">{}</h1>"#,
        escape_html(text)
    )
}

fn simple_body(data: &LayoutData) -> String {
    format!(
        "{}\n<div style=\"font-size: 15px; line-height: 1.6; color: #333333;\">{}</div>",
        heading(&data.title),
        data.content
    )
}

fn newsletter_body(data: &LayoutData) -> String {
    let mut body = heading(&data.title);
    body.push_str(&format!(
        "<div style=\"font-size: 15px; line-height: 1.6; color: #333333;\">{}</div>",
        data.content
    ));
    for section in &data.sections {
        body.push_str(&format!(
            concat!(
                r#"<table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="margin-top: 20px;">"#,
                r#"<tr><td style="padding: 16px; background-color: #f9f9fb; border-radius: 6px;">"#,
                r#"<h2 style="margin: 0 0 8px 0; font-size: 18px;">{}</h2>"#,
                r#"<div style="font-size: 14px; line-height: 1.6; color: #444444;">{}</div>"#,
                "</td></tr></table>"
            ),
            escape_html(&section.heading),
            section.body
        ));
    }
    body
}

fn promotional_body(data: &LayoutData) -> String {
    let mut body = heading(&data.title);
    body.push_str(&format!(
        "<div style=\"font-size: 15px; line-height: 1.6; color: #333333;\">{}</div>",
        data.content
    ));
    for product in &data.products {
        body.push_str(&format!(
            concat!(
                r#"<table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="margin-top: 20px; border: 1px solid #eeeeee; border-radius: 6px;">"#,
                r#"<tr><td style="padding: 16px;">"#,
                r#"<h2 style="margin: 0 0 6px 0; font-size: 18px;">{name}</h2>"#,
                r#"<p style="margin: 0 0 10px 0; font-size: 14px; color: #555555;">{description}</p>"#,
                r#"<p style="margin: 0 0 12px 0; font-size: 20px; font-weight: bold;">{price}</p>"#,
                r#"<a class="button" href="{cta}" style="display: inline-block; padding: 10px 24px; border-radius: 4px; text-decoration: none;">Shop now</a>"#,
                "</td></tr></table>"
            ),
            name = escape_html(&product.name),
            description = escape_html(&product.description),
            price = escape_html(&product.price),
            cta = escape_html(&product.cta_url),
        ));
    }
    body
}

fn welcome_body(options: &LayoutOptions, data: &LayoutData) -> String {
    let mut body = heading(&data.title);
    body.push_str(&format!(
        "<div style=\"font-size: 15px; line-height: 1.6; color: #333333;\">{}</div>",
        data.content
    ));
    for (index, step) in data.steps.iter().enumerate() {
        body.push_str(&format!(
            concat!(
                r#"<table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="margin-top: 12px;">"#,
                r#"<tr><td width="40" valign="top" style="padding: 12px 0;">"#,
                r#"<span style="display: inline-block; width: 28px; height: 28px; line-height: 28px; text-align: center; border-radius: 50%; background-color: #f0f0f4; font-weight: bold;">{num}</span>"#,
                r#"</td><td style="padding: 12px 0 12px 12px; font-size: 14px; line-height: 1.6; color: #444444;">{step}</td></tr></table>"#
            ),
            num = index + 1,
            step = escape_html(step),
        ));
    }
    body.push_str(&format!(
        r#"<p style="margin: 20px 0 0 0; font-size: 14px; color: #555555;">&mdash; {}</p>"#,
        escape_html(&options.brand.signature)
    ));
    body
}

fn announcement_body(data: &LayoutData) -> String {
    format!(
        concat!(
            r#"<table role="presentation" width="100%" cellpadding="0" cellspacing="0">"#,
            r#"<tr><td align="center" style="padding: 20px; background-color: #f9f9fb; border-radius: 6px;">"#,
            r#"<h1 style="margin: 0; font-size: 26px;">{}</h1>"#,
            "</td></tr></table>",
            r#"<div style="margin-top: 20px; font-size: 15px; line-height: 1.6; color: #333333;">{}</div>"#
        ),
        escape_html(&data.title),
        data.content
    )
}

fn personal_touch_body(options: &LayoutOptions, data: &LayoutData) -> String {
    format!(
        concat!(
            r#"<div style="font-size: 15px; line-height: 1.8; color: #333333;">{}</div>"#,
            r#"<p style="margin: 24px 0 0 0; font-size: 15px; color: #333333;">Warm regards,<br>"#,
            r#"<span style="font-weight: bold;">{}</span></p>"#
        ),
        data.content,
        escape_html(&options.brand.signature)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options() -> LayoutOptions {
        LayoutOptions {
            client_name: "Acme & Co".to_string(),
            brand: BrandProfile::default(),
            unsubscribe_url: "https://example.com/unsubscribe".to_string(),
        }
    }

    #[test]
    fn test_unknown_kind_falls_back_to_simple() {
        assert_eq!(TemplateKind::parse("holographic"), TemplateKind::Simple);
        assert_eq!(TemplateKind::parse("newsletter"), TemplateKind::Newsletter);
        assert_eq!(
            TemplateKind::parse("personal-touch"),
            TemplateKind::PersonalTouch
        );
    }

    #[test]
    fn test_all_tokens_substituted() {
        let data = LayoutData {
            title: "Hello".into(),
            preheader: "Preview".into(),
            content: "<p>Body</p>".into(),
            ..Default::default()
        };
        for kind in [
            TemplateKind::Simple,
            TemplateKind::Newsletter,
            TemplateKind::Promotional,
            TemplateKind::Welcome,
            TemplateKind::Announcement,
            TemplateKind::PersonalTouch,
        ] {
            let html = render(kind, &options(), &data);
            assert!(!html.contains("{{"), "unreplaced token in {:?}", kind);
            assert!(html.contains("https://example.com/unsubscribe"));
        }
    }

    #[test]
    fn test_plain_text_fields_escaped_content_trusted() {
        let data = LayoutData {
            title: "<script>alert(1)</script>".into(),
            preheader: "a & b".into(),
            content: "<p>raw <strong>html</strong></p>".into(),
            ..Default::default()
        };
        let html = render(TemplateKind::Simple, &options(), &data);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("<p>raw <strong>html</strong></p>"));
        // Client name is escaped in the footer
        assert!(html.contains("Acme &amp; Co"));
    }

    #[test]
    fn test_simple_wraps_content() {
        let data = LayoutData {
            title: "T".into(),
            content: "<p>C</p>".into(),
            ..Default::default()
        };
        let html = render(TemplateKind::Simple, &options(), &data);
        assert!(html.contains("<p>C</p>"));
        assert!(html.contains("<h1"));
    }

    #[test]
    fn test_promotional_renders_product_cards() {
        let data = LayoutData {
            title: "Sale".into(),
            content: "<p>Deals</p>".into(),
            products: vec![ProductCard {
                name: "Widget".into(),
                description: "The best widget".into(),
                price: "$19".into(),
                cta_url: "https://shop.example.com/widget".into(),
            }],
            ..Default::default()
        };
        let html = render(TemplateKind::Promotional, &options(), &data);
        assert!(html.contains("Widget"));
        assert!(html.contains("$19"));
        assert!(html.contains("https://shop.example.com/widget"));
        assert!(html.contains(r#"class="button""#));
    }

    #[test]
    fn test_welcome_numbers_steps() {
        let data = LayoutData {
            title: "Welcome".into(),
            content: "<p>Glad you joined.</p>".into(),
            steps: vec!["Set up your profile".into(), "Invite your team".into()],
            ..Default::default()
        };
        let html = render(TemplateKind::Welcome, &options(), &data);
        assert!(html.contains(">1<"));
        assert!(html.contains(">2<"));
        assert!(html.contains("Invite your team"));
    }
}
