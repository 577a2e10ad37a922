//! Brand-styling post-processor
//!
//! Normalizes generated email HTML against a tenant's brand: strips gradient
//! CSS (including the gradient-text webkit idioms), recolors headings and
//! bold spans with the primary color, anchors with the secondary color, and
//! buttons with a primary background. Enforced after generation, not by
//! construction: the generator may emit violating markup and this pass
//! patches it.
//!
//! Tag matching is regex-based, but every style edit goes through a CSS
//! declaration-list rewrite (parse, mutate, serialize), so attribute quoting
//! and unrelated values containing the word "gradient" (class names, copy
//! text) are never mis-transformed. Re-running the pass on its own output is
//! a no-op.

use markflow_common::types::BrandColors;
use regex::{Captures, NoExpand, Regex};
use std::sync::LazyLock;

/// Light foreground used on brand-colored buttons
const BUTTON_FOREGROUND: &str = "#ffffff";

static STYLE_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bstyle\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("static regex")
});
static CLASS_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("static regex")
});
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(h[1-6])((?:[^>])*)>").expect("static regex"));
static SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(span)((?:[^>])*)>").expect("static regex"));
static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(a)((?:\s[^>]*)?)>").expect("static regex"));
static BUTTON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(button)((?:[^>])*)>").expect("static regex"));

type Declarations = Vec<(String, String)>;

fn parse_declarations(style: &str) -> Declarations {
    style
        .split(';')
        .filter_map(|decl| {
            let decl = decl.trim();
            if decl.is_empty() {
                return None;
            }
            let (prop, value) = decl.split_once(':')?;
            Some((prop.trim().to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

fn serialize_declarations(decls: &Declarations) -> String {
    decls
        .iter()
        .map(|(prop, value)| format!("{}: {}", prop, value))
        .collect::<Vec<_>>()
        .join("; ")
}

fn set_declaration(decls: &mut Declarations, prop: &str, value: &str) {
    decls.retain(|(p, _)| p != prop);
    decls.push((prop.to_string(), value.to_string()));
}

/// Drop gradient backgrounds and the gradient-text idioms.
fn strip_gradient_declarations(decls: &mut Declarations) {
    decls.retain(|(prop, value)| {
        let gradient_bg =
            prop.starts_with("background") && value.to_ascii_lowercase().contains("gradient");
        let clip_text =
            prop == "-webkit-background-clip" && value.eq_ignore_ascii_case("text");
        let fill_transparent =
            prop == "-webkit-text-fill-color" && value.eq_ignore_ascii_case("transparent");
        !(gradient_bg || clip_text || fill_transparent)
    });
}

/// Rewrite (or inject) the style attribute inside a tag's attribute string.
fn upsert_style<F>(attrs: &str, edit: F) -> String
where
    F: FnOnce(&mut Declarations),
{
    if let Some(caps) = STYLE_ATTR_RE.captures(attrs) {
        let style = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or("");
        let mut decls = parse_declarations(style);
        edit(&mut decls);
        let replacement = format!(r#"style="{}""#, serialize_declarations(&decls));
        STYLE_ATTR_RE
            .replace(attrs, NoExpand(&replacement))
            .to_string()
    } else {
        let mut decls = Declarations::new();
        edit(&mut decls);
        if decls.is_empty() {
            attrs.to_string()
        } else {
            format!(r#"{} style="{}""#, attrs, serialize_declarations(&decls))
        }
    }
}

fn class_of(attrs: &str) -> String {
    CLASS_ATTR_RE
        .captures(attrs)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_default()
}

fn is_bold(decls: &Declarations) -> bool {
    decls.iter().any(|(prop, value)| {
        prop == "font-weight"
            && (value.eq_ignore_ascii_case("bold")
                || value.eq_ignore_ascii_case("bolder")
                || value.parse::<u32>().map(|w| w >= 600).unwrap_or(false))
    })
}

/// Apply tenant brand styles to generated HTML.
///
/// Pure string transform, idempotent: applying it to its own output yields
/// the same string.
pub fn apply_brand_styles(html: &str, colors: &BrandColors) -> String {
    // Pass 1: strip gradient declarations from every inline style
    let html = STYLE_ATTR_RE.replace_all(html, |caps: &Captures| {
        let style = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or("");
        let mut decls = parse_declarations(style);
        strip_gradient_declarations(&mut decls);
        format!(r#"style="{}""#, serialize_declarations(&decls))
    });

    // Pass 2: headings take the primary color
    let html = HEADING_RE.replace_all(&html, |caps: &Captures| {
        let attrs = upsert_style(&caps[2], |decls| {
            set_declaration(decls, "color", &colors.primary);
        });
        format!("<{}{}>", &caps[1], attrs)
    });

    // Pass 3: bold-weighted spans take the primary color
    let html = SPAN_RE.replace_all(&html, |caps: &Captures| {
        let attrs = upsert_style(&caps[2], |decls| {
            if is_bold(decls) {
                set_declaration(decls, "color", &colors.primary);
            }
        });
        format!("<{}{}>", &caps[1], attrs)
    });

    // Pass 4: button-classed anchors get the button treatment, plain anchors
    // the secondary color
    let html = ANCHOR_RE.replace_all(&html, |caps: &Captures| {
        let raw_attrs = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let class = class_of(raw_attrs);
        let attrs = if class.contains("button") || class.contains("btn") {
            upsert_style(raw_attrs, |decls| {
                set_declaration(decls, "background-color", &colors.primary);
                set_declaration(decls, "color", BUTTON_FOREGROUND);
            })
        } else {
            upsert_style(raw_attrs, |decls| {
                set_declaration(decls, "color", &colors.secondary);
            })
        };
        format!("<{}{}>", &caps[1], attrs)
    });

    // Pass 5: button elements
    let html = BUTTON_RE.replace_all(&html, |caps: &Captures| {
        let attrs = upsert_style(&caps[2], |decls| {
            set_declaration(decls, "background-color", &colors.primary);
            set_declaration(decls, "color", BUTTON_FOREGROUND);
        });
        format!("<{}{}>", &caps[1], attrs)
    });

    html.into_owned()
}
