//! Prompt builders
//!
//! Every variant embeds the tenant identity, the content intent, and the
//! tenant's brand constraints. Branding comes from the configured
//! `BrandProfile` for the client, never from literal tenant text in source.

use markflow_common::config::BrandProfile;
use markflow_common::types::{BrandColors, GenerationOptions};

/// Resolve effective colors: a per-request override beats the configured brand
pub fn resolved_colors(options: &GenerationOptions, brand: &BrandProfile) -> BrandColors {
    options
        .brand_colors
        .clone()
        .unwrap_or_else(|| brand.colors.clone())
}

/// Shared brand/styling constraint block appended to every prompt
fn brand_block(colors: &BrandColors, brand: &BrandProfile) -> String {
    let mut block = format!(
        "Brand constraints:\n\
         - Primary color for headings and buttons: {}\n\
         - Secondary color for links: {}\n\
         - Never use CSS gradients or gradient text effects.\n\
         - Write email-safe inline-styled HTML only.\n",
        colors.primary, colors.secondary
    );
    if !brand.logo_url.is_empty() {
        block.push_str(&format!("- Logo: {} (header, max 140px wide)\n", brand.logo_url));
    }
    if !brand.address.is_empty() {
        block.push_str(&format!("- Footer contact block: {}", brand.address));
        if !brand.phone.is_empty() {
            block.push_str(&format!(", {}", brand.phone));
        }
        block.push('\n');
    }
    block.push_str(&format!("- Sign off as: {}\n", brand.signature));
    block
}

fn intent_block(options: &GenerationOptions) -> String {
    let mut block = format!(
        "Client: {} ({} industry)\nPurpose: {}\nTone: {}\n",
        options.client_name, options.industry, options.purpose, options.tone
    );
    if let Some(promotion) = &options.promotion {
        block.push_str(&format!("Promotion: {}", promotion.headline));
        if let Some(discount) = &promotion.discount {
            block.push_str(&format!(" ({})", discount));
        }
        if let Some(expires) = &promotion.expires {
            block.push_str(&format!(", expires {}", expires));
        }
        block.push('\n');
    }
    if let Some(product) = &options.product_highlight {
        block.push_str(&format!("Featured product: {}", product.name));
        if let Some(price) = &product.price {
            block.push_str(&format!(" at {}", price));
        }
        if let Some(description) = &product.description {
            block.push_str(&format!(" - {}", description));
        }
        block.push('\n');
    }
    if !options.additional_instructions.is_empty() {
        block.push_str(&format!(
            "Additional instructions: {}\n",
            options.additional_instructions
        ));
    }
    block
}

const OUTPUT_CONTRACT: &str = "Respond with a JSON array of objects, each with \
\"title\", \"subject\", \"content\" (HTML body only, no <html> or <head>) and \
\"tags\" (array of short lowercase strings). No prose outside the JSON.";

/// Batch generation: N templates from a themed prompt
pub fn batch_prompt(
    options: &GenerationOptions,
    brand: &BrandProfile,
    count: usize,
    theme: Option<&str>,
) -> String {
    let theme_line = theme
        .map(|t| format!("Theme for this batch: {}\n", t))
        .unwrap_or_default();

    format!(
        "You are an email marketing copywriter.\n\
         Write {count} distinct marketing emails.\n\
         {theme_line}{intent}\n{brand}\n{contract}",
        count = count,
        theme_line = theme_line,
        intent = intent_block(options),
        brand = brand_block(&resolved_colors(options, brand), brand),
        contract = OUTPUT_CONTRACT,
    )
}

/// Single custom-content enhancement
pub fn custom_prompt(options: &GenerationOptions, brand: &BrandProfile, content: &str) -> String {
    format!(
        "You are an email marketing copywriter.\n\
         Rewrite and enhance the draft below into one polished marketing email. \
         Keep the author's intent and facts.\n\n\
         Draft:\n{content}\n\n{intent}\n{brand}\n{contract}",
        content = content,
        intent = intent_block(options),
        brand = brand_block(&resolved_colors(options, brand), brand),
        contract = OUTPUT_CONTRACT,
    )
}

/// Short "personal touch" message
pub fn personal_touch_prompt(options: &GenerationOptions, brand: &BrandProfile) -> String {
    format!(
        "You are writing a short, warm, personal-sounding note from {name} to a customer. \
         Three or four sentences, no hard sell.\n{intent}\n{brand}\n{contract}",
        name = options.client_name,
        intent = intent_block(options),
        brand = brand_block(&resolved_colors(options, brand), brand),
        contract = OUTPUT_CONTRACT,
    )
}

/// AI-driven edit of an existing template
pub fn edit_prompt(
    brand: &BrandProfile,
    title: &str,
    subject: &str,
    content: &str,
    instructions: &str,
) -> String {
    format!(
        "You are an email marketing copywriter.\n\
         Edit the existing email below according to the instructions. \
         Change only what the instructions require.\n\n\
         Instructions: {instructions}\n\n\
         Existing title: {title}\n\
         Existing subject: {subject}\n\
         Existing content:\n{content}\n\n{brand}\n{contract}",
        instructions = instructions,
        title = title,
        subject = subject,
        content = content,
        brand = brand_block(&brand.colors, brand),
        contract = OUTPUT_CONTRACT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use markflow_common::types::{BrandColors, Promotion};

    fn options() -> GenerationOptions {
        GenerationOptions {
            client_id: "acme".into(),
            client_name: "Acme Corp".into(),
            industry: "retail".into(),
            purpose: "spring sale".into(),
            tone: "playful".into(),
            promotion: Some(Promotion {
                headline: "Everything must go".into(),
                discount: Some("20%".into()),
                expires: Some("2026-04-01".into()),
            }),
            product_highlight: None,
            additional_instructions: "mention free shipping".into(),
            brand_colors: None,
        }
    }

    fn brand() -> BrandProfile {
        BrandProfile {
            colors: BrandColors {
                primary: "#102030".into(),
                secondary: "#405060".into(),
            },
            logo_url: "https://acme.example.com/logo.png".into(),
            address: "1 Acme Way".into(),
            phone: "555-0100".into(),
            website: "https://acme.example.com".into(),
            signature: "The Acme Team".into(),
        }
    }

    #[test]
    fn test_batch_prompt_embeds_identity_and_brand() {
        let prompt = batch_prompt(&options(), &brand(), 3, Some("spring"));
        assert!(prompt.contains("Write 3 distinct marketing emails"));
        assert!(prompt.contains("Theme for this batch: spring"));
        assert!(prompt.contains("Acme Corp"));
        assert!(prompt.contains("#102030"));
        assert!(prompt.contains("Everything must go (20%), expires 2026-04-01"));
        assert!(prompt.contains("mention free shipping"));
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn test_brand_colors_override_wins() {
        let mut opts = options();
        opts.brand_colors = Some(BrandColors {
            primary: "#aaaaaa".into(),
            secondary: "#bbbbbb".into(),
        });
        let prompt = batch_prompt(&opts, &brand(), 1, None);
        assert!(prompt.contains("#aaaaaa"));
        assert!(!prompt.contains("#102030"));
    }

    #[test]
    fn test_edit_prompt_carries_existing_fields() {
        let prompt = edit_prompt(
            &brand(),
            "Old title",
            "Old subject",
            "<p>Old body</p>",
            "make it shorter",
        );
        assert!(prompt.contains("make it shorter"));
        assert!(prompt.contains("Old title"));
        assert!(prompt.contains("<p>Old body</p>"));
    }
}
