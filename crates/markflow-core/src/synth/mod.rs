//! Template synthesizer
//!
//! Orchestrates the generation pipeline: prompt building, the text
//! generation call, output recovery, layout rendering, brand styling, and
//! dual-write persistence. Generation requests never fail past the recovery
//! step; unusable model output degrades to tagged fallback templates.

pub mod generator;
pub mod images;
pub mod prompt;
pub mod recover;

pub use generator::{HttpTextGenerator, StaticGenerator, TextGenerator};
pub use images::{HttpImageGenerator, ImageGenerator, PLACEHOLDER_IMAGE_URL};
pub use recover::{recover_templates, DraftTemplate, Recovery};

use std::collections::HashMap;
use std::sync::Arc;

use markflow_common::config::BrandProfile;
use markflow_common::types::{ClientId, GenerationOptions};
use markflow_common::{Error, Result};
use markflow_storage::models::{CreateTemplate, EmailTemplate, UpdateTemplate};
use markflow_storage::store::TemplateStore;
use tracing::{info, warn};

use crate::branding::apply_brand_styles;
use crate::layout::{self, LayoutData, LayoutOptions, ProductCard, TemplateKind};

/// Template synthesizer: generation options in, persisted templates out
pub struct Synthesizer {
    generator: Arc<dyn TextGenerator>,
    images: Option<Arc<dyn ImageGenerator>>,
    store: TemplateStore,
    brands: HashMap<ClientId, BrandProfile>,
}

impl Synthesizer {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        images: Option<Arc<dyn ImageGenerator>>,
        store: TemplateStore,
        brands: HashMap<ClientId, BrandProfile>,
    ) -> Self {
        Self {
            generator,
            images,
            store,
            brands,
        }
    }

    /// Look up the brand profile for a client, falling back to the
    /// `default` profile and then to built-in defaults
    fn brand_for(&self, client_id: &str) -> BrandProfile {
        self.brands
            .get(client_id)
            .or_else(|| self.brands.get("default"))
            .cloned()
            .unwrap_or_default()
    }

    /// Generate a batch of templates from a themed prompt
    pub async fn generate_batch(
        &self,
        options: &GenerationOptions,
        kind: TemplateKind,
        count: usize,
        theme: Option<&str>,
    ) -> Result<Vec<EmailTemplate>> {
        let count = count.max(1);
        let brand = self.brand_for(&options.client_id);
        let prompt = prompt::batch_prompt(options, &brand, count, theme);

        let recovery = self.generate_and_recover(&prompt, count, &options.purpose).await;
        let hero_url = self.hero_image(options, kind).await;

        let mut templates = Vec::with_capacity(recovery.drafts().len());
        for draft in recovery.into_drafts() {
            let template = self
                .finalize(options, &brand, kind, draft, hero_url.as_deref())
                .await?;
            templates.push(template);
        }

        info!(
            client_id = %options.client_id,
            kind = kind.as_str(),
            count = templates.len(),
            "Generated template batch"
        );
        Ok(templates)
    }

    /// Rewrite caller-supplied draft content into one polished template
    pub async fn enhance_custom(
        &self,
        options: &GenerationOptions,
        content: &str,
    ) -> Result<EmailTemplate> {
        let brand = self.brand_for(&options.client_id);
        let prompt = prompt::custom_prompt(options, &brand, content);

        let recovery = self.generate_and_recover(&prompt, 1, &options.purpose).await;
        self.first_template(options, &brand, TemplateKind::Simple, recovery)
            .await
    }

    /// Generate a short personal-sounding note
    pub async fn personal_touch(&self, options: &GenerationOptions) -> Result<EmailTemplate> {
        let brand = self.brand_for(&options.client_id);
        let prompt = prompt::personal_touch_prompt(options, &brand);

        let recovery = self.generate_and_recover(&prompt, 1, &options.purpose).await;
        self.first_template(options, &brand, TemplateKind::PersonalTouch, recovery)
            .await
    }

    /// AI-edit an existing template.
    ///
    /// The only generation path that can fail with `NotFound`: the template
    /// must already exist. When the model output is unusable the stored
    /// template is returned unchanged rather than overwritten with fallback
    /// content.
    pub async fn edit_template(
        &self,
        client_id: &str,
        template_id: &str,
        instructions: &str,
    ) -> Result<EmailTemplate> {
        let existing = self
            .store
            .get(client_id, template_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Template {} not found", template_id)))?;

        let brand = self.brand_for(client_id);
        let prompt = prompt::edit_prompt(
            &brand,
            &existing.title,
            &existing.subject,
            &existing.content,
            instructions,
        );

        let recovery = self.generate_and_recover(&prompt, 1, "edit").await;
        if recovery.is_fallback() {
            warn!(client_id, template_id, "Edit produced no usable output; template unchanged");
            return Ok(existing);
        }

        let Some(draft) = recovery.into_drafts().into_iter().next() else {
            return Ok(existing);
        };

        // Edits operate on already-rendered HTML, so the draft content is
        // re-branded but not wrapped in a layout shell again
        let content = apply_brand_styles(&draft.content, &brand.colors);
        let update = UpdateTemplate {
            title: Some(draft.title),
            subject: Some(draft.subject),
            content: Some(content),
            tags: (!draft.tags.is_empty()).then_some(draft.tags),
            ..Default::default()
        };
        self.store.update(client_id, template_id, &update).await
    }

    /// Call the generator and run recovery; a generator error is treated as
    /// empty output so the cascade still produces fallback drafts
    async fn generate_and_recover(&self, prompt: &str, expected: usize, purpose: &str) -> Recovery {
        let raw = match self.generator.generate(prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Text generation failed; falling back");
                String::new()
            }
        };

        let recovery = recover_templates(&raw, expected, purpose);
        if recovery.is_fallback() {
            warn!(expected, "Model output was unusable; returning fallback drafts");
        }
        recovery
    }

    /// Optionally generate one hero image for image-led layouts
    async fn hero_image(&self, options: &GenerationOptions, kind: TemplateKind) -> Option<String> {
        let images = self.images.as_ref()?;
        if !matches!(kind, TemplateKind::Promotional | TemplateKind::Announcement) {
            return None;
        }
        let image_prompt = format!(
            "Marketing hero image for {} ({}): {}",
            options.client_name, options.industry, options.purpose
        );
        Some(images.image_or_placeholder(&image_prompt).await)
    }

    async fn first_template(
        &self,
        options: &GenerationOptions,
        brand: &BrandProfile,
        kind: TemplateKind,
        recovery: Recovery,
    ) -> Result<EmailTemplate> {
        let draft = recovery
            .into_drafts()
            .into_iter()
            .next()
            .ok_or_else(|| Error::Internal("Recovery returned no drafts".to_string()))?;
        self.finalize(options, brand, kind, draft, None).await
    }

    /// Render, brand, persist, and return one draft as a full template
    async fn finalize(
        &self,
        options: &GenerationOptions,
        brand: &BrandProfile,
        kind: TemplateKind,
        draft: DraftTemplate,
        hero_url: Option<&str>,
    ) -> Result<EmailTemplate> {
        let mut content = draft.content;
        if let Some(url) = hero_url {
            content = format!(
                r#"<img src="{}" alt="" width="536" style="max-width: 100%; border-radius: 6px; margin-bottom: 16px;">{}"#,
                layout::escape_html(url),
                content
            );
        }

        let products = options
            .product_highlight
            .iter()
            .map(|p| ProductCard {
                name: p.name.clone(),
                description: p.description.clone().unwrap_or_default(),
                price: p.price.clone().unwrap_or_default(),
                cta_url: brand.website.clone(),
            })
            .collect();

        let layout_options = LayoutOptions {
            client_name: options.client_name.clone(),
            brand: brand.clone(),
            unsubscribe_url: unsubscribe_url(brand),
        };
        let data = LayoutData {
            title: draft.title.clone(),
            preheader: draft.subject.clone(),
            content,
            products,
            ..Default::default()
        };

        let html = layout::render(kind, &layout_options, &data);
        let html = apply_brand_styles(&html, &prompt::resolved_colors(options, brand));

        let template = CreateTemplate {
            client_id: options.client_id.clone(),
            title: draft.title,
            subject: draft.subject,
            content: html,
            tags: draft.tags,
        }
        .into_template();

        self.store.save(&template).await?;
        Ok(template)
    }
}

fn unsubscribe_url(brand: &BrandProfile) -> String {
    if brand.website.is_empty() {
        "#unsubscribe".to_string()
    } else {
        format!("{}/unsubscribe", brand.website.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markflow_common::types::BrandColors;
    use markflow_storage::cache::LocalTemplateCache;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn options() -> GenerationOptions {
        GenerationOptions {
            client_id: "acme".into(),
            client_name: "Acme Corp".into(),
            industry: "retail".into(),
            purpose: "spring sale".into(),
            tone: "professional".into(),
            promotion: None,
            product_highlight: None,
            additional_instructions: String::new(),
            brand_colors: None,
        }
    }

    fn brands() -> HashMap<ClientId, BrandProfile> {
        let mut map = HashMap::new();
        map.insert(
            "acme".to_string(),
            BrandProfile {
                colors: BrandColors {
                    primary: "#112233".into(),
                    secondary: "#445566".into(),
                },
                website: "https://acme.example.com".into(),
                ..Default::default()
            },
        );
        map
    }

    fn synthesizer(dir: &TempDir, generator: StaticGenerator) -> Synthesizer {
        let cache = LocalTemplateCache::from_path(dir.path()).unwrap();
        Synthesizer::new(
            Arc::new(generator),
            None,
            TemplateStore::cache_only(cache),
            brands(),
        )
    }

    #[tokio::test]
    async fn test_batch_parses_saves_and_brands() {
        let dir = TempDir::new().unwrap();
        let generator = StaticGenerator::ok(
            r#"[{"title":"A","subject":"SA","content":"<p>one</p>","tags":["sale"]},
                {"title":"B","subject":"SB","content":"<p>two</p>"}]"#,
        );
        let synth = synthesizer(&dir, generator);

        let templates = synth
            .generate_batch(&options(), TemplateKind::Simple, 2, Some("spring"))
            .await
            .unwrap();

        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].title, "A");
        assert!(templates[0].content.contains("<p>one</p>"));
        // Layout shell and brand colors are applied
        assert!(templates[0].content.contains("Unsubscribe"));
        assert!(templates[0].content.contains("#112233"));
        assert_eq!(templates[0].tags_vec(), vec!["sale".to_string()]);

        // Both templates were persisted
        let stored = synth.store.list("acme", 10, 0).await.unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_generator_failure_yields_tagged_fallbacks() {
        let dir = TempDir::new().unwrap();
        let synth = synthesizer(&dir, StaticGenerator::failing());

        let templates = synth
            .generate_batch(&options(), TemplateKind::Simple, 3, None)
            .await
            .unwrap();

        assert_eq!(templates.len(), 3);
        for template in &templates {
            let tags = template.tags_vec();
            assert!(tags.contains(&"fallback".to_string()));
            assert!(tags.contains(&"error".to_string()));
        }
    }

    #[tokio::test]
    async fn test_enhance_custom_returns_one_template() {
        let dir = TempDir::new().unwrap();
        let generator =
            StaticGenerator::ok(r#"{"title":"Polished","subject":"S","content":"<p>better</p>"}"#);
        let synth = synthesizer(&dir, generator);

        let template = synth
            .enhance_custom(&options(), "<p>rough draft</p>")
            .await
            .unwrap();
        assert_eq!(template.title, "Polished");
        assert!(template.content.contains("<p>better</p>"));
    }

    #[tokio::test]
    async fn test_edit_missing_template_is_not_found() {
        let dir = TempDir::new().unwrap();
        let synth = synthesizer(&dir, StaticGenerator::ok("irrelevant"));

        let err = synth
            .edit_template("acme", "email-0-missing", "make it pop")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_edit_with_unusable_output_leaves_template_unchanged() {
        let dir = TempDir::new().unwrap();
        let generator =
            StaticGenerator::ok(r#"{"title":"Orig","subject":"S","content":"<p>v1</p>"}"#);
        let synth = synthesizer(&dir, generator);

        let original = synth
            .enhance_custom(&options(), "<p>draft</p>")
            .await
            .unwrap();

        // Unusable edit output must not clobber the stored template
        let failing = synthesizer(&dir, StaticGenerator::failing());
        let unchanged = failing
            .edit_template("acme", &original.id, "rewrite everything")
            .await
            .unwrap();
        assert_eq!(unchanged.title, original.title);
        assert_eq!(unchanged.content, original.content);
    }

    #[tokio::test]
    async fn test_edit_applies_model_output() {
        let dir = TempDir::new().unwrap();
        let synth = synthesizer(
            &dir,
            StaticGenerator::ok(r#"{"title":"Before","subject":"S","content":"<p>old</p>"}"#),
        );
        let original = synth.enhance_custom(&options(), "<p>seed</p>").await.unwrap();

        let editor = synthesizer(
            &dir,
            StaticGenerator::ok(r#"{"title":"After","subject":"S2","content":"<p>new</p>"}"#),
        );
        let edited = editor
            .edit_template("acme", &original.id, "retitle it")
            .await
            .unwrap();
        assert_eq!(edited.title, "After");
        assert!(edited.content.contains("<p>new</p>"));
        assert_eq!(edited.id, original.id);
    }
}
