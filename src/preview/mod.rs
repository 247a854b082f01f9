//! Live Preview Renderer
//!
//! Resolves a section tag to a [`SectionRenderer`] through a pluggable
//! [`RendererSource`], feeds it normalized props and wraps every section in
//! its own failure boundary. A failing or missing renderer produces a
//! placeholder for that section only.

mod slot;
mod source;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::domain::{ComponentInstance, ComponentType, Theme};
use crate::normalize::Normalizer;

pub use slot::{PreviewSlot, ResolutionTicket, SlotState};
pub use source::{template_path, StaticSource, TemplateRenderer, TemplateSource};

/// Renders one section from its normalized props
pub trait SectionRenderer: Send + Sync {
    fn render(&self, props: &Value) -> anyhow::Result<String>;
}

impl<F> SectionRenderer for F
where
    F: Fn(&Value) -> anyhow::Result<String> + Send + Sync,
{
    fn render(&self, props: &Value) -> anyhow::Result<String> {
        self(props)
    }
}

/// Errors raised while loading a renderer
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Template file could not be read
    #[error("Failed to load template {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Template did not compile
    #[error("Failed to compile template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: tera::Error,
    },

    /// Any other loader failure
    #[error("Failed to load renderer for {component_type}: {reason}")]
    Load { component_type: String, reason: String },
}

/// Source of renderers; resolution may suspend (file loading, plugins)
#[async_trait]
pub trait RendererSource: Send + Sync {
    /// `Ok(None)` means the source has no renderer for this tag
    async fn resolve(&self, tag: ComponentType) -> Result<Option<Arc<dyn SectionRenderer>>, ResolveError>;
}

/// Result of previewing one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SectionOutcome {
    Rendered { html: String },
    #[serde(rename_all = "camelCase")]
    NotFound { component_type: String },
    #[serde(rename_all = "camelCase")]
    Failed { component_type: String, reason: String },
}

impl SectionOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, SectionOutcome::Rendered { .. })
    }

    /// Inner markup: the rendered section or a diagnostic placeholder
    pub fn body(&self) -> String {
        match self {
            SectionOutcome::Rendered { html } => html.clone(),
            SectionOutcome::NotFound { component_type } => format!(
                "<div class=\"preview-placeholder preview-not-found\">Component Not Found: {}</div>",
                tera::escape_html(component_type)
            ),
            SectionOutcome::Failed { component_type, reason } => format!(
                "<div class=\"preview-placeholder preview-error\">Failed to render {}: {}</div>",
                tera::escape_html(component_type),
                tera::escape_html(reason)
            ),
        }
    }
}

/// Preview of one placed section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPreview {
    pub id: Uuid,
    pub component_type: String,
    pub order_index: usize,
    pub theme: Theme,
    pub outcome: SectionOutcome,
}

impl SectionPreview {
    /// The section wrapped in its theme container
    pub fn to_html(&self) -> String {
        format!(
            "<section data-theme=\"{}\" data-component=\"{}\">{}</section>",
            self.theme.as_str(),
            tera::escape_html(&self.component_type),
            self.outcome.body()
        )
    }
}

/// Resolves, caches and renders section previews
pub struct PreviewRenderer {
    source: Arc<dyn RendererSource>,
    normalizer: Normalizer,
    cache: RwLock<HashMap<ComponentType, Arc<dyn SectionRenderer>>>,
}

impl PreviewRenderer {
    pub fn new(source: Arc<dyn RendererSource>, normalizer: Normalizer) -> Self {
        Self {
            source,
            normalizer,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve a persisted tag string. Unknown tags resolve to `None`.
    pub async fn resolve(&self, component_type: &str) -> Result<Option<Arc<dyn SectionRenderer>>, ResolveError> {
        let Some(tag) = ComponentType::from_name(component_type) else {
            return Ok(None);
        };

        if let Some(renderer) = self.cache.read().await.get(&tag) {
            return Ok(Some(renderer.clone()));
        }

        let resolved = self.source.resolve(tag).await?;
        if let Some(renderer) = &resolved {
            debug!(component_type, "Resolved section renderer");
            self.cache.write().await.insert(tag, renderer.clone());
        }
        Ok(resolved)
    }

    /// Drop cached renderers so the next resolution reloads them
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }

    /// Render props with an already-resolved renderer inside a failure boundary
    pub fn render(&self, component_type: &str, renderer: &dyn SectionRenderer, props: &Value) -> SectionOutcome {
        match catch_unwind(AssertUnwindSafe(|| renderer.render(props))) {
            Ok(Ok(html)) => SectionOutcome::Rendered { html },
            Ok(Err(e)) => {
                error!(component_type, error = %format!("{:#}", e), "Section render failed");
                SectionOutcome::Failed {
                    component_type: component_type.to_string(),
                    reason: first_line(&format!("{:#}", e)),
                }
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                error!(component_type, reason = %reason, "Section renderer panicked");
                SectionOutcome::Failed {
                    component_type: component_type.to_string(),
                    reason: first_line(&reason),
                }
            }
        }
    }

    /// Normalize, resolve and render one instance
    pub async fn render_section(&self, instance: &ComponentInstance) -> SectionPreview {
        let component_type = instance.component_type.as_str();

        let outcome = match self.resolve(component_type).await {
            Ok(Some(renderer)) => {
                let props = self.normalizer.normalize(component_type, &instance.content());
                self.render(component_type, renderer.as_ref(), &props)
            }
            Ok(None) => {
                warn!(component_type, "No renderer for section");
                SectionOutcome::NotFound {
                    component_type: component_type.to_string(),
                }
            }
            Err(e) => {
                error!(component_type, error = %e, "Failed to resolve section renderer");
                SectionOutcome::Failed {
                    component_type: component_type.to_string(),
                    reason: first_line(&e.to_string()),
                }
            }
        };

        SectionPreview {
            id: instance.id,
            component_type: instance.component_type.clone(),
            order_index: instance.order_index,
            theme: instance.theme,
            outcome,
        }
    }

    /// Preview the visible instances of a page in `orderIndex` order.
    /// Sections resolve concurrently.
    pub async fn render_page(&self, instances: &[ComponentInstance]) -> Vec<SectionPreview> {
        let mut visible: Vec<&ComponentInstance> = instances.iter().filter(|i| i.is_visible).collect();
        visible.sort_by_key(|i| i.order_index);

        join_all(visible.into_iter().map(|instance| self.render_section(instance))).await
    }
}

/// Concatenate section previews into one document body
pub fn page_html(sections: &[SectionPreview]) -> String {
    sections.iter().map(SectionPreview::to_html).collect::<Vec<_>>().join("\n")
}

fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().trim().to_string()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "renderer panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaRegistry;
    use serde_json::json;

    fn renderer_with(source: StaticSource) -> PreviewRenderer {
        let registry = Arc::new(SchemaRegistry::builtin().unwrap());
        PreviewRenderer::new(Arc::new(source), Normalizer::new(registry))
    }

    fn title_renderer() -> Arc<dyn SectionRenderer> {
        Arc::new(|props: &Value| -> anyhow::Result<String> {
            Ok(format!("<h1>{}</h1>", props["title"].as_str().unwrap_or_default()))
        })
    }

    #[tokio::test]
    async fn test_unknown_tag_is_not_found() {
        let preview = renderer_with(StaticSource::new());
        let instance = ComponentInstance::new("LegacyBannerSection", &json!({}), 0);
        let section = preview.render_section(&instance).await;
        assert_eq!(
            section.outcome,
            SectionOutcome::NotFound {
                component_type: "LegacyBannerSection".to_string()
            }
        );
        assert!(section.to_html().contains("Component Not Found: LegacyBannerSection"));
    }

    #[tokio::test]
    async fn test_render_uses_normalized_props() {
        let source = StaticSource::new().with(ComponentType::PayrollFAQSection, title_renderer());
        let preview = renderer_with(source);
        let instance = ComponentInstance::new("PayrollFAQSection", &json!({ "faq": { "title": "Questions" } }), 0);

        let section = preview.render_section(&instance).await;
        assert_eq!(
            section.outcome,
            SectionOutcome::Rendered {
                html: "<h1>Questions</h1>".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let exploding: Arc<dyn SectionRenderer> = Arc::new(|_: &Value| -> anyhow::Result<String> {
            panic!("boom\nstack details")
        });
        let source = StaticSource::new()
            .with(ComponentType::HeroSection, exploding)
            .with(ComponentType::CtaSection, title_renderer());
        let preview = renderer_with(source);

        let mut hero = ComponentInstance::new("HeroSection", &json!({}), 0);
        hero.theme = Theme::Dark;
        let cta = ComponentInstance::new("CtaSection", &json!({ "title": "Go" }), 1);

        let sections = preview.render_page(&[cta, hero]).await;
        assert_eq!(sections.len(), 2);
        assert_eq!(
            sections[0].outcome,
            SectionOutcome::Failed {
                component_type: "HeroSection".to_string(),
                reason: "boom".to_string()
            }
        );
        assert!(sections[0].to_html().starts_with("<section data-theme=\"dark\""));
        assert!(sections[1].outcome.is_rendered());
    }

    #[tokio::test]
    async fn test_hidden_instances_are_skipped() {
        let source = StaticSource::new().with(ComponentType::CtaSection, title_renderer());
        let preview = renderer_with(source);
        let mut hidden = ComponentInstance::new("CtaSection", &json!({ "title": "Hidden" }), 0);
        hidden.is_visible = false;
        let shown = ComponentInstance::new("CtaSection", &json!({ "title": "Shown" }), 1);

        let sections = preview.render_page(&[hidden, shown]).await;
        assert_eq!(sections.len(), 1);
        assert!(page_html(&sections).contains("Shown"));
    }

    #[test]
    fn test_placeholder_escapes_reason() {
        let outcome = SectionOutcome::Failed {
            component_type: "HeroSection".to_string(),
            reason: "<script>".to_string(),
        };
        assert!(outcome.body().contains("&lt;script&gt;"));
    }

    #[test]
    fn test_outcome_json_is_camel_case() {
        let not_found = SectionOutcome::NotFound {
            component_type: "LegacyBannerSection".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&not_found).unwrap(),
            json!({ "status": "notFound", "componentType": "LegacyBannerSection" })
        );

        let failed = SectionOutcome::Failed {
            component_type: "HeroSection".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({ "status": "failed", "componentType": "HeroSection", "reason": "boom" })
        );
    }
}
