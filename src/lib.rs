//! # Pagesmith - schema-driven page composition
//!
//! Pagesmith turns a catalog of marketing page sections into editable forms
//! and live previews.
//!
//! ## Features
//!
//! - **Schema Registry**: per-section field schemas and default content
//! - **Dynamic Forms**: form trees generated from schemas, or inferred from data
//! - **Prop Normalization**: legacy content shapes mapped onto renderer props
//! - **Live Preview**: per-section failure isolation over pluggable renderers
//! - **Page Store**: ordered sections with add/remove/move/duplicate
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pagesmith::normalize::Normalizer;
//! use pagesmith::registry::SchemaRegistry;
//! use std::sync::Arc;
//!
//! fn main() -> anyhow::Result<()> {
//!     let registry = Arc::new(SchemaRegistry::builtin()?);
//!     let normalizer = Normalizer::new(registry);
//!     let props = normalizer.normalize(
//!         "PayrollFAQSection",
//!         &serde_json::json!({ "faq": { "items": [] } }),
//!     );
//!     println!("{}", props);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: tags, schemas, instances and paths
//! - **Registry / Forms / Normalize**: pure, synchronous core
//! - **Preview**: the only async boundary (renderer resolution)
//! - **Store**: owner of page state
//! - **Config / CLI**: maintenance tooling

pub mod audit;
pub mod cli;
pub mod config;
pub mod domain;
pub mod forms;
pub mod normalize;
pub mod preview;
pub mod registry;
pub mod store;

use anyhow::Context;
use serde_json::{json, Map, Value};
use std::path::Path;
use std::sync::Arc;

use crate::cli::{Cli, Command};
use crate::config::Settings;
use crate::domain::PageDocument;
use crate::forms::FormGenerator;
use crate::normalize::Normalizer;
use crate::preview::{page_html, PreviewRenderer, TemplateSource};
use crate::registry::SchemaRegistry;
use crate::store::PageStore;

/// Run one CLI command and return its JSON output
pub async fn run(cli: &Cli, settings: &Settings) -> anyhow::Result<Value> {
    let registry = Arc::new(SchemaRegistry::load(settings.catalog.path.as_deref())?);

    let output = match &cli.command {
        Command::Audit => {
            let report = audit::audit(&registry);
            tracing::info!(
                tags = report.tags.len(),
                hidden_arrays = report.hidden_array_count(),
                "Catalog audit finished"
            );
            if !report.is_clean() {
                tracing::warn!(
                    problems = report.problems().count(),
                    "Catalog audit found problems"
                );
            }
            serde_json::to_value(report)?
        }
        Command::Schema { component_type } => match registry.get_schema(component_type) {
            Some(schema) => serde_json::to_value(schema)?,
            None => anyhow::bail!("No schema for component type '{}'", component_type),
        },
        Command::Form { component_type, data } => {
            let data = match data {
                Some(path) => read_json(path).await?,
                None => registry.get_default_data(component_type),
            };
            let generator = FormGenerator::new(settings.form_options());
            let form = generator.render(component_type, registry.get_schema(component_type), &data);
            serde_json::to_value(form)?
        }
        Command::Normalize { component_type, file } => {
            let raw = read_optional_json(file.as_deref()).await?;
            Normalizer::new(registry).normalize(component_type, &raw)
        }
        Command::Validate { component_type, file } => {
            let raw = read_optional_json(file.as_deref()).await?;
            let (props, report) = Normalizer::new(registry).normalize_and_validate(component_type, &raw);
            json!({ "props": props, "report": report })
        }
        Command::Preview { page_file, .. } => {
            let document: PageDocument = serde_json::from_value(read_json(page_file).await?)
                .with_context(|| format!("Invalid page document {}", page_file.display()))?;
            let store = PageStore::from_document(registry.clone(), document);

            let source = Arc::new(TemplateSource::new(settings.preview.template_dir.clone()));
            let renderer = PreviewRenderer::new(source, Normalizer::new(registry));
            let sections = renderer.render_page(store.components()).await;

            json!({
                "name": store.to_document().name,
                "html": page_html(&sections),
                "sections": sections,
            })
        }
    };

    Ok(output)
}

async fn read_json(path: &Path) -> anyhow::Result<Value> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

async fn read_optional_json(path: Option<&Path>) -> anyhow::Result<Value> {
    match path {
        Some(path) => read_json(path).await,
        None => Ok(Value::Object(Map::new())),
    }
}
