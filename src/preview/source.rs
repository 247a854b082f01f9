//! Renderer sources: tera templates on disk and in-memory registrations

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tera::{Context, Tera};
use tracing::debug;

use super::{RendererSource, ResolveError, SectionRenderer};
use crate::domain::ComponentType;

/// A compiled tera template rendering one section
pub struct TemplateRenderer {
    tera: Tera,
    name: String,
}

impl TemplateRenderer {
    pub fn compile(name: &str, content: &str) -> Result<Self, ResolveError> {
        let mut tera = Tera::default();
        tera.add_raw_template(name, content)
            .map_err(|source| ResolveError::Template {
                name: name.to_string(),
                source,
            })?;
        Ok(Self {
            tera,
            name: name.to_string(),
        })
    }
}

impl SectionRenderer for TemplateRenderer {
    fn render(&self, props: &Value) -> anyhow::Result<String> {
        let context = Context::from_value(props.clone())?;
        Ok(self.tera.render(&self.name, &context)?)
    }
}

/// Default template location for a tag: `<group>/<kebab-name>.html`
pub fn template_path(tag: ComponentType) -> String {
    const GROUPS: &[(&str, &str)] = &[
        ("About", "about"),
        ("PopularIntegrations", "integration"),
        ("Integration", "integration"),
        ("Payroll", "payroll"),
        ("HR", "hr"),
        ("Training", "training"),
        ("Implementation", "implementation"),
    ];

    let name = tag.as_str();
    let name = name.strip_suffix("Section").unwrap_or(name);
    let (group, stem) = GROUPS
        .iter()
        .find_map(|(prefix, group)| {
            let rest = name.strip_prefix(prefix)?;
            // PopularIntegrations keeps its full name
            let stem = if *prefix == "PopularIntegrations" { name } else { rest };
            Some((*group, stem))
        })
        .unwrap_or(("landing", name));

    format!("{}/{}.html", group, kebab_case(stem))
}

fn kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev_lower = chars[i - 1].is_lowercase();
            let next_lower = chars.get(i + 1).map_or(false, |c| c.is_lowercase());
            if prev_lower || (chars[i - 1].is_uppercase() && next_lower) {
                out.push('-');
            }
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// Loads `<dir>/<template path>` on demand and compiles it with tera
pub struct TemplateSource {
    dir: PathBuf,
    paths: HashMap<ComponentType, String>,
}

impl TemplateSource {
    /// Source with the default template path for every tag
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            paths: ComponentType::ALL.iter().map(|tag| (*tag, template_path(*tag))).collect(),
        }
    }

    /// Source with no template paths registered
    pub fn empty(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            paths: HashMap::new(),
        }
    }

    pub fn with_path(mut self, tag: ComponentType, path: impl Into<String>) -> Self {
        self.paths.insert(tag, path.into());
        self
    }

    pub fn without(mut self, tag: ComponentType) -> Self {
        self.paths.remove(&tag);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl RendererSource for TemplateSource {
    async fn resolve(&self, tag: ComponentType) -> Result<Option<Arc<dyn SectionRenderer>>, ResolveError> {
        let Some(relative) = self.paths.get(&tag) else {
            return Ok(None);
        };

        let path = self.dir.join(relative);
        let content = tokio::fs::read_to_string(&path).await.map_err(|source| ResolveError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(component_type = %tag, path = %path.display(), "Loaded section template");

        let renderer = TemplateRenderer::compile(relative, &content)?;
        Ok(Some(Arc::new(renderer)))
    }
}

/// Renderers registered in memory
#[derive(Default)]
pub struct StaticSource {
    renderers: HashMap<ComponentType, Arc<dyn SectionRenderer>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tag: ComponentType, renderer: Arc<dyn SectionRenderer>) -> Self {
        self.renderers.insert(tag, renderer);
        self
    }

    pub fn insert(&mut self, tag: ComponentType, renderer: Arc<dyn SectionRenderer>) {
        self.renderers.insert(tag, renderer);
    }
}

#[async_trait]
impl RendererSource for StaticSource {
    async fn resolve(&self, tag: ComponentType) -> Result<Option<Arc<dyn SectionRenderer>>, ResolveError> {
        Ok(self.renderers.get(&tag).cloned())
    }
}
