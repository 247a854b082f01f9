use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod validator;

use crate::cli::{Cli, Command};
use crate::forms::FormOptions;

/// Layered settings: config file, then `PAGESMITH__SECTION__KEY`
/// environment variables, then command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub forms: FormSettings,
    #[serde(default)]
    pub preview: PreviewSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CatalogSettings {
    /// Catalog file replacing the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FormSettings {
    /// Strings longer than this are inferred as long text
    #[serde(default = "default_long_text_threshold")]
    pub long_text_threshold: usize,
    /// Render inferred controls for keys the schema does not declare
    #[serde(default)]
    pub render_unknown_keys: bool,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            long_text_threshold: default_long_text_threshold(),
            render_unknown_keys: false,
        }
    }
}

fn default_long_text_threshold() -> usize {
    100
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PreviewSettings {
    /// Directory holding section templates
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            template_dir: default_template_dir(),
        }
    }
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

impl Settings {
    /// Load settings for a CLI invocation (CLI > env vars > config file)
    pub fn load(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::read(&cli.config)?;
        settings.apply_cli_overrides(cli);
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a config file and the environment only
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let settings = Self::read(path)?;
        settings.validate()?;
        Ok(settings)
    }

    fn read(path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("PAGESMITH")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("forms.long_text_threshold", 100)?
            .set_default("forms.render_unknown_keys", false)?
            .set_default("preview.template_dir", "templates")?
            .build()?;

        let settings: Settings = s.try_deserialize()?;
        tracing::debug!(config = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(catalog) = &cli.catalog {
            self.catalog.path = Some(catalog.clone());
        }
        if let Command::Preview {
            template_dir: Some(dir),
            ..
        } = &cli.command
        {
            self.preview.template_dir = dir.clone();
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::SettingsValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!("Configuration validation failed:\n{}", error_messages.join("\n"))
        })
    }

    pub fn form_options(&self) -> FormOptions {
        FormOptions {
            long_text_threshold: self.forms.long_text_threshold,
            render_unknown_keys: self.forms.render_unknown_keys,
        }
    }
}
