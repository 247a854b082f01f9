use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pagesmith - schema-driven section forms, prop normalization and page previews
#[derive(Parser, Debug, Clone)]
#[command(name = "pagesmith", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "PAGESMITH_CONFIG", default_value = "pagesmith.toml")]
    pub config: PathBuf,

    /// Catalog file replacing the built-in component catalog
    #[arg(long, env = "PAGESMITH_CATALOG")]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Cross-check schemas, defaults and normalizer tables
    Audit,

    /// Print the field schema of a component type
    Schema {
        component_type: String,
    },

    /// Print the form generated for a component type
    Form {
        component_type: String,
        /// JSON content file (defaults to the catalog defaults)
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Print normalized props for raw content
    Normalize {
        component_type: String,
        /// JSON content file (`{}` when omitted)
        file: Option<PathBuf>,
    },

    /// Normalize raw content and report missing required props
    Validate {
        component_type: String,
        file: Option<PathBuf>,
    },

    /// Render a page document with the section templates
    Preview {
        page_file: PathBuf,
        /// Template directory (overrides preview.template_dir)
        #[arg(long, env = "PAGESMITH_TEMPLATE_DIR")]
        template_dir: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["pagesmith", "audit"]);
        assert_eq!(cli.config, PathBuf::from("pagesmith.toml"));
        assert!(cli.catalog.is_none());
        assert_eq!(cli.command, Command::Audit);
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "pagesmith",
            "--config",
            "custom.toml",
            "--catalog",
            "catalog.json",
            "form",
            "HeroSection",
            "--data",
            "hero.json",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.catalog, Some(PathBuf::from("catalog.json")));
        assert_eq!(
            cli.command,
            Command::Form {
                component_type: "HeroSection".to_string(),
                data: Some(PathBuf::from("hero.json")),
            }
        );
    }

    #[test]
    fn test_normalize_file_is_optional() {
        let cli = Cli::parse_from(["pagesmith", "normalize", "PayrollFAQSection"]);
        assert_eq!(
            cli.command,
            Command::Normalize {
                component_type: "PayrollFAQSection".to_string(),
                file: None,
            }
        );
    }
}
