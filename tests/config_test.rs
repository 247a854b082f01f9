use pagesmith::config::Settings;
use pagesmith::registry::SchemaRegistry;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_settings_file_with_catalog_override() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    // A one-entry catalog replacing the built-in one
    let catalog = r#"
{
    "HeroSection": {
        "displayName": "Hero",
        "category": "landing",
        "schema": {
            "type": "object",
            "properties": {
                "headline": { "type": "string", "label": "Headline", "required": true }
            }
        },
        "defaultData": { "headline": "Welcome" }
    }
}
"#;
    fs::write(root.join("catalog.json"), catalog)?;

    let pagesmith_toml = format!(
        r#"
[catalog]
path = "{}"

[forms]
long_text_threshold = 60

[preview]
template_dir = "site/templates"
"#,
        root.join("catalog.json").display()
    );
    fs::write(root.join("pagesmith.toml"), pagesmith_toml)?;

    let settings = Settings::from_file(&root.join("pagesmith.toml"))?;
    assert_eq!(settings.forms.long_text_threshold, 60);
    assert_eq!(settings.preview.template_dir, PathBuf::from("site/templates"));

    let registry = SchemaRegistry::load(settings.catalog.path.as_deref())?;
    assert_eq!(registry.len(), 1);
    assert!(registry.get_schema("CtaSection").is_none());
    assert_eq!(
        registry.get_default_data("HeroSection"),
        serde_json::json!({ "headline": "Welcome" })
    );
    Ok(())
}

#[test]
fn test_missing_file_uses_defaults() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let settings = Settings::from_file(&temp_dir.path().join("absent.toml"))?;

    assert!(settings.catalog.path.is_none());
    assert_eq!(settings.forms.long_text_threshold, 100);
    assert_eq!(settings.preview.template_dir, PathBuf::from("templates"));
    Ok(())
}

#[test]
fn test_environment_overrides_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("pagesmith.toml");
    fs::write(&path, "[forms]\nrender_unknown_keys = false\n")?;

    std::env::set_var("PAGESMITH__FORMS__RENDER_UNKNOWN_KEYS", "true");
    let settings = Settings::from_file(&path);
    std::env::remove_var("PAGESMITH__FORMS__RENDER_UNKNOWN_KEYS");

    assert!(settings?.forms.render_unknown_keys);
    Ok(())
}

#[test]
fn test_invalid_settings_report_every_problem() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("pagesmith.toml");
    fs::write(
        &path,
        "[catalog]\npath = \"/no/such/catalog.json\"\n\n[forms]\nlong_text_threshold = 0\n",
    )?;

    let err = Settings::from_file(&path).unwrap_err().to_string();
    assert!(err.starts_with("Configuration validation failed"));
    assert!(err.contains("catalog.path"));
    assert!(err.contains("forms.long_text_threshold"));
    Ok(())
}
