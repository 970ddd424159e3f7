// svgward-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use svgward_core::{DirectiveInput, SanitizerConfig, SvgValidator, Whitelist};

#[test]
fn test_load_default_whitelist() {
    let whitelist = Whitelist::load_default().unwrap();
    assert!(whitelist.tags.len() > 100);
    assert!(whitelist.tags.iter().any(|t| t == "circle"));
    assert!(!whitelist.tags.iter().any(|t| t == "script"));
    assert!(!whitelist.attributes.iter().any(|a| a.starts_with("on")));
}

#[test]
fn test_load_from_file() -> Result<()> {
    let yaml_content = r#"
remove_remote_references: false
minify: true
custom_tags: "foreignobject -style"
custom_attrs:
  - "data-id"
  - "- style"
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = SanitizerConfig::load_from_file(file.path())?;

    assert!(!config.remove_remote_references);
    assert!(config.minify);
    assert_eq!(config.custom_tags, Some(DirectiveInput::from("foreignobject -style")));
    assert_eq!(config.custom_attrs, Some(DirectiveInput::from(vec!["data-id", "- style"])));
    Ok(())
}

#[test]
fn test_load_from_file_uses_defaults_for_missing_fields() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"minify: true\n")?;
    let config = SanitizerConfig::load_from_file(file.path())?;

    assert!(config.remove_remote_references);
    assert!(config.custom_tags.is_none());
    Ok(())
}

#[test]
fn test_load_from_file_rejects_markup_in_directives() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"custom_attrs: \"onload=alert(1)\"\n")?;
    let err = SanitizerConfig::load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Configuration validation failed"));
    Ok(())
}

#[test]
fn test_load_from_missing_file_fails_with_context() {
    let err = SanitizerConfig::load_from_file("/definitely/not/here.yaml").unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read config file"));
}

#[test]
fn test_file_config_drives_effective_whitelist() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"custom_tags: \"foreignobject -style\"\n")?;
    let config = SanitizerConfig::load_from_file(file.path())?;

    let validator = SvgValidator::with_defaults(config)?;
    let defaults = validator.default_whitelist();
    let effective = validator.effective_whitelist();

    assert!(defaults.tags.iter().any(|t| t == "style"));
    assert!(!effective.tags.iter().any(|t| t == "style"));
    assert_eq!(effective.tags.last().map(String::as_str), Some("foreignobject"));
    assert_eq!(effective.tags.len(), defaults.tags.len());
    assert_eq!(effective.attributes, defaults.attributes);
    Ok(())
}
