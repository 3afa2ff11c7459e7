use schema_form::config::Settings;
use schema_form::form::AddressingMode;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_settings_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("schema-form.toml");

    let toml = r#"
[engine]
addressing = "strict"

[output]
pretty = false

[log]
level = "schema_form=debug"
"#;
    fs::write(&path, toml)?;

    let settings = Settings::from_file_with_env(&path, HashMap::new())?;
    assert_eq!(settings.engine.addressing, AddressingMode::Strict);
    assert!(!settings.output.pretty);
    assert_eq!(settings.log.level, "schema_form=debug");
    Ok(())
}

#[test]
fn test_partial_file_keeps_defaults() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("schema-form.toml");
    fs::write(&path, "[output]\npretty = false\n")?;

    let settings = Settings::from_file_with_env(&path, HashMap::new())?;
    assert_eq!(settings.engine.addressing, AddressingMode::Lenient);
    assert!(!settings.output.pretty);
    assert_eq!(settings.log.level, "info");
    Ok(())
}

#[test]
fn test_environment_beats_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("schema-form.toml");
    fs::write(&path, "[engine]\naddressing = \"strict\"\n")?;

    let env = HashMap::from([(
        "SCHEMA_FORM_ENGINE__ADDRESSING".to_string(),
        "lenient".to_string(),
    )]);
    let settings = Settings::from_file_with_env(&path, env)?;
    assert_eq!(settings.engine.addressing, AddressingMode::Lenient);
    Ok(())
}

#[test]
fn test_invalid_settings_are_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("schema-form.toml");

    fs::write(&path, "[engine]\naddressing = \"sloppy\"\n")?;
    assert!(Settings::from_file_with_env(&path, HashMap::new()).is_err());

    fs::write(&path, "[log]\nlevel = \"schema_form=loud\"\n")?;
    let err = Settings::from_file_with_env(&path, HashMap::new()).unwrap_err();
    assert!(err.to_string().contains("Configuration validation failed"));
    Ok(())
}
