use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub mod validator;

use crate::cli::Cli;
use crate::form::AddressingMode;

const ENV_PREFIX: &str = "SCHEMA_FORM";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct EngineSettings {
    /// How `set` treats containers of the wrong kind on a path
    #[serde(default)]
    pub addressing: AddressingMode,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OutputSettings {
    /// Pretty-print JSON written to stdout
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

fn default_pretty() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LogSettings {
    /// Filter directive used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Create settings from CLI arguments (config file, environment, then CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(&cli.config, None)?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        settings.validate()?;
        Ok(settings)
    }

    /// Load from a config file and the process environment. A missing file is
    /// not an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let settings = Self::load(path.as_ref(), None)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load with an explicit set of environment variables instead of the
    /// process environment
    pub fn from_file_with_env(
        path: impl AsRef<Path>,
        env: HashMap<String, String>,
    ) -> Result<Self, anyhow::Error> {
        let settings = Self::load(path.as_ref(), Some(env))?;
        settings.validate()?;
        Ok(settings)
    }

    fn load(path: &Path, env: Option<HashMap<String, String>>) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .set_default("engine.addressing", "lenient")?
            .set_default("output.pretty", true)?
            .set_default("log.level", default_log_level())?
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::SettingsValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if cli.strict {
            self.engine.addressing = AddressingMode::Strict;
        }
        if cli.compact {
            self.output.pretty = false;
        }
        if let Some(level) = &cli.log_level {
            self.log.level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_without_file() {
        let settings =
            Settings::from_file_with_env("does-not-exist.toml", HashMap::new()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.engine.addressing, AddressingMode::Lenient);
        assert!(settings.output.pretty);
        assert_eq!(settings.log.level, "info");
    }

    #[test]
    fn test_environment_overrides() {
        let env = HashMap::from([
            ("SCHEMA_FORM_ENGINE__ADDRESSING".to_string(), "strict".to_string()),
            ("SCHEMA_FORM_OUTPUT__PRETTY".to_string(), "false".to_string()),
        ]);
        let settings = Settings::from_file_with_env("does-not-exist.toml", env).unwrap();
        assert_eq!(settings.engine.addressing, AddressingMode::Strict);
        assert!(!settings.output.pretty);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "schema-form",
            "--config",
            "does-not-exist.toml",
            "--strict",
            "--compact",
            "--log-level",
            "debug",
            "validate",
            "schema.json",
            "doc.json",
        ]);
        let settings = Settings::new_with_cli(&cli).unwrap();
        assert_eq!(settings.engine.addressing, AddressingMode::Strict);
        assert!(!settings.output.pretty);
        assert_eq!(settings.log.level, "debug");
    }
}
