use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::FieldPath;

/// Schema-driven form engine over JSON Schema and JSON documents
#[derive(Parser, Debug, Clone)]
#[command(name = "schema-form", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "SCHEMA_FORM_CONFIG", default_value = "schema-form.toml", global = true)]
    pub config: PathBuf,

    /// Fail when a value on the path has the wrong kind instead of replacing it
    #[arg(long, global = true)]
    pub strict: bool,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,

    /// Log filter used when RUST_LOG is not set (e.g. "debug" or "schema_form=trace")
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the render tree for a document
    Tree {
        schema: PathBuf,
        document: PathBuf,
        /// Only render the subtree at this path (e.g. "items[0]")
        #[arg(long)]
        path: Option<FieldPath>,
    },
    /// Print the value at a path
    Get { document: PathBuf, path: FieldPath },
    /// Replace the value at a path and print the new document
    Set {
        schema: PathBuf,
        document: PathBuf,
        path: FieldPath,
        /// The new value, as JSON
        value: String,
    },
    /// Append a default element to the array at a path
    Insert {
        schema: PathBuf,
        document: PathBuf,
        path: FieldPath,
    },
    /// Remove an element from the array at a path
    Remove {
        schema: PathBuf,
        document: PathBuf,
        path: FieldPath,
        index: usize,
    },
    /// Print the default value for the schema, or the field at a path
    Synthesize {
        schema: PathBuf,
        path: Option<FieldPath>,
    },
    /// Check a document against a schema
    Validate { schema: PathBuf, document: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["schema-form", "validate", "s.json", "d.json"]);
        assert!(!cli.strict);
        assert!(!cli.compact);
        assert!(cli.log_level.is_none());
        assert_eq!(
            cli.command,
            Command::Validate {
                schema: PathBuf::from("s.json"),
                document: PathBuf::from("d.json"),
            }
        );
    }

    #[test]
    fn test_paths_are_parsed() {
        let cli = Cli::parse_from(["schema-form", "get", "d.json", "items[2].name"]);
        assert_eq!(
            cli.command,
            Command::Get {
                document: PathBuf::from("d.json"),
                path: path!["items", 2usize, "name"],
            }
        );

        let cli = Cli::parse_from(["schema-form", "remove", "s.json", "d.json", "items", "1", "--strict"]);
        assert!(cli.strict);
        assert_eq!(
            cli.command,
            Command::Remove {
                schema: PathBuf::from("s.json"),
                document: PathBuf::from("d.json"),
                path: path!["items"],
                index: 1,
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "schema-form",
            "synthesize",
            "s.json",
            "--compact",
            "--config",
            "custom.toml",
        ]);
        assert!(cli.compact);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(
            cli.command,
            Command::Synthesize {
                schema: PathBuf::from("s.json"),
                path: None,
            }
        );
    }

    #[test]
    fn test_invalid_path_is_rejected() {
        let result = Cli::try_parse_from(["schema-form", "get", "d.json", "items[x]"]);
        assert!(result.is_err());
    }
}
