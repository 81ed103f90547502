//! Configuration file handling

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use sqlevent_core::telemetry::DEFAULT_METHOD;
use sqlevent_core::EventKind;
use std::path::{Path, PathBuf};

use crate::args::OutputFormat;

const CONFIG_FILE_NAME: &str = "sqlevent.toml";

/// Configuration for sqlevent
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// SQL file paths or glob patterns to scan
    #[serde(default)]
    pub files: Vec<String>,

    /// Output format (human, json, telemetry)
    #[serde(default)]
    pub format: Option<String>,

    /// Event kinds to report (e.g., ["table_created", "view_created"])
    #[serde(default)]
    pub kinds: Vec<String>,

    /// Method reported in telemetry payloads
    #[serde(default)]
    pub method: Option<String>,

    /// Only report table events
    #[serde(default)]
    pub tables_only: bool,

    /// Treat dollar-quoted bodies as opaque when splitting
    #[serde(default)]
    pub dollar_quoting: bool,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).into_diagnostic()
    }

    /// Try to find and load sqlevent.toml in current directory or parent directories
    pub fn find_and_load() -> Result<Option<Self>> {
        let mut current_dir = std::env::current_dir().into_diagnostic()?;

        loop {
            let config_path = current_dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "loading config");
                return Ok(Some(Self::from_file(&config_path)?));
            }

            if !current_dir.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Merge CLI arguments into configuration
    /// CLI arguments take precedence over config file values
    pub fn merge_with_args(
        mut self,
        files: &[PathBuf],
        format: Option<OutputFormat>,
        kinds: &[EventKind],
        method: Option<&str>,
        tables_only: bool,
        dollar_quoting: bool,
    ) -> Self {
        if !files.is_empty() {
            self.files = files.iter().map(|p| p.display().to_string()).collect();
        }

        if let Some(fmt) = format {
            self.format = fmt
                .to_possible_value()
                .map(|value| value.get_name().to_string());
        }

        if !kinds.is_empty() {
            self.kinds = kinds.iter().map(|kind| kind.to_string()).collect();
        }

        if let Some(method) = method {
            self.method = Some(method.to_string());
        }

        // Flags can only switch these on
        self.tables_only |= tables_only;
        self.dollar_quoting |= dollar_quoting;

        self
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        match &self.format {
            Some(name) => OutputFormat::from_str(name, true).map_err(|_| {
                miette::miette!(
                    help = "supported formats: human, json, telemetry",
                    "Unknown output format: '{}'",
                    name
                )
            }),
            None => Ok(OutputFormat::default()),
        }
    }

    pub fn event_kinds(&self) -> Result<Vec<EventKind>> {
        self.kinds
            .iter()
            .map(|kind| kind.parse::<EventKind>().map_err(miette::Report::new))
            .collect()
    }

    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or(DEFAULT_METHOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config = Config::from_toml(
            r#"
            files = ["migrations/*.sql"]
            format = "telemetry"
            kinds = ["table_created", "view_created"]
            method = "migration"
            dollar_quoting = true
            "#,
        )
        .unwrap();

        assert_eq!(config.files, vec!["migrations/*.sql"]);
        assert_eq!(config.output_format().unwrap(), OutputFormat::Telemetry);
        assert_eq!(
            config.event_kinds().unwrap(),
            vec![EventKind::TableCreated, EventKind::ViewCreated]
        );
        assert_eq!(config.method(), "migration");
        assert!(config.dollar_quoting);
        assert!(!config.tables_only);
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output_format().unwrap(), OutputFormat::Human);
        assert!(config.event_kinds().unwrap().is_empty());
        assert_eq!(config.method(), "sql_editor");
    }

    #[test]
    fn test_unknown_values_are_errors() {
        let config = Config {
            format: Some("xml".to_string()),
            kinds: vec!["table_dropped".to_string()],
            ..Config::default()
        };
        assert!(config.output_format().is_err());
        assert!(config.event_kinds().is_err());
    }

    #[test]
    fn test_cli_args_override_config() {
        let config = Config {
            files: vec!["a.sql".to_string()],
            format: Some("json".to_string()),
            kinds: vec!["table_created".to_string()],
            method: Some("migration".to_string()),
            tables_only: true,
            dollar_quoting: false,
        };

        let merged = config.clone().merge_with_args(
            &[PathBuf::from("b.sql")],
            Some(OutputFormat::Telemetry),
            &[EventKind::ViewCreated],
            Some("sql_editor"),
            false,
            true,
        );
        assert_eq!(merged.files, vec!["b.sql"]);
        assert_eq!(merged.output_format().unwrap(), OutputFormat::Telemetry);
        assert_eq!(merged.event_kinds().unwrap(), vec![EventKind::ViewCreated]);
        assert_eq!(merged.method(), "sql_editor");
        assert!(merged.tables_only);
        assert!(merged.dollar_quoting);

        let untouched = config.clone().merge_with_args(&[], None, &[], None, false, false);
        assert_eq!(untouched, config);
    }
}
