//! Flat property store for sensor settings.
//!
//! Settings are read from a TOML file whose nested tables are flattened into
//! dotted keys, so both of these spell `sonar.junit.reportsPath`:
//!
//! ```toml
//! "sonar.junit.reportsPath" = "build/reports"
//!
//! [sonar.junit]
//! reportsPath = "build/reports"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::SettingsError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    properties: BTreeMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses TOML text into flattened properties.
    pub fn parse_toml(text: &str) -> Result<Self, toml::de::Error> {
        let table: toml::Table = text.parse()?;
        let mut settings = Settings::new();
        flatten_into(&mut settings.properties, None, &table);
        Ok(settings)
    }

    /// Loads a TOML settings file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_toml(&text).map_err(|source| SettingsError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Applies `KEY=VALUE` overrides, later ones winning.
    pub fn apply_overrides<I, S>(&mut self, overrides: I) -> Result<(), SettingsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for raw in overrides {
            let raw = raw.as_ref();
            let (key, value) = raw
                .split_once('=')
                .filter(|(key, _)| !key.trim().is_empty())
                .ok_or_else(|| SettingsError::InvalidOverride {
                    value: raw.to_string(),
                })?;
            self.set(key.trim(), value.trim());
        }
        Ok(())
    }

    /// Value of `key`, or `None` when unset or blank.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

fn flatten_into(out: &mut BTreeMap<String, String>, prefix: Option<&str>, table: &toml::Table) {
    for (key, value) in table {
        let full_key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            toml::Value::Table(nested) => flatten_into(out, Some(&full_key), nested),
            other => {
                out.insert(full_key, scalar_to_string(other));
            }
        }
    }
}

fn scalar_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(text) => text.clone(),
        toml::Value::Array(items) => items
            .iter()
            .map(scalar_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
