use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::settings::env_file::{read_env_file, write_env_file};
use crate::settings::schema::{SETTINGS_SCHEMA, SettingType, find_group, schema_json};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid request payload")]
    InvalidPayload,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub updated_keys: Vec<String>,
    pub requires_restart: bool,
}

/// Schema-driven view over a `.env` file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

fn as_setting_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> Value {
        schema_json()
    }

    /// Current values per group, falling back to schema defaults.
    pub fn values(&self) -> Result<Value> {
        let env_values = read_env_file(&self.path)?;

        let mut result = Map::new();
        for group in SETTINGS_SCHEMA {
            let mut entries = Map::new();
            for item in group.items {
                let value = env_values
                    .get(item.key)
                    .cloned()
                    .unwrap_or_else(|| item.default.to_string());

                if item.kind == SettingType::Password {
                    entries.insert(
                        format!("{}_configured", item.key),
                        Value::Bool(!value.is_empty()),
                    );
                }
                entries.insert(item.key.to_string(), Value::String(value));
            }
            result.insert(group.key.to_string(), Value::Object(entries));
        }

        Ok(Value::Object(result))
    }

    /// Applies `{ group: { KEY: value } }` to the file. Unknown groups and
    /// keys are ignored; blank values only clear optional items.
    pub fn save(&self, payload: &Value) -> Result<SaveOutcome> {
        let groups = payload
            .as_object()
            .filter(|g| !g.is_empty())
            .ok_or(SettingsError::InvalidPayload)?;

        let mut updates = BTreeMap::new();
        let mut updated_keys = Vec::new();

        for (group_key, group_values) in groups {
            let Some(group) = find_group(group_key) else {
                continue;
            };
            let Some(group_values) = group_values.as_object() else {
                continue;
            };

            for item in group.items {
                let Some(raw) = group_values.get(item.key) else {
                    continue;
                };

                let value = match as_setting_string(raw) {
                    Some(value) => value,
                    None if !item.required => String::new(),
                    None => continue,
                };

                updates.insert(item.key.to_string(), value);
                updated_keys.push(item.key.to_string());
            }
        }

        write_env_file(&self.path, &updates)?;
        tracing::info!("Saved {} settings to {}", updated_keys.len(), self.path.display());

        Ok(SaveOutcome {
            updated_keys,
            requires_restart: true,
        })
    }
}
