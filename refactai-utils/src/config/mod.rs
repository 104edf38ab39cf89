//! Configuration loading in TOML, JSON and YAML
//!
//! Files are read into a format-neutral JSON value first so a partial file
//! can be laid over a complete set of defaults before being deserialized
//! into the target type.

use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

/// Configuration file formats recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Detect the format from a path's extension
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yml" | "yaml" => Ok(Self::Yaml),
            _ => Err(crate::UtilError::Config(format!(
                "Unsupported config format: '{extension}' ({})",
                path.display()
            ))),
        }
    }

    /// Parse text in this format into a JSON value
    pub fn parse_value(self, content: &str) -> crate::Result<serde_json::Value> {
        match self {
            Self::Toml => {
                let toml_value: toml::Value = toml::from_str(content)
                    .map_err(|e| crate::UtilError::Config(format!("TOML parse error: {e}")))?;
                serde_json::to_value(toml_value)
                    .map_err(|e| crate::UtilError::Config(format!("TOML conversion error: {e}")))
            }
            Self::Json => serde_json::from_str(content)
                .map_err(|e| crate::UtilError::Config(format!("JSON parse error: {e}"))),
            Self::Yaml => serde_yaml::from_str(content)
                .map_err(|e| crate::UtilError::Config(format!("YAML parse error: {e}"))),
        }
    }
}

/// Read a configuration file into a JSON value
pub fn load_value(path: &Path) -> crate::Result<serde_json::Value> {
    let format = ConfigFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    format.parse_value(&content)
}

/// Load a complete configuration from file
pub fn load_config<T>(path: &Path) -> crate::Result<T>
where
    T: DeserializeOwned,
{
    let value = load_value(path)?;
    serde_json::from_value(value)
        .map_err(|e| crate::UtilError::Config(format!("{}: {e}", path.display())))
}

/// Load a possibly partial configuration file on top of `T::default()`
pub fn load_config_with_defaults<T>(path: &Path) -> crate::Result<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    let overlay = load_value(path)?;
    let mut base = serde_json::to_value(T::default())
        .map_err(|e| crate::UtilError::Serialization(format!("Default serialization error: {e}")))?;
    merge_json_values(&mut base, overlay);
    serde_json::from_value(base)
        .map_err(|e| crate::UtilError::Config(format!("{}: {e}", path.display())))
}

/// Merge two JSON values (second overrides first, objects merge recursively)
fn merge_json_values(base: &mut serde_json::Value, override_value: serde_json::Value) {
    match (base, override_value) {
        (serde_json::Value::Object(base_obj), serde_json::Value::Object(override_obj)) => {
            for (key, value) in override_obj {
                match base_obj.get_mut(&key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_obj.insert(key, value);
                    }
                }
            }
        }
        (base_value, override_value) => {
            *base_value = override_value;
        }
    }
}
