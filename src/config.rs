use log::debug;
use reqwest::Method;
use serde::Deserialize;
use serde_yaml::Value;
use std::{collections::HashMap, fs, path::Path};
use url::Url;

use crate::error::ConfigError;

/// One configured HTTP target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EndpointSpec {
    pub name: String,
    pub url: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Loads and validates the endpoint list stored at `path`.
///
/// The file must hold a YAML sequence of endpoint mappings. Entries are
/// returned in file order, unchanged. A single invalid entry rejects the
/// whole file.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, is not valid YAML,
/// is not a list, or if any entry is missing `name`/`url` or carries an
/// unusable value.
pub fn load_endpoints<P: AsRef<Path>>(path: P) -> Result<Vec<EndpointSpec>, ConfigError> {
    let path = path.as_ref();
    debug!("loading configuration");
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_endpoints(&content)
}

/// Parses and validates an endpoint list from YAML text.
///
/// # Errors
///
/// See [`load_endpoints`].
pub fn parse_endpoints(content: &str) -> Result<Vec<EndpointSpec>, ConfigError> {
    let root: Value = serde_yaml::from_str(content)?;
    debug!("configuration loaded. validating config");

    let Value::Sequence(entries) = root else {
        return Err(ConfigError::NotAList);
    };

    let endpoints = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| validate_entry(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("configuration successfully validated");
    Ok(endpoints)
}

fn validate_entry(index: usize, entry: Value) -> Result<EndpointSpec, ConfigError> {
    let Some(mapping) = entry.as_mapping() else {
        return Err(ConfigError::NotAMapping { index });
    };

    let Some(name) = mapping.get("name") else {
        return Err(ConfigError::MissingName { index });
    };
    let label = name
        .as_str()
        .map_or_else(|| format!("#{index}"), |name| format!("'{name}'"));

    if !mapping.contains_key("url") {
        return Err(ConfigError::MissingUrl {
            name: name.as_str().map_or_else(|| format!("#{index}"), str::to_string),
        });
    }

    let endpoint: EndpointSpec = serde_yaml::from_value(entry)
        .map_err(|source| ConfigError::Malformed { endpoint: label, source })?;

    if endpoint.name.is_empty() {
        return Err(ConfigError::EmptyName { index });
    }

    if let Err(source) = Url::parse(&endpoint.url) {
        return Err(ConfigError::InvalidUrl {
            name: endpoint.name,
            url: endpoint.url,
            source,
        });
    }

    if Method::from_bytes(endpoint.method.as_bytes()).is_err() {
        return Err(ConfigError::InvalidMethod {
            name: endpoint.name,
            method: endpoint.method,
        });
    }

    Ok(endpoint)
}
