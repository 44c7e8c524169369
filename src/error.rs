use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Logger initialization error: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("Invalid log level: {0}")]
    LogLevel(String),
}

/// Reasons an endpoint configuration file is rejected.
///
/// Endpoints are identified by name when the name is known, otherwise by
/// their zero-based position in the list.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: provided yaml file is not an array")]
    NotAList,
    #[error("invalid config: endpoint #{index} is not a mapping")]
    NotAMapping { index: usize },
    #[error("invalid config: an endpoint (#{index}) does not have required 'name' key")]
    MissingName { index: usize },
    #[error("invalid config: endpoint '{name}' does not have required 'url' key")]
    MissingUrl { name: String },
    #[error("invalid config: endpoint #{index} has an empty 'name'")]
    EmptyName { index: usize },
    #[error("invalid config: endpoint '{name}' has invalid url '{url}': {source}")]
    InvalidUrl {
        name: String,
        url: String,
        source: url::ParseError,
    },
    #[error("invalid config: endpoint '{name}' has invalid method '{method}'")]
    InvalidMethod { name: String, method: String },
    #[error("invalid config: endpoint {endpoint} is malformed: {source}")]
    Malformed {
        endpoint: String,
        source: serde_yaml::Error,
    },
}
