use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;
use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::PathBuf,
};

use crate::error::Error;

/// Logging configuration, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            file: None,
        }
    }
}

impl LogSettings {
    /// Reads `LOG_LEVEL` (default `INFO`) and `LOG_FILE` from the environment
    /// or a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LogLevel`] if `LOG_LEVEL` names no known level.
    pub fn from_env() -> Result<Self, Error> {
        let level = match dotenvy::var("LOG_LEVEL") {
            Ok(level) => parse_level(&level)?,
            Err(_) => LevelFilter::Info,
        };
        let file = dotenvy::var("LOG_FILE")
            .ok()
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Ok(Self { level, file })
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, Error> {
    match level.trim().to_uppercase().as_str() {
        "OFF" => Ok(LevelFilter::Off),
        "TRACE" => Ok(LevelFilter::Trace),
        "DEBUG" => Ok(LevelFilter::Debug),
        "INFO" => Ok(LevelFilter::Info),
        "WARN" | "WARNING" => Ok(LevelFilter::Warn),
        "ERROR" | "CRITICAL" | "FATAL" => Ok(LevelFilter::Error),
        _ => Err(Error::LogLevel(level.to_string())),
    }
}

/// Copies every log record to stdout and to a file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

/// Installs the global logger.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a logger is already
/// installed.
pub fn init(settings: &LogSettings) -> Result<(), Error> {
    let mut builder = Builder::new();
    builder.filter_level(settings.level).format(|buf, record| {
        writeln!(
            buf,
            "[{}] {} [{}:{}]: {}",
            buf.timestamp(),
            record.level(),
            record.module_path().unwrap_or_default(),
            record.line().unwrap_or_default(),
            record.args()
        )
    });

    match &settings.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .target(Target::Pipe(Box::new(Tee { file })))
                .write_style(WriteStyle::Never);
        }
        None => {
            builder.target(Target::Stdout);
        }
    }

    builder.try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("INFO").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level("Warning").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_level("CRITICAL").unwrap(), LevelFilter::Error);
        assert_eq!(parse_level(" trace ").unwrap(), LevelFilter::Trace);
        assert!(matches!(parse_level("loud"), Err(Error::LogLevel(level)) if level == "loud"));
    }

    #[test]
    fn test_default_settings() {
        let settings = LogSettings::default();
        assert_eq!(settings.level, LevelFilter::Info);
        assert!(settings.file.is_none());
    }

    #[test]
    fn test_tee_writes_to_file() {
        let temp_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let file = temp_file.reopen().expect("Failed to reopen temp file");
        let mut tee = Tee { file };

        writeln!(tee, "example.com has 100% availability percentage").unwrap();
        tee.flush().unwrap();

        let written = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(written, "example.com has 100% availability percentage\n");
    }
}
