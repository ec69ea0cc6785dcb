use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProphetError {
    #[error("API Error: {0}")]
    ApiError(String),
    #[error("Parse Error: {0}")]
    ParseError(String),
    #[error("Network Error: {0}")]
    NetworkError(String),
    #[error("IO Error: {0}")]
    IoError(String),
    #[error("Config Error: {0}")]
    ConfigError(String),
    #[error("No input files found in {}", .0.display())]
    NoInputFiles(PathBuf),
}

impl From<reqwest::Error> for ProphetError {
    fn from(err: reqwest::Error) -> Self {
        ProphetError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for ProphetError {
    fn from(err: serde_json::Error) -> Self {
        ProphetError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for ProphetError {
    fn from(err: std::io::Error) -> Self {
        ProphetError::IoError(err.to_string())
    }
}

impl From<csv::Error> for ProphetError {
    fn from(err: csv::Error) -> Self {
        ProphetError::ParseError(err.to_string())
    }
}

impl From<toml::de::Error> for ProphetError {
    fn from(err: toml::de::Error) -> Self {
        ProphetError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProphetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ProphetError::ApiError("test error".to_string());
        assert_eq!(error.to_string(), "API Error: test error");
    }

    #[test]
    fn test_no_input_files_mentions_directory() {
        let error = ProphetError::NoInputFiles(PathBuf::from("src/data"));
        assert_eq!(error.to_string(), "No input files found in src/data");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: ProphetError = io.into();
        assert!(matches!(error, ProphetError::IoError(_)));
    }
}
