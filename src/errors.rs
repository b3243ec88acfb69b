use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid value: {0}")]
    Parse(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Prompt error: {0}")]
    Prompt(#[from] inquire::InquireError),
    #[error("Export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
    #[error("Aborted by user")]
    Aborted,
}
