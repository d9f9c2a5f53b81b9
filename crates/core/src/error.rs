#[derive(Debug, thiserror::Error)]
pub enum DxError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unsupported color '{0}'")]
    InvalidColor(String),
    #[error("invalid description: {0}")]
    Description(#[from] dx_types::DescriptionError),
    #[error("failed to read file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to deserialize JSON: {0}")]
    Deserialization(serde_json::Error),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
}

pub type DxResult<T> = std::result::Result<T, DxError>;
