use thiserror::Error;

/// Failures surfaced by the ingestion pipeline and the analysis client.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Unsupported file format '{extension}' for '{file_name}' (expected .csv or .json)")]
    UnsupportedFormat {
        file_name: String,
        extension: String,
    },

    #[error("Failed to parse '{file_name}': {reason}")]
    Parse { file_name: String, reason: String },

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Malformed response from analysis service: {0}")]
    MalformedResponse(String),

    #[error("Analysis service is not configured (set GEMINI_API_KEY or pass --api-key)")]
    NotConfigured,
}

impl DataError {
    pub(crate) fn parse(file_name: &str, reason: impl Into<String>) -> Self {
        DataError::Parse {
            file_name: file_name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        DataError::ExternalService(err.without_url().to_string())
    }
}

pub type DataResult<T> = std::result::Result<T, DataError>;
