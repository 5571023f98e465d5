use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("No package found for: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unable to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to retrieve packages with pip ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Invalid package list: {0}")]
    InvalidOutput(#[from] serde_json::Error),
}
