#[derive(Debug, thiserror::Error)]
pub enum ConfigSliceError {
    #[error("module configuration section missing or malformed: {0}")]
    Invalid(#[from] serde_json::Error),
}
