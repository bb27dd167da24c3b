#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP status {0}: {1}")]
    HttpStatus(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("No secret found at path: {0}")]
    SecretNotFound(String),

    #[error("Missing field '{0}' in Vault response")]
    MissingField(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
