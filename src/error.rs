use crate::suma::SumaError;
use crate::vault::VaultError;

/// Any failure of a provisioning run.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// Bad or missing command-line input, detected before any network call.
    #[error("{0}")]
    Validation(String),

    #[error("error, '{key}' not defined at {path}. Check value in vault.")]
    MissingSecret { path: String, key: String },

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Suma(#[from] SumaError),
}

impl ProvisionError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ProvisionError::Validation(msg.into())
    }
}
