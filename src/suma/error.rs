#[derive(Debug, thiserror::Error)]
pub enum SumaError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{hostname} ({ip}) does not belong to the permitted network {network}/24")]
    PermissionDenied {
        hostname: String,
        ip: String,
        network: String,
    },

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Login failed: {0}")]
    Login(String),

    #[error("{0} already exists in SUSE Manager")]
    AlreadyExists(String),
}

impl SumaError {
    /// Only transport failures of read-only calls may be retried as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SumaError::Transport(_))
    }

    /// The HTTP status carried by a failed mutating call, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SumaError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transport_is_retryable() {
        assert!(SumaError::Transport("connection reset".into()).is_retryable());
        assert!(!SumaError::NotFound("host".into()).is_retryable());
        assert!(!SumaError::HttpStatus {
            status: 503,
            body: String::new()
        }
        .is_retryable());
    }

    #[test]
    fn test_permission_denied_message_is_distinct() {
        let err = SumaError::PermissionDenied {
            hostname: "host.example.com".into(),
            ip: "10.0.0.1".into(),
            network: "192.168.1.0".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("does not belong to the permitted network"));
        assert!(!msg.contains("Not found"));
    }
}
