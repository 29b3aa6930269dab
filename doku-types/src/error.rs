//! Error types for the DOKU SDK.

/// Failures while producing or checking an AES request signature.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("Invalid AES key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),

    #[error("plain content empty")]
    EmptyPlaintext,

    #[error("Invalid ciphertext: length or padding is wrong")]
    InvalidCiphertext,
}

/// Local validation failures for inbound repayment webhooks.
///
/// Every variant means the request must not be trusted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
    #[error("Malformed form body: {0}")]
    Malformed(String),

    #[error("no {0}")]
    MissingField(&'static str),

    #[error("invalid request")]
    InvalidWords,
}

/// Configuration errors (environment variables, presets).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown environment: {0} (expected production or staging)")]
    UnknownEnvironment(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Failure reported by a [`crate::RepaymentHandler`] implementation.
#[derive(Debug, thiserror::Error)]
#[error("Handler error: {0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        assert_eq!(
            WebhookError::MissingField("RESULTMSG").to_string(),
            "no RESULTMSG"
        );
    }

    #[test]
    fn test_invalid_words_message() {
        assert_eq!(WebhookError::InvalidWords.to_string(), "invalid request");
    }
}
