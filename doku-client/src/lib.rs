//! # DOKU Client SDK
//!
//! Typed async clients for the two DOKU API families:
//!
//! - [`DisbursementClient`] - KirimDoku cash-in (ping, inquiry, remit),
//!   JSON bodies signed with AES credential headers. The header names must
//!   keep their case, so these calls use [`ExactCaseTransport`] rather than
//!   reqwest.
//! - [`RepaymentClient`] - payment code webhooks (inquiry, notify) verified
//!   with SHA-1 WORDS, plus the outbound XML status check.
//!
//! Clients hold only immutable credentials and transport settings, so one
//! instance can be cloned and shared across tasks.

mod config;
mod disbursement;
mod repayment;
mod transport;

pub use config::ClientConfig;
pub use disbursement::{
    AGENT_KEY_HEADER, DisbursementClient, REQUEST_ID_HEADER, SIGNATURE_HEADER,
};
pub use repayment::RepaymentClient;
pub use transport::{ExactCaseTransport, RawResponse, TransportError};

use doku_types::{ConfigError, SigningError, WebhookError};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure of the exact-case transport used by disbursement calls.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-200 response; `message` is the vendor's own error text.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// HTTP 200 carrying a non-success `RESPONSECODE`.
    #[error("{message}")]
    Vendor { code: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("XML encoding error: {0}")]
    XmlEncode(#[from] quick_xml::SeError),

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Vendor-supplied failure message, when the failure came from DOKU.
    pub fn vendor_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } | ClientError::Vendor { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }
}
