//! # DOKU Types
//!
//! Wire types and domain values shared by the DOKU disbursement and
//! repayment SDKs. This crate has no IO dependencies, only data structures,
//! error enums and trait definitions.
//!
//! ## Layout
//!
//! - `domain/` - Credentials, environment presets, amount formatting
//! - `dto/` - Exact wire schemas (disbursement JSON, repayment form/XML)
//! - `error/` - Signing, webhook validation and configuration errors
//! - `ports/` - Traits that webhook consumers implement

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{Credentials, Environment, format_amount};
pub use dto::{disbursement, repayment};
pub use error::{ConfigError, HandlerError, SigningError, WebhookError};
pub use ports::RepaymentHandler;
