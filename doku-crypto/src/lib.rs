//! # DOKU Crypto
//!
//! Signing helpers shared by the DOKU clients:
//!
//! - `aes` - AES-CBC with a zero IV and PKCS#7 padding
//! - `signature` - base64 AES signature for disbursement request headers
//! - `words` - SHA-1 integrity words for repayment requests and webhooks
//!
//! Both schemes are fixed by the vendor contract and are reproduced exactly.

pub mod aes;
pub mod signature;
pub mod words;

pub use signature::{BASE64_ENGINE, generate_signature};
pub use words::{WordsSigner, verify_words};
