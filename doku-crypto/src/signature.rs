//! Disbursement request signature.

use base64::Engine;

use doku_types::SigningError;

use crate::aes;

/// Standard (padded) base64 alphabet used for signatures.
pub const BASE64_ENGINE: base64::engine::GeneralPurpose =
    base64::engine::general_purpose::STANDARD;

/// Computes the `signature` header: `base64(AES-CBC(encKey, agentKey + requestId))`.
pub fn generate_signature(
    agent_key: &str,
    request_id: &str,
    enc_key: &str,
) -> Result<String, SigningError> {
    let plaintext = format!("{}{}", agent_key, request_id);
    let ciphertext = aes::encrypt(plaintext.as_bytes(), enc_key.as_bytes())?;
    Ok(BASE64_ENGINE.encode(ciphertext))
}

/// Recovers `agentKey + requestId` from a signature.
pub fn open_signature(signature: &str, enc_key: &str) -> Result<String, SigningError> {
    let ciphertext = BASE64_ENGINE
        .decode(signature)
        .map_err(|_| SigningError::InvalidCiphertext)?;
    let plaintext = aes::decrypt(&ciphertext, enc_key.as_bytes())?;
    String::from_utf8(plaintext).map_err(|_| SigningError::InvalidCiphertext)
}
