//! Repayment integrity words.
//!
//! A word is the lowercase hex SHA-1 of a fixed, operation-specific
//! concatenation of fields and the shared key, with no separators.

use std::fmt;

use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

use doku_types::{Credentials, format_amount};

/// Computes and checks WORDS for one merchant.
#[derive(Clone)]
pub struct WordsSigner {
    credentials: Credentials,
}

impl WordsSigner {
    pub fn new(mall_id: impl Into<String>, shared_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(mall_id, shared_key),
        }
    }

    pub fn from_credentials(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn mall_id(&self) -> &str {
        self.credentials.id()
    }

    /// `amount + mallId + sharedKey + transIdMerchant`, amount with two decimals.
    pub fn words(&self, amount: f64, trans_id_merchant: &str) -> String {
        let amount = format_amount(amount);
        sha1_hex(&[
            &amount,
            self.credentials.id(),
            self.credentials.secret(),
            trans_id_merchant,
        ])
    }

    /// `mallId + sharedKey + paymentCode`
    pub fn words_for_inquiry(&self, payment_code: &str) -> String {
        sha1_hex(&[
            self.credentials.id(),
            self.credentials.secret(),
            payment_code,
        ])
    }

    /// `amount + mallId + sharedKey + transIdMerchant + resultMsg + verifyStatus`
    ///
    /// `amount` is hashed exactly as DOKU posted it.
    pub fn words_for_notify(
        &self,
        amount: &str,
        trans_id_merchant: &str,
        result_msg: &str,
        verify_status: &str,
    ) -> String {
        sha1_hex(&[
            amount,
            self.credentials.id(),
            self.credentials.secret(),
            trans_id_merchant,
            result_msg,
            verify_status,
        ])
    }

    /// `mallId + sharedKey + transIdMerchant`
    pub fn words_for_check_status(&self, trans_id_merchant: &str) -> String {
        sha1_hex(&[
            self.credentials.id(),
            self.credentials.secret(),
            trans_id_merchant,
        ])
    }

    pub fn verify_words_generic(&self, amount: f64, trans_id_merchant: &str, words: &str) -> bool {
        verify_words(&self.words(amount, trans_id_merchant), words)
    }

    pub fn verify_check_status(&self, trans_id_merchant: &str, words: &str) -> bool {
        verify_words(&self.words_for_check_status(trans_id_merchant), words)
    }

    pub fn verify_inquiry(&self, payment_code: &str, words: &str) -> bool {
        verify_words(&self.words_for_inquiry(payment_code), words)
    }

    pub fn verify_notify(
        &self,
        amount: &str,
        trans_id_merchant: &str,
        result_msg: &str,
        verify_status: &str,
        words: &str,
    ) -> bool {
        verify_words(
            &self.words_for_notify(amount, trans_id_merchant, result_msg, verify_status),
            words,
        )
    }
}

impl fmt::Debug for WordsSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordsSigner")
            .field("mall_id", &self.credentials.id())
            .finish_non_exhaustive()
    }
}

/// Exact, constant-time comparison of a supplied word against the expected one.
pub fn verify_words(expected: &str, supplied: &str) -> bool {
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}

fn sha1_hex(parts: &[&str]) -> String {
    let mut hasher = Sha1::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}
