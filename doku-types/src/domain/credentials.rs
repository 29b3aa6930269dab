//! Merchant credential pair.

use std::fmt;

/// Merchant identifier plus the shared secret issued by DOKU.
///
/// For the disbursement API the pair is `(agentKey, encKey)`; for the
/// repayment API it is `(MALLID, shared key)`. The secret never appears in
/// `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    id: String,
    secret: String,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
        }
    }

    /// Returns the agent / mall identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the shared secret.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("id", &self.id)
            .field("secret", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_secret() {
        let creds = Credentials::new("M001", "secretkey");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("M001"));
        assert!(!debug.contains("secretkey"));
    }
}
