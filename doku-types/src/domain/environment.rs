//! Production / staging endpoint presets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

const DISBURSEMENT_PRODUCTION_URL: &str = "https://kirimdoku.com/v2/api";
const DISBURSEMENT_STAGING_URL: &str = "https://staging.doku.com/apikirimdoku";
const REPAYMENT_PRODUCTION_URL: &str = "https://pay.doku.com";
const REPAYMENT_STAGING_URL: &str = "https://staging.doku.com";

/// Which DOKU deployment a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Staging,
}

impl Environment {
    /// Maps the `is_production` constructor flag to an environment.
    pub fn from_production_flag(is_production: bool) -> Self {
        if is_production {
            Environment::Production
        } else {
            Environment::Staging
        }
    }

    /// Base URL of the disbursement (KirimDoku) API.
    pub fn disbursement_url(&self) -> &'static str {
        match self {
            Environment::Production => DISBURSEMENT_PRODUCTION_URL,
            Environment::Staging => DISBURSEMENT_STAGING_URL,
        }
    }

    /// Base URL of the repayment (payment code) API.
    pub fn repayment_url(&self) -> &'static str {
        match self {
            Environment::Production => REPAYMENT_PRODUCTION_URL,
            Environment::Staging => REPAYMENT_STAGING_URL,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Staging => write!(f, "staging"),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "staging" | "stage" => Ok(Environment::Staging),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}
