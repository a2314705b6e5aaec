//! Gateway environments and their base URLs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Production base URL.
pub const PRODUCTION_BASE_URL: &str = "https://paymentservices.payfort.com/";

/// Sandbox base URL.
pub const SANDBOX_BASE_URL: &str = "https://sbpaymentservices.payfort.com/";

/// Path of the server-to-server payment API, relative to a base URL.
pub const PAYMENT_API_PATH: &str = "FortAPI/paymentApi";

/// Path of the hosted payment page, relative to a base URL.
pub const PAYMENT_PAGE_PATH: &str = "FortAPI/paymentPage";

/// Target gateway environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Live payments.
    Production,
    /// Test payments.
    Sandbox,
}

impl Environment {
    /// Configuration name of the environment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Sandbox => "sandbox",
        }
    }

    /// Looks up an environment by its exact lowercase name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "production" => Some(Self::Production),
            "sandbox" => Some(Self::Sandbox),
            _ => None,
        }
    }

    /// Base URL, with a trailing slash.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_BASE_URL,
            Self::Sandbox => SANDBOX_BASE_URL,
        }
    }

    /// Full URL of the payment API.
    #[must_use]
    pub fn payment_api_url(self) -> String {
        format!("{}{PAYMENT_API_PATH}", self.base_url())
    }

    /// Full URL of the hosted payment page.
    #[must_use]
    pub fn payment_page_url(self) -> String {
        format!("{}{PAYMENT_PAGE_PATH}", self.base_url())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::UnknownEnvironment(s.to_owned()))
    }
}

/// Resolves an environment name to its base URL.
///
/// Unknown names, including differently-cased ones, yield `None`.
#[must_use]
pub fn resolve_base_url(name: &str) -> Option<&'static str> {
    Environment::from_name(name).map(Environment::base_url)
}
