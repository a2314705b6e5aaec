//! Enumerated request options.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payment method selected for a purchase or authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentOption {
    /// Mastercard.
    Mastercard,
    /// Visa.
    Visa,
    /// American Express.
    Amex,
    /// SADAD (purchase only).
    Sadad,
    /// NAPS (purchase only).
    Naps,
    /// KNET (purchase only).
    Knet,
    /// OmanNet (purchase, e-commerce ECI only).
    Omannet,
    /// BENEFIT (purchase, e-commerce ECI only).
    Benefit,
    /// mada (purchase, e-commerce ECI only).
    Mada,
    /// Meeza (purchase, e-commerce ECI only).
    Meeza,
    /// Tabby.
    Tabby,
}

impl PaymentOption {
    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mastercard => "MASTERCARD",
            Self::Visa => "VISA",
            Self::Amex => "AMEX",
            Self::Sadad => "SADAD",
            Self::Naps => "NAPS",
            Self::Knet => "KNET",
            Self::Omannet => "OMANNET",
            Self::Benefit => "BENEFIT",
            Self::Mada => "MADA",
            Self::Meeza => "MEEZA",
            Self::Tabby => "TABBY",
        }
    }
}

/// Recurring agreement mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecurringMode {
    /// No fixed schedule.
    Unscheduled,
    /// Variable amount.
    Variable,
    /// Fixed amount.
    Fixed,
}

impl RecurringMode {
    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unscheduled => "UNSCHEDULED",
            Self::Variable => "VARIABLE",
            Self::Fixed => "FIXED",
        }
    }
}

/// Electronic commerce indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Eci {
    /// Customer-present online payment.
    Ecommerce,
    /// Merchant-initiated charge on a stored token.
    Recurring,
    /// Mail or telephone order.
    Moto,
}

impl Eci {
    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ecommerce => "ECOMMERCE",
            Self::Recurring => "RECURRING",
            Self::Moto => "MOTO",
        }
    }
}

macro_rules! impl_into_value {
    ($($ty:ty),+) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Self::String(value.as_str().to_owned())
            }
        })+
    };
}

impl_into_value!(PaymentOption, RecurringMode, Eci);

/// Renders a flag the way the gateway expects it (`YES` / `NO`).
#[must_use]
pub const fn yes_no(flag: bool) -> &'static str {
    if flag { "YES" } else { "NO" }
}
