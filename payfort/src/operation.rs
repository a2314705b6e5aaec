//! Gateway operations and their command fields.

use std::fmt;

use crate::status::Status;

/// Name of the command field used by maintenance and payment operations.
pub const COMMAND_FIELD: &str = "command";

/// Name of the command field used by status queries.
pub const QUERY_COMMAND_FIELD: &str = "query_command";

/// Name of the command field used by token services.
pub const SERVICE_COMMAND_FIELD: &str = "service_command";

/// Operations exposed by the payment API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Reserve funds without capturing them.
    Authorization,
    /// Authorize and capture in one step.
    Purchase,
    /// Capture a previous authorization.
    Capture,
    /// Release a previous authorization.
    VoidAuthorization,
    /// Refund a captured amount.
    Refund,
    /// Query the state of an order.
    CheckStatus,
    /// Charge a stored token without customer interaction.
    Recurring,
    /// Tokenize a card.
    CreateToken,
    /// Update a stored token.
    UpdateToken,
}

impl Operation {
    /// Field that carries the command for this operation.
    #[must_use]
    pub const fn command_field(self) -> &'static str {
        match self {
            Self::CheckStatus => QUERY_COMMAND_FIELD,
            Self::CreateToken | Self::UpdateToken => SERVICE_COMMAND_FIELD,
            Self::Authorization
            | Self::Purchase
            | Self::Capture
            | Self::VoidAuthorization
            | Self::Refund
            | Self::Recurring => COMMAND_FIELD,
        }
    }

    /// Wire value of the command. Recurring charges are sent as purchases.
    #[must_use]
    pub const fn command(self) -> &'static str {
        match self {
            Self::Authorization => "AUTHORIZATION",
            Self::Purchase | Self::Recurring => "PURCHASE",
            Self::Capture => "CAPTURE",
            Self::VoidAuthorization => "VOID_AUTHORIZATION",
            Self::Refund => "REFUND",
            Self::CheckStatus => "CHECK_STATUS",
            Self::CreateToken => "CREATE_TOKEN",
            Self::UpdateToken => "UPDATE_TOKEN",
        }
    }

    /// Status the gateway reports when this operation succeeds.
    #[must_use]
    pub const fn success_status(self) -> Status {
        match self {
            Self::Authorization => Status::AuthorizationSuccess,
            Self::Purchase | Self::Recurring => Status::PurchaseSuccess,
            Self::Capture => Status::CaptureSuccess,
            Self::VoidAuthorization => Status::AuthorizationVoidedSuccessfully,
            Self::Refund => Status::RefundSuccess,
            Self::CheckStatus => Status::CheckStatusSuccess,
            Self::CreateToken => Status::TokenCreatedSuccessfully,
            Self::UpdateToken => Status::TokenUpdatedSuccessfully,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_fields() {
        assert_eq!(Operation::CheckStatus.command_field(), "query_command");
        assert_eq!(Operation::UpdateToken.command_field(), "service_command");
        assert_eq!(Operation::Refund.command_field(), "command");
    }

    #[test]
    fn test_recurring_succeeds_like_purchase() {
        assert_eq!(Operation::Recurring.command(), "PURCHASE");
        assert_eq!(Operation::Recurring.success_status().code(), "14");
    }
}
