//! Gateway status codes.
//!
//! Every response carries a two-digit `status`. The first two characters of
//! `response_code` repeat it, followed by a three-digit message code.

use std::fmt;

use crate::response::Response;

macro_rules! statuses {
    ($($(#[$meta:meta])* $variant:ident = $code:literal, $description:literal;)+) => {
        /// Two-digit status reported by the gateway.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Status {
            $($(#[$meta])* #[doc = $description] $variant,)+
        }

        impl Status {
            /// All known statuses.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Wire value of the status.
            #[must_use]
            pub const fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Human-readable description.
            #[must_use]
            pub const fn description(self) -> &'static str {
                match self {
                    $(Self::$variant => $description,)+
                }
            }

            /// Looks up a status by its wire value.
            #[must_use]
            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

statuses! {
    InvalidRequest = "00", "Invalid request.";
    OrderStored = "01", "Order stored.";
    AuthorizationSuccess = "02", "Authorization success.";
    AuthorizationFailed = "03", "Authorization failed.";
    CaptureSuccess = "04", "Capture success.";
    CaptureFailed = "05", "Capture failed.";
    RefundSuccess = "06", "Refund success.";
    RefundFailed = "07", "Refund failed.";
    AuthorizationVoidedSuccessfully = "08", "Authorization voided successfully.";
    AuthorizationVoidFailed = "09", "Authorization void failed.";
    Incomplete = "10", "Incomplete.";
    CheckStatusFailed = "11", "Check status failed.";
    CheckStatusSuccess = "12", "Check status success.";
    PurchaseFailure = "13", "Purchase failure.";
    PurchaseSuccess = "14", "Purchase success.";
    UncertainTransaction = "15", "Uncertain transaction.";
    TokenizationFailed = "17", "Tokenization failed.";
    TokenizationSuccess = "18", "Tokenization success.";
    TransactionPending = "19", "Transaction pending.";
    OnHold = "20", "On hold.";
    SdkTokenCreationFailure = "21", "SDK token creation failure.";
    SdkTokenCreationSuccess = "22", "SDK token creation success.";
    FailedToProcessDigitalWalletService = "23", "Failed to process digital wallet service.";
    DigitalWalletOrderProcessedSuccessfully = "24", "Digital wallet order processed successfully.";
    CheckCardBalanceFailed = "27", "Check card balance failed.";
    CheckCardBalanceSuccess = "28", "Check card balance success.";
    RedemptionFailed = "29", "Redemption failed.";
    RedemptionSuccess = "30", "Redemption success.";
    ReverseRedemptionTransactionFailed = "31", "Reverse redemption transaction failed.";
    ReverseRedemptionTransactionSuccess = "32", "Reverse redemption transaction success.";
    TransactionInReview = "40", "Transaction in review.";
    CurrencyConversionSuccess = "42", "Currency conversion success.";
    CurrencyConversionFailed = "43", "Currency conversion failed.";
    ThreeDsSuccess = "44", "3DS success.";
    ThreeDsFailed = "45", "3DS failed.";
    BillCreationSuccess = "46", "Bill creation success.";
    BillCreationFailed = "47", "Bill creation failed.";
    GeneratingInvoicePaymentLinkSuccess = "48", "Generating invoice payment link success.";
    GeneratingInvoicePaymentLinkFailed = "49", "Generating invoice payment link failed.";
    BatchFileUploadSuccessfully = "50", "Batch file upload successfully.";
    UploadBatchFileFailed = "51", "Upload batch file failed.";
    TokenCreatedSuccessfully = "52", "Token created successfully.";
    TokenCreationFailed = "53", "Token creation failed.";
    GetTokensSuccess = "54", "Get tokens success.";
    GetTokensFailed = "55", "Get tokens failed.";
    ReportingRequestSuccess = "56", "Reporting request success.";
    ReportingRequestFailed = "57", "Reporting request failed.";
    TokenUpdatedSuccessfully = "58", "Token updated successfully.";
    TokenUpdatedFailed = "59", "Token update failed.";
    GetInstallmentPlansSuccessfully = "62", "Get installment plans successfully.";
    GetInstallmentPlansFailed = "63", "Get installment plans failed.";
    DeleteTokenSuccess = "66", "Delete token success.";
    GetBatchResultsSuccessfully = "70", "Get batch results successfully.";
    GetBatchResultsFailed = "71", "Get batch results failed.";
    BatchProcessingSuccess = "72", "Batch processing success.";
    BatchProcessingFailed = "73", "Batch processing failed.";
    BankTransferSuccessfully = "74", "Bank transfer successfully.";
    BankTransferFailed = "75", "Bank transfer failed.";
    BatchValidationSuccessfully = "76", "Batch validation successfully.";
    BatchValidationFailed = "77", "Batch validation failed.";
    CreditCardVerifiedSuccessfully = "80", "Credit card verified successfully.";
    FailedToVerifyCreditCard = "81", "Failed to verify credit card.";
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returns `true` if the response's `status` equals `expected`.
///
/// Compares wire values, so a response status of `"14"` matches
/// [`Status::PurchaseSuccess`].
#[must_use]
pub fn is_success(response: &Response, expected: Status) -> bool {
    response.status() == Some(expected.code())
}
