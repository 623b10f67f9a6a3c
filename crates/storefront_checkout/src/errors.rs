//! Error taxonomy for the checkout flows.
//!
//! Four families, mirrored in the variants below: pre-flight validation
//! (no network call happened), transient network failures (retryable),
//! provider-structured errors (mapped to user-facing copy), and unknown
//! errors (surfaced with the raw message for support diagnosis). None of
//! them are fatal; every failure leaves the caller in a recoverable state.

/// Shorthand for an `error-stack` result, as used throughout the crate.
pub type CustomResult<T, E> = error_stack::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    /// Pre-flight validation failed; no request was dispatched
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// A required field was absent before dispatch
    #[error("missing required field: {field_name}")]
    MissingRequiredField { field_name: &'static str },

    /// Backend reported the provider access token is not configured
    #[error("payment provider credentials are missing")]
    ProviderCredentialsMissing,

    /// Transient failure between backend and provider; safe to retry
    #[error("transient network failure, retry")]
    TransientNetworkError,

    /// Provider rejected the request; surfaced verbatim with its status code
    #[error("payment provider error ({status_code}): {message}")]
    ProviderError { status_code: u16, message: String },

    /// Provider cause code 2056: the charge must be retried with the
    /// binary-mode flag adjusted
    #[error("binary-mode adjustment needed, retry")]
    BinaryModeRetry,

    /// Card data was incomplete or malformed and no friendlier mapping exists
    #[error("incomplete card data")]
    IncompleteCardData,

    /// Neither payment id nor email resolved a download grant
    #[error("download not found")]
    DownloadNotFound,

    /// The provider SDK did not become ready within the bounded wait
    #[error("payment SDK unavailable")]
    SdkUnavailable,

    /// A submission for this purchase intent is already in flight
    #[error("a payment submission is already in flight")]
    SubmissionInFlight,

    /// A new submission was attempted after the purchase reached a terminal
    /// state; retrying takes a fresh session
    #[error("purchase already decided")]
    PurchaseAlreadyDecided,

    /// Download handoff requested while the purchase is not approved
    #[error("purchase is not approved")]
    PurchaseNotApproved,

    /// The session was closed before the async result arrived
    #[error("checkout session closed")]
    SessionClosed,

    /// The backend answered with a body the models cannot make sense of
    #[error("unexpected response from backend")]
    UnexpectedResponse,

    /// Settings could not be loaded
    #[error("configuration error")]
    ConfigurationError,
}

impl CheckoutError {
    /// Whether showing a retry affordance to the user makes sense.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TransientNetworkError | Self::BinaryModeRetry | Self::SdkUnavailable
        )
    }

    /// Whether the failure happened before any network dispatch.
    pub fn is_pre_flight(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. }
                | Self::MissingRequiredField { .. }
                | Self::SubmissionInFlight
                | Self::PurchaseAlreadyDecided
                | Self::PurchaseNotApproved
        )
    }
}
