pub mod transformers;

use crate::errors::CheckoutError;

/// Structured error code the backend relays when its provider access token
/// is not configured.
pub const NO_ACCESS_TOKEN: &str = "NO_ACCESS_TOKEN";
/// Structured error code for a transient failure between backend and provider.
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
/// Provider cause code: the charge amount is incompatible with binary mode
/// and the submission must be retried adjusted.
pub const BINARY_MODE_CAUSE_CODE: &str = "2056";

/// Mercado Pago connector marker. Holds the classification of backend error
/// responses that wrap provider errors.
#[derive(Debug, Clone)]
pub struct Mercadopago;

impl Mercadopago {
    pub fn id() -> &'static str {
        "mercadopago"
    }

    /// Classify a non-2xx backend response into a [`CheckoutError`].
    ///
    /// The backend wraps provider failures into a structured JSON body; the
    /// mapping below turns the known shapes into specific user-facing copy
    /// and surfaces everything else verbatim so support can diagnose it.
    pub fn build_error_response(status_code: u16, body: &[u8]) -> CheckoutError {
        let response: transformers::MercadopagoErrorResponse =
            match serde_json::from_slice(body) {
                Ok(response) => response,
                Err(_) => {
                    // Not the structured shape; surface the raw text rather
                    // than swallowing it.
                    let raw = String::from_utf8_lossy(body).trim().to_string();
                    return if raw.is_empty() {
                        CheckoutError::UnexpectedResponse
                    } else {
                        CheckoutError::ProviderError {
                            status_code,
                            message: raw,
                        }
                    };
                }
            };

        tracing::info!(status_code, connector_response = ?response, "provider error response");

        match status_code {
            503 if response.code.as_deref() == Some(NO_ACCESS_TOKEN) => {
                CheckoutError::ProviderCredentialsMissing
            }
            502 if response.code.as_deref() == Some(NETWORK_ERROR) => {
                CheckoutError::TransientNetworkError
            }
            502 => {
                let surfaced_status = response.mp_status.unwrap_or(status_code);
                CheckoutError::ProviderError {
                    status_code: surfaced_status,
                    message: response
                        .error_reason()
                        .unwrap_or_else(|| "bad gateway".to_string()),
                }
            }
            400 if response.has_cause_code(BINARY_MODE_CAUSE_CODE) => {
                CheckoutError::BinaryModeRetry
            }
            400 => match response.error_reason() {
                Some(message) => CheckoutError::ProviderError {
                    status_code,
                    message,
                },
                None => CheckoutError::IncompleteCardData,
            },
            _ => match response.error_reason() {
                Some(message) => CheckoutError::ProviderError {
                    status_code,
                    message,
                },
                None => CheckoutError::UnexpectedResponse,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_map_to_specific_copy() {
        let body = br#"{"code": "NO_ACCESS_TOKEN", "message": "access token not set"}"#;
        assert_eq!(
            Mercadopago::build_error_response(503, body),
            CheckoutError::ProviderCredentialsMissing
        );
    }

    #[test]
    fn transient_network_error_is_retryable() {
        let body = br#"{"code": "NETWORK_ERROR"}"#;
        let error = Mercadopago::build_error_response(502, body);
        assert_eq!(error, CheckoutError::TransientNetworkError);
        assert!(error.is_retryable());
    }

    #[test]
    fn upstream_status_is_surfaced_verbatim() {
        let body = br#"{"mp_status": 403, "message": "collector unauthorized"}"#;
        assert_eq!(
            Mercadopago::build_error_response(502, body),
            CheckoutError::ProviderError {
                status_code: 403,
                message: "collector unauthorized".to_string(),
            }
        );
    }

    #[test]
    fn binary_mode_cause_triggers_retry() {
        let body = br#"{"message": "invalid parameters", "cause": [{"code": 2056, "description": "amount not allowed in binary mode"}]}"#;
        assert_eq!(
            Mercadopago::build_error_response(400, body),
            CheckoutError::BinaryModeRetry
        );
    }

    #[test]
    fn bare_bad_request_falls_back_to_incomplete_card_data() {
        assert_eq!(
            Mercadopago::build_error_response(400, br#"{}"#),
            CheckoutError::IncompleteCardData
        );
    }

    #[test]
    fn unknown_errors_keep_the_raw_message() {
        let error = Mercadopago::build_error_response(500, b"upstream exploded");
        assert_eq!(
            error,
            CheckoutError::ProviderError {
                status_code: 500,
                message: "upstream exploded".to_string(),
            }
        );
    }
}
