//! Pre-flight validation. Everything here runs before any network dispatch;
//! a failure means no request left the process.

use error_stack::report;
use masking::PeekInterface;
use storefront_api_models::purchases::{DirectPaymentRequest, PurchaseIntent};

use crate::errors::{CheckoutError, CustomResult};

/// Validate an amount the provider will be asked to charge.
pub fn validate_amount(amount: f64) -> CustomResult<(), CheckoutError> {
    if !amount.is_finite() {
        return Err(report!(CheckoutError::InvalidRequest {
            message: "amount must be a finite number".to_string(),
        }));
    }
    if amount <= 0.0 {
        return Err(report!(CheckoutError::InvalidRequest {
            message: "amount must be greater than zero".to_string(),
        }));
    }
    Ok(())
}

/// Validate a purchase intent before creating a preference.
pub fn validate_purchase_intent(intent: &PurchaseIntent) -> CustomResult<(), CheckoutError> {
    if intent.app_id.trim().is_empty() {
        return Err(report!(CheckoutError::MissingRequiredField {
            field_name: "app_id",
        }));
    }
    validate_amount(intent.amount)
}

/// Validate a direct charge before dispatch. Tokens are single use by
/// provider contract; catching a missing token here avoids burning a
/// submission on a request that cannot succeed.
pub fn validate_direct_payment(request: &DirectPaymentRequest) -> CustomResult<(), CheckoutError> {
    if request.token.peek().trim().is_empty() {
        return Err(report!(CheckoutError::MissingRequiredField {
            field_name: "token",
        }));
    }
    if request.payment_method_id.trim().is_empty() {
        return Err(report!(CheckoutError::MissingRequiredField {
            field_name: "payment_method_id",
        }));
    }
    validate_amount(request.transaction_amount)
}
