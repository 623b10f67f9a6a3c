//! Payment initiation: preference creation for redirect/wallet checkouts
//! and direct charges for the embedded card form.
//!
//! Validation happens before any network call; a rejected payload never
//! leaves the process. Neither operation mutates local state: callers apply
//! the provider's answer themselves (see [`super::session`]).

use storefront_api_models::purchases::{
    DirectPaymentRequest, DirectPaymentResponse, PaymentPreference, PurchaseIntent,
};
use tracing::instrument;

use crate::{
    connectors::mercadopago::transformers::{
        MercadopagoDirectPaymentRequest, MercadopagoPreferenceRequest,
    },
    core::validator,
    errors::{CheckoutError, CustomResult},
    services::api_client::BackendClient,
};

/// Create a provider preference for a purchase intent.
#[instrument(skip_all, fields(app_id = %intent.app_id))]
pub async fn create_preference(
    client: &dyn BackendClient,
    intent: &PurchaseIntent,
) -> CustomResult<PaymentPreference, CheckoutError> {
    validator::validate_purchase_intent(intent)?;
    let request = MercadopagoPreferenceRequest::try_from(intent)?;
    let preference = client.create_preference(&intent.app_id, &request).await?;
    tracing::info!(preference_id = %preference.preference_id, "payment preference created");
    Ok(preference)
}

/// Submit a direct (card form) charge.
///
/// The token inside `request` is single use; on failure the caller must
/// obtain a fresh token from the SDK widget before trying again. No retry
/// happens here.
#[instrument(skip_all, fields(app_id))]
pub async fn create_direct_charge(
    client: &dyn BackendClient,
    app_id: &str,
    request: &DirectPaymentRequest,
) -> CustomResult<DirectPaymentResponse, CheckoutError> {
    validator::validate_direct_payment(request)?;
    let payload = MercadopagoDirectPaymentRequest::try_from(request)?;
    let response = client.create_direct_payment(app_id, &payload).await?;
    tracing::info!(
        payment_id = response.id.as_deref().unwrap_or("<none>"),
        status = %response.status,
        "direct charge answered"
    );
    Ok(response)
}
