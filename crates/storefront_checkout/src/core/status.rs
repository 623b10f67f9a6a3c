//! Payment status resolution.
//!
//! The return-URL `status` query parameter is attacker-controlled (anyone
//! can craft the URL), so it is only ever used to pick the interim screen.
//! The canonical state always comes from a server-side lookup by preference
//! or payment id.

use storefront_api_models::{enums::PurchaseStatus, purchases::StatusQuery};
use tracing::instrument;

use crate::{
    connectors::mercadopago::transformers::map_payment_status,
    errors::{CheckoutError, CustomResult},
    services::api_client::BackendClient,
};

/// Identifiers available when a buyer lands back on the order page.
#[derive(Debug, Clone, Default)]
pub struct StatusLookup {
    pub preference_id: Option<String>,
    pub payment_id: Option<String>,
    /// Unverified return-URL hint
    pub status_hint: Option<String>,
}

/// Server-confirmed resolution of a purchase.
#[derive(Debug, Clone)]
pub struct ResolvedStatus {
    pub status: PurchaseStatus,
    pub status_detail: Option<String>,
    pub payment_id: Option<String>,
    /// Only populated when the confirmed status is `Approved`
    pub download_url: Option<String>,
    pub email: Option<String>,
}

/// Which screen to render while the server lookup is in flight.
///
/// Non-terminal hints (`pending`, `in_process`) are safe to show as-is;
/// a terminal hint is never trusted before confirmation and renders the
/// validating screen instead.
pub fn interim_render_status(status_hint: Option<&str>) -> PurchaseStatus {
    match status_hint.map(map_payment_status) {
        Some(status) if !status.is_terminal() => status,
        _ => PurchaseStatus::Validating,
    }
}

/// Resolve the canonical purchase state. Read-only and idempotent: calling
/// it twice with the same identifiers performs the same lookup and creates
/// no side effects.
#[instrument(skip_all, fields(app_id))]
pub async fn resolve_status(
    client: &dyn BackendClient,
    app_id: &str,
    lookup: &StatusLookup,
) -> CustomResult<ResolvedStatus, CheckoutError> {
    if lookup.preference_id.is_none() && lookup.payment_id.is_none() {
        return Err(error_stack::report!(CheckoutError::MissingRequiredField {
            field_name: "preference_id or payment_id",
        }));
    }

    let query = StatusQuery {
        preference_id: lookup.preference_id.clone(),
        payment_id: lookup.payment_id.clone(),
        status: lookup.status_hint.clone(),
    };

    match client.purchase_status(app_id, &query).await {
        Ok(response) => {
            let status = map_payment_status(&response.status);
            // Invariant: no download URL escapes unless the server confirmed
            // the purchase as approved.
            let download_url = if status == PurchaseStatus::Approved {
                response.download_url
            } else {
                None
            };
            Ok(ResolvedStatus {
                status,
                status_detail: response.status_detail,
                payment_id: response.payment_id,
                download_url,
                email: response.email,
            })
        }
        Err(error) => {
            // Lookup failures resolve to the error state instead of crashing
            // the view; the buyer can retry from there.
            tracing::error!(?error, "purchase status lookup failed");
            Ok(ResolvedStatus {
                status: PurchaseStatus::Error,
                status_detail: None,
                payment_id: lookup.payment_id.clone(),
                download_url: None,
                email: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_hints_render_as_validating() {
        assert_eq!(
            interim_render_status(Some("approved")),
            PurchaseStatus::Validating
        );
        assert_eq!(
            interim_render_status(Some("rejected")),
            PurchaseStatus::Validating
        );
        assert_eq!(interim_render_status(None), PurchaseStatus::Validating);
        assert_eq!(
            interim_render_status(Some("not_a_status")),
            PurchaseStatus::Validating
        );
    }

    #[test]
    fn waiting_hints_render_as_themselves() {
        assert_eq!(
            interim_render_status(Some("pending")),
            PurchaseStatus::Pending
        );
        assert_eq!(
            interim_render_status(Some("in_process")),
            PurchaseStatus::InProcess
        );
    }
}
