use masking::Secret;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::enums::DocumentType;

/// Buyer contact phone.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct PhoneDetails {
    #[serde(alias = "areaCode", skip_serializing_if = "Option::is_none")]
    pub area_code: Option<String>,
    #[schema(value_type = Option<String>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<Secret<String>>,
}

/// Buyer billing address.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct BuyerAddress {
    #[serde(alias = "streetName", skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(alias = "streetNumber", skip_serializing_if = "Option::is_none")]
    pub street_number: Option<String>,
    #[schema(value_type = Option<String>)]
    #[serde(alias = "zipCode", skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<Secret<String>>,
}

/// Buyer details attached to a purchase intent.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct BuyerDetails {
    #[schema(value_type = Option<String>, example = "buyer@example.com")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "docType", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<DocumentType>,
    #[schema(value_type = Option<String>)]
    #[serde(alias = "docNumber", skip_serializing_if = "Option::is_none")]
    pub doc_number: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<BuyerAddress>,
}

/// What the user intends to buy. Immutable once submitted to the provider.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PurchaseIntent {
    /// Identifier of the app being purchased
    #[schema(example = "app_1289")]
    pub app_id: String,
    /// Price in the store currency
    #[schema(minimum = 0.0, example = 199.90)]
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<BuyerDetails>,
}

/// Provider preference created for a redirect / wallet-button checkout.
/// Single use; never mutated after creation.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PaymentPreference {
    #[serde(alias = "preferenceId")]
    pub preference_id: String,
    /// URL the buyer is sent to (or that the wallet widget mounts on)
    #[serde(alias = "initPoint")]
    pub init_point: String,
}

/// Direct (card form) charge request, built from the data the provider's
/// card widget hands back. The token is single use by provider contract and
/// must never be resubmitted automatically.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct DirectPaymentRequest {
    /// One-time card token issued by the provider SDK
    #[schema(value_type = String, example = "tok_9f3a1c")]
    pub token: Secret<String>,
    #[serde(alias = "paymentMethodId")]
    #[schema(example = "visa")]
    pub payment_method_id: String,
    #[serde(alias = "issuerId", skip_serializing_if = "Option::is_none")]
    pub issuer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(alias = "transactionAmount")]
    #[schema(minimum = 0.0, example = 199.90)]
    pub transaction_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<BuyerDetails>,
    #[schema(value_type = Option<Object>)]
    #[serde(alias = "additionalInfo", skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<serde_json::Value>,
}

/// Outcome of a direct charge as relayed by the backend.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct DirectPaymentResponse {
    /// Provider payment id; arrives as a number from some backend versions
    #[serde(default, deserialize_with = "deserialize_id_as_string")]
    pub id: Option<String>,
    /// Raw provider status (`approved`, `in_process`, `rejected`, ...)
    pub status: String,
    #[serde(alias = "statusDetail", skip_serializing_if = "Option::is_none")]
    pub status_detail: Option<String>,
}

/// Identifiers used to look a purchase up on the status endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct StatusQuery {
    #[serde(alias = "preferenceId", skip_serializing_if = "Option::is_none")]
    pub preference_id: Option<String>,
    #[serde(alias = "paymentId", skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    /// Return-URL status hint. Rendering hint only; never trusted as ground
    /// truth without server confirmation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Server-confirmed status of a purchase.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PurchaseStatusResponse {
    pub status: String,
    #[serde(alias = "statusDetail", skip_serializing_if = "Option::is_none")]
    pub status_detail: Option<String>,
    #[serde(
        alias = "paymentId",
        default,
        deserialize_with = "deserialize_id_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_id: Option<String>,
    /// Present when the backend embeds the grant in the status response
    #[serde(alias = "downloadUrl", skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Backend versions disagree on whether payment ids are numbers or strings.
fn deserialize_id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        serde_json::Value::String(id) => Some(id),
        serde_json::Value::Number(id) => Some(id.to_string()),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_accepts_both_casings() {
        let snake: PaymentPreference = serde_json::from_str(
            r#"{"preference_id": "pref_1", "init_point": "https://pay.example.com/p/1"}"#,
        )
        .expect("snake_case body");
        let camel: PaymentPreference = serde_json::from_str(
            r#"{"preferenceId": "pref_1", "initPoint": "https://pay.example.com/p/1"}"#,
        )
        .expect("camelCase body");
        assert_eq!(snake.preference_id, camel.preference_id);
        assert_eq!(snake.init_point, camel.init_point);
    }

    #[test]
    fn numeric_payment_id_normalizes_to_string() {
        let response: DirectPaymentResponse =
            serde_json::from_str(r#"{"id": 123456789, "status": "approved"}"#)
                .expect("numeric id body");
        assert_eq!(response.id.as_deref(), Some("123456789"));
    }

    #[test]
    fn sparse_status_query_omits_unset_fields() {
        let query = StatusQuery {
            preference_id: Some("pref_1".to_string()),
            ..Default::default()
        };
        let body = serde_json::to_value(&query).expect("serializable query");
        assert_eq!(body, serde_json::json!({"preference_id": "pref_1"}));
    }
}
