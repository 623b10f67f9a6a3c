use masking::Secret;
use serde::{Deserialize, Deserializer, Serialize};
use storefront_api_models::{
    enums::PurchaseStatus,
    purchases::{BuyerDetails, DirectPaymentRequest, PurchaseIntent},
};

use crate::errors::CheckoutError;

/// Provider-side payment status vocabulary.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, strum::EnumString, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MercadopagoPaymentStatus {
    Approved,
    Authorized,
    Pending,
    InProcess,
    InMediation,
    Rejected,
    Cancelled,
    Refunded,
    ChargedBack,
}

impl From<MercadopagoPaymentStatus> for PurchaseStatus {
    fn from(status: MercadopagoPaymentStatus) -> Self {
        match status {
            MercadopagoPaymentStatus::Approved => Self::Approved,
            MercadopagoPaymentStatus::Pending => Self::Pending,
            MercadopagoPaymentStatus::Authorized
            | MercadopagoPaymentStatus::InProcess
            | MercadopagoPaymentStatus::InMediation => Self::InProcess,
            MercadopagoPaymentStatus::Rejected => Self::Rejected,
            MercadopagoPaymentStatus::Cancelled
            | MercadopagoPaymentStatus::Refunded
            | MercadopagoPaymentStatus::ChargedBack => Self::Cancelled,
        }
    }
}

/// Parse a raw provider status string into the canonical purchase status.
/// Unknown vocabulary maps to [`PurchaseStatus::Error`], never to a panic.
pub fn map_payment_status(raw: &str) -> PurchaseStatus {
    raw.parse::<MercadopagoPaymentStatus>()
        .map(PurchaseStatus::from)
        .unwrap_or(PurchaseStatus::Error)
}

/// Identification block inside a payer.
#[derive(Debug, Clone, Serialize)]
pub struct MercadopagoIdentification {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub number: Secret<String>,
}

/// Payer details in the provider's shape. Only built when the buyer supplied
/// at least one field; an empty `payer` object trips provider-side
/// validation, so it is omitted entirely instead.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MercadopagoPayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification: Option<MercadopagoIdentification>,
}

impl MercadopagoPayer {
    fn is_empty(&self) -> bool {
        self.email.is_none() && self.first_name.is_none() && self.identification.is_none()
    }
}

impl From<&BuyerDetails> for MercadopagoPayer {
    fn from(buyer: &BuyerDetails) -> Self {
        let identification = match (buyer.doc_type, buyer.doc_number.clone()) {
            (Some(doc_type), Some(number)) => Some(MercadopagoIdentification {
                doc_type: doc_type.to_string(),
                number,
            }),
            _ => None,
        };
        Self {
            email: buyer.email.clone(),
            first_name: buyer.name.clone(),
            identification,
        }
    }
}

fn payer_from_buyer(buyer: Option<&BuyerDetails>) -> Option<MercadopagoPayer> {
    buyer
        .map(MercadopagoPayer::from)
        .filter(|payer| !payer.is_empty())
}

/// Sparse preference-creation body. Every field is optional; unset fields
/// are left out of the wire payload.
#[derive(Debug, Clone, Serialize)]
pub struct MercadopagoPreferenceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<MercadopagoPayer>,
}

impl TryFrom<&PurchaseIntent> for MercadopagoPreferenceRequest {
    type Error = error_stack::Report<CheckoutError>;

    fn try_from(intent: &PurchaseIntent) -> Result<Self, Self::Error> {
        if !intent.amount.is_finite() || intent.amount <= 0.0 {
            return Err(error_stack::report!(CheckoutError::InvalidRequest {
                message: "amount must be a finite number greater than zero".to_string(),
            }));
        }
        Ok(Self {
            description: intent.description.clone(),
            quantity: intent.quantity,
            unit_price: Some(intent.amount),
            payer: payer_from_buyer(intent.buyer.as_ref()),
        })
    }
}

/// Direct-charge body in the provider's shape.
#[derive(Debug, Clone, Serialize)]
pub struct MercadopagoDirectPaymentRequest {
    pub token: Secret<String>,
    pub payment_method_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    pub transaction_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<MercadopagoPayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<serde_json::Value>,
}

impl TryFrom<&DirectPaymentRequest> for MercadopagoDirectPaymentRequest {
    type Error = error_stack::Report<CheckoutError>;

    fn try_from(request: &DirectPaymentRequest) -> Result<Self, Self::Error> {
        use masking::PeekInterface;

        if request.token.peek().is_empty() {
            return Err(error_stack::report!(CheckoutError::MissingRequiredField {
                field_name: "token",
            }));
        }
        if request.payment_method_id.is_empty() {
            return Err(error_stack::report!(CheckoutError::MissingRequiredField {
                field_name: "payment_method_id",
            }));
        }
        if !request.transaction_amount.is_finite() || request.transaction_amount <= 0.0 {
            return Err(error_stack::report!(CheckoutError::InvalidRequest {
                message: "transaction_amount must be a finite number greater than zero"
                    .to_string(),
            }));
        }
        Ok(Self {
            token: request.token.clone(),
            payment_method_id: request.payment_method_id.clone(),
            issuer_id: request.issuer_id.clone(),
            installments: request.installments,
            transaction_amount: request.transaction_amount,
            payer: payer_from_buyer(request.payer.as_ref()),
            additional_info: request.additional_info.clone(),
        })
    }
}

/// Structured error body the backend relays for provider failures.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MercadopagoErrorResponse {
    /// Machine code, e.g. `NO_ACCESS_TOKEN` or `NETWORK_ERROR`
    #[serde(alias = "error")]
    pub code: Option<String>,
    pub message: Option<String>,
    /// Upstream provider HTTP status when the backend acted as a relay
    pub mp_status: Option<u16>,
    pub cause: Option<Vec<MercadopagoErrorCause>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MercadopagoErrorCause {
    /// Arrives as a number or a string depending on the provider endpoint
    #[serde(default, deserialize_with = "deserialize_cause_code")]
    pub code: Option<String>,
    pub description: Option<String>,
}

fn deserialize_cause_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        serde_json::Value::String(code) => Some(code),
        serde_json::Value::Number(code) => Some(code.to_string()),
        _ => None,
    }))
}

impl MercadopagoErrorResponse {
    pub fn has_cause_code(&self, code: &str) -> bool {
        self.cause
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|cause| cause.code.as_deref() == Some(code))
    }

    /// Human-readable reason: the message plus any cause descriptions.
    pub fn error_reason(&self) -> Option<String> {
        let details = self.cause.as_deref().map(|causes| {
            causes
                .iter()
                .filter_map(|cause| cause.description.as_deref())
                .collect::<Vec<_>>()
                .join(", ")
        });
        match (self.message.clone(), details.filter(|d| !d.is_empty())) {
            (Some(message), Some(details)) => Some(format!("{message}: {details}")),
            (Some(message), None) => Some(message),
            (None, Some(details)) => Some(details),
            (None, None) => self.code.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use storefront_api_models::enums::DocumentType;

    use super::*;

    fn intent(amount: f64) -> PurchaseIntent {
        PurchaseIntent {
            app_id: "app_1289".to_string(),
            amount,
            description: Some("Pro license".to_string()),
            quantity: Some(1),
            buyer: None,
        }
    }

    #[test]
    fn provider_statuses_collapse_onto_canonical_states() {
        assert_eq!(map_payment_status("approved"), PurchaseStatus::Approved);
        assert_eq!(map_payment_status("pending"), PurchaseStatus::Pending);
        assert_eq!(map_payment_status("in_process"), PurchaseStatus::InProcess);
        assert_eq!(map_payment_status("in_mediation"), PurchaseStatus::InProcess);
        assert_eq!(map_payment_status("rejected"), PurchaseStatus::Rejected);
        assert_eq!(map_payment_status("charged_back"), PurchaseStatus::Cancelled);
        assert_eq!(map_payment_status("something_new"), PurchaseStatus::Error);
        assert_eq!(map_payment_status(""), PurchaseStatus::Error);
    }

    #[test]
    fn empty_payer_object_is_omitted_from_the_preference() {
        let mut purchase = intent(49.99);
        purchase.buyer = Some(BuyerDetails::default());
        let request =
            MercadopagoPreferenceRequest::try_from(&purchase).expect("valid preference");
        assert!(request.payer.is_none());

        let body = serde_json::to_value(&request).expect("serializable");
        assert!(body.get("payer").is_none());
    }

    #[test]
    fn buyer_with_document_becomes_identification() {
        let mut purchase = intent(49.99);
        purchase.buyer = Some(BuyerDetails {
            email: Some(Secret::new("buyer@example.com".to_string())),
            doc_type: Some(DocumentType::Dni),
            doc_number: Some(Secret::new("30123456".to_string())),
            ..Default::default()
        });
        let request =
            MercadopagoPreferenceRequest::try_from(&purchase).expect("valid preference");
        let payer = request.payer.expect("payer present");
        let identification = payer.identification.expect("identification present");
        assert_eq!(identification.doc_type, "DNI");
    }

    #[test]
    fn non_positive_amount_is_rejected_before_building_the_payload() {
        assert!(MercadopagoPreferenceRequest::try_from(&intent(0.0)).is_err());
        assert!(MercadopagoPreferenceRequest::try_from(&intent(-5.0)).is_err());
        assert!(MercadopagoPreferenceRequest::try_from(&intent(f64::NAN)).is_err());
        assert!(MercadopagoPreferenceRequest::try_from(&intent(f64::INFINITY)).is_err());
    }

    #[test]
    fn direct_charge_requires_token_and_method() {
        let missing_token = DirectPaymentRequest {
            token: Secret::new(String::new()),
            payment_method_id: "visa".to_string(),
            issuer_id: None,
            installments: Some(1),
            transaction_amount: 199.90,
            payer: None,
            additional_info: None,
        };
        assert!(MercadopagoDirectPaymentRequest::try_from(&missing_token).is_err());

        let missing_method = DirectPaymentRequest {
            token: Secret::new("tok_1".to_string()),
            payment_method_id: String::new(),
            ..missing_token.clone()
        };
        assert!(MercadopagoDirectPaymentRequest::try_from(&missing_method).is_err());
    }

    #[test]
    fn cause_codes_match_numbers_and_strings() {
        let response: MercadopagoErrorResponse = serde_json::from_str(
            r#"{"cause": [{"code": 2056, "description": "binary mode"}, {"code": "4020"}]}"#,
        )
        .expect("error body");
        assert!(response.has_cause_code("2056"));
        assert!(response.has_cause_code("4020"));
        assert!(!response.has_cause_code("1000"));
    }

    #[test]
    fn error_reason_joins_message_and_causes() {
        let response: MercadopagoErrorResponse = serde_json::from_str(
            r#"{"message": "invalid parameters", "cause": [{"description": "bad token"}]}"#,
        )
        .expect("error body");
        assert_eq!(
            response.error_reason().as_deref(),
            Some("invalid parameters: bad token")
        );
    }
}
