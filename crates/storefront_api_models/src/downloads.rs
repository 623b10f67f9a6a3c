use masking::Secret;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lookup body for the download endpoint. At least one of `payment_id` or
/// `email` is expected; `payment_id` is the stronger proof of purchase and
/// wins when both are present.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct DownloadRequest {
    #[serde(alias = "paymentId", skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[schema(value_type = Option<String>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Secret<String>>,
}

impl DownloadRequest {
    pub fn is_empty(&self) -> bool {
        self.payment_id.is_none() && self.email.is_none()
    }
}

/// A resolved download grant. Only ever produced for approved purchases.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct DownloadGrant {
    /// May be relative (server-local path) or absolute; the consumer
    /// resolves relative paths against the backend origin
    #[serde(alias = "downloadUrl")]
    pub download_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Post-purchase rating.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct FeedbackRequest {
    /// 1 to 5 stars
    #[schema(minimum = 1, maximum = 5, example = 5)]
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
