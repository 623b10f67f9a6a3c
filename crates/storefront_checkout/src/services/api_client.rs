//! HTTP seam to the marketplace backend.
//!
//! The core flows only ever see the [`BackendClient`] trait; the reqwest
//! implementation below adds the auth header, parses JSON and normalizes
//! errors. Tests provide their own implementation instead of a live server.

use async_trait::async_trait;
use error_stack::{report, ResultExt};
use masking::{PeekInterface, Secret};
use serde::{de::DeserializeOwned, Serialize};
use storefront_api_models::{
    downloads::{DownloadGrant, DownloadRequest, FeedbackRequest},
    purchases::{DirectPaymentResponse, PaymentPreference, PurchaseStatusResponse, StatusQuery},
};
use url::Url;

use crate::{
    configs::Settings,
    connectors::mercadopago::{
        transformers::{MercadopagoDirectPaymentRequest, MercadopagoPreferenceRequest},
        Mercadopago,
    },
    errors::{CheckoutError, CustomResult},
};

/// Typed interface over the backend REST endpoints the checkout consumes.
/// All operations are request/response; none of them mutate client state.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Backend origin, used to resolve relative download URLs.
    fn base_url(&self) -> &Url;

    /// `POST /api/apps/{id}/purchase`
    async fn create_preference(
        &self,
        app_id: &str,
        request: &MercadopagoPreferenceRequest,
    ) -> CustomResult<PaymentPreference, CheckoutError>;

    /// `POST /api/apps/{id}/payment/direct`
    async fn create_direct_payment(
        &self,
        app_id: &str,
        request: &MercadopagoDirectPaymentRequest,
    ) -> CustomResult<DirectPaymentResponse, CheckoutError>;

    /// `GET /api/apps/{id}/purchase/status`
    async fn purchase_status(
        &self,
        app_id: &str,
        query: &StatusQuery,
    ) -> CustomResult<PurchaseStatusResponse, CheckoutError>;

    /// `POST /api/apps/{id}/download`
    async fn register_download(
        &self,
        app_id: &str,
        request: &DownloadRequest,
    ) -> CustomResult<DownloadGrant, CheckoutError>;

    /// `POST /api/apps/{id}/feedback`
    async fn submit_feedback(
        &self,
        app_id: &str,
        request: &FeedbackRequest,
    ) -> CustomResult<(), CheckoutError>;
}

/// Production client backed by `reqwest`.
pub struct HttpBackendClient {
    http: reqwest::Client,
    base_url: Url,
    api_token: Option<Secret<String>>,
    debug: bool,
}

impl HttpBackendClient {
    pub fn new(settings: &Settings) -> CustomResult<Self, CheckoutError> {
        let base_url = Url::parse(&settings.backend.base_url)
            .change_context(CheckoutError::ConfigurationError)
            .attach_printable("backend.base_url is not a valid URL")?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(
                settings.backend.request_timeout_secs,
            ))
            .build()
            .change_context(CheckoutError::ConfigurationError)?;
        Ok(Self {
            http,
            base_url,
            api_token: settings.backend.api_token.clone(),
            debug: settings.debug,
        })
    }

    fn endpoint(&self, path: &str) -> CustomResult<Url, CheckoutError> {
        self.base_url
            .join(path)
            .change_context(CheckoutError::UnexpectedResponse)
            .attach_printable_lazy(|| format!("malformed endpoint path: {path}"))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => builder.bearer_auth(token.peek()),
            None => builder,
        }
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: reqwest::RequestBuilder,
    ) -> CustomResult<T, CheckoutError> {
        if self.debug {
            tracing::debug!(path, "dispatching backend request");
        }
        let response = self
            .authorize(builder)
            .send()
            .await
            .change_context(CheckoutError::TransientNetworkError)?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .change_context(CheckoutError::TransientNetworkError)?;
        if !status.is_success() {
            return Err(report!(Mercadopago::build_error_response(
                status.as_u16(),
                &body
            )));
        }
        serde_json::from_slice(&body)
            .change_context(CheckoutError::UnexpectedResponse)
            .attach_printable_lazy(|| format!("undecodable backend response from {path}"))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> CustomResult<T, CheckoutError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        self.dispatch(path, self.http.post(url).json(body)).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> CustomResult<T, CheckoutError> {
        let url = self.endpoint(path)?;
        self.dispatch(path, self.http.get(url).query(query)).await
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn create_preference(
        &self,
        app_id: &str,
        request: &MercadopagoPreferenceRequest,
    ) -> CustomResult<PaymentPreference, CheckoutError> {
        self.post_json(&format!("/api/apps/{app_id}/purchase"), request)
            .await
    }

    async fn create_direct_payment(
        &self,
        app_id: &str,
        request: &MercadopagoDirectPaymentRequest,
    ) -> CustomResult<DirectPaymentResponse, CheckoutError> {
        self.post_json(&format!("/api/apps/{app_id}/payment/direct"), request)
            .await
    }

    async fn purchase_status(
        &self,
        app_id: &str,
        query: &StatusQuery,
    ) -> CustomResult<PurchaseStatusResponse, CheckoutError> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(preference_id) = query.preference_id.as_deref() {
            params.push(("preference_id", preference_id));
        }
        if let Some(payment_id) = query.payment_id.as_deref() {
            params.push(("payment_id", payment_id));
        }
        if let Some(status) = query.status.as_deref() {
            params.push(("status", status));
        }
        self.get_json(&format!("/api/apps/{app_id}/purchase/status"), &params)
            .await
    }

    async fn register_download(
        &self,
        app_id: &str,
        request: &DownloadRequest,
    ) -> CustomResult<DownloadGrant, CheckoutError> {
        self.post_json(&format!("/api/apps/{app_id}/download"), request)
            .await
    }

    async fn submit_feedback(
        &self,
        app_id: &str,
        request: &FeedbackRequest,
    ) -> CustomResult<(), CheckoutError> {
        let url = self.endpoint(&format!("/api/apps/{app_id}/feedback"))?;
        if self.debug {
            tracing::debug!(app_id, "dispatching feedback request");
        }
        let response = self
            .authorize(self.http.post(url).json(request))
            .send()
            .await
            .change_context(CheckoutError::TransientNetworkError)?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .bytes()
                .await
                .change_context(CheckoutError::TransientNetworkError)?;
            return Err(report!(Mercadopago::build_error_response(
                status.as_u16(),
                &body
            )));
        }
        Ok(())
    }
}
