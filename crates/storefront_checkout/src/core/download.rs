//! Download handoff for approved purchases.

use masking::Secret;
use storefront_api_models::downloads::DownloadRequest;
use tracing::instrument;
use url::Url;

use crate::{
    errors::{CheckoutError, CustomResult},
    services::api_client::BackendClient,
};

/// A download grant with its URL resolved to an absolute location.
#[derive(Debug, Clone)]
pub struct ResolvedDownload {
    pub url: Url,
    pub email: Option<String>,
}

/// Resolve a grant URL against the backend origin.
///
/// The backend serves purchased files under its API namespace, but grants
/// historically carry bare `/downloads/` paths; that path is rewritten to
/// `/api/downloads/` before resolution. Absolute URLs pass through untouched.
pub fn resolve_download_url(base: &Url, raw: &str) -> CustomResult<Url, CheckoutError> {
    use error_stack::ResultExt;

    if let Ok(absolute) = Url::parse(raw) {
        return Ok(absolute);
    }
    let rewritten = raw
        .strip_prefix("/downloads/")
        .map(|rest| format!("/api/downloads/{rest}"));
    base.join(rewritten.as_deref().unwrap_or(raw))
        .change_context(CheckoutError::UnexpectedResponse)
        .attach_printable_lazy(|| format!("grant carried an unresolvable URL: {raw}"))
}

/// Resolve (or re-deliver) a download grant.
///
/// Caller precondition: the purchase is approved. The payment id is the
/// stronger proof of purchase and wins over the email when both are known;
/// the email-only path backs the "resend my download link" action. With
/// neither identifier the grant is not resolvable and an explicit not-found
/// error is returned instead of a fabricated URL.
#[instrument(skip_all, fields(app_id))]
pub async fn grant_download(
    client: &dyn BackendClient,
    app_id: &str,
    payment_id: Option<&str>,
    email: Option<&str>,
) -> CustomResult<ResolvedDownload, CheckoutError> {
    let request = match (payment_id, email) {
        (Some(payment_id), _) => DownloadRequest {
            payment_id: Some(payment_id.to_string()),
            email: None,
        },
        (None, Some(email)) => DownloadRequest {
            payment_id: None,
            email: Some(Secret::new(email.to_string())),
        },
        (None, None) => {
            return Err(error_stack::report!(CheckoutError::DownloadNotFound))
        }
    };

    let grant = client.register_download(app_id, &request).await?;
    let url = resolve_download_url(client.base_url(), &grant.download_url)?;
    tracing::info!(%url, "download grant resolved");
    Ok(ResolvedDownload {
        url,
        email: grant.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.example.com").expect("static URL")
    }

    #[test]
    fn bare_downloads_path_is_rewritten_into_the_api_namespace() {
        let url = resolve_download_url(&base(), "/downloads/app_1289.zip").expect("resolvable");
        assert_eq!(url.as_str(), "https://api.example.com/api/downloads/app_1289.zip");
    }

    #[test]
    fn other_relative_paths_resolve_without_rewrite() {
        let url = resolve_download_url(&base(), "/api/downloads/app_1289.zip")
            .expect("resolvable");
        assert_eq!(url.as_str(), "https://api.example.com/api/downloads/app_1289.zip");
    }

    #[test]
    fn absolute_urls_pass_through() {
        let url = resolve_download_url(&base(), "https://cdn.example.net/files/app.zip")
            .expect("resolvable");
        assert_eq!(url.as_str(), "https://cdn.example.net/files/app.zip");
    }
}
