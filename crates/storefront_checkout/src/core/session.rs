//! Checkout session: the purchase state machine plus the guards around it.
//!
//! One session corresponds to one purchase page. The session owns the
//! double-submit guard (no two payment submissions in flight for the same
//! intent), the liveness guard (results arriving after the page is gone are
//! dropped, never applied), and the rule that download handoff is reachable
//! only from the approved state. All status re-checks are explicit calls;
//! nothing here polls.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use masking::PeekInterface;
use storefront_api_models::{
    enums::PurchaseStatus,
    purchases::{DirectPaymentRequest, PaymentPreference, PurchaseIntent},
};
use tracing::instrument;

use crate::{
    connectors::mercadopago::transformers::map_payment_status,
    core::{
        download::{self, ResolvedDownload},
        initiation, rejection,
        status::{self, StatusLookup},
    },
    errors::{CheckoutError, CustomResult},
    services::api_client::BackendClient,
};

#[derive(Debug, Default)]
struct SessionState {
    status: PurchaseStatus,
    status_detail: Option<String>,
    preference_id: Option<String>,
    payment_id: Option<String>,
    grant_email: Option<String>,
    download: Option<ResolvedDownload>,
}

/// A single buyer's checkout, shared across UI event handlers.
pub struct CheckoutSession {
    backend: Arc<dyn BackendClient>,
    intent: PurchaseIntent,
    state: Mutex<SessionState>,
    submission_in_flight: AtomicBool,
    closed: AtomicBool,
}

/// Releases the double-submit guard when the submission path unwinds.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl CheckoutSession {
    /// Session for a fresh purchase page.
    pub fn new(backend: Arc<dyn BackendClient>, intent: PurchaseIntent) -> Self {
        Self {
            backend,
            intent,
            state: Mutex::new(SessionState::default()),
            submission_in_flight: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    /// Session for a buyer returning from the provider redirect. The hint in
    /// `lookup` only picks the interim screen; [`Self::refresh_status`] must
    /// confirm with the backend before anything is trusted.
    pub fn from_return_url(
        backend: Arc<dyn BackendClient>,
        intent: PurchaseIntent,
        lookup: StatusLookup,
    ) -> Self {
        let session = Self::new(backend, intent);
        {
            let mut state = session.state();
            state.status = status::interim_render_status(lookup.status_hint.as_deref());
            state.preference_id = lookup.preference_id;
            state.payment_id = lookup.payment_id;
        }
        session
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_open(&self) -> CustomResult<(), CheckoutError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(error_stack::report!(CheckoutError::SessionClosed));
        }
        Ok(())
    }

    /// A decided purchase accepts no further submissions. Retrying a
    /// rejected charge takes a fresh session, so the confirmed outcome of
    /// the retry is never at odds with a frozen terminal state.
    fn ensure_submittable(&self) -> CustomResult<(), CheckoutError> {
        if self.state().status.is_terminal() {
            return Err(error_stack::report!(CheckoutError::PurchaseAlreadyDecided));
        }
        Ok(())
    }

    fn acquire_submission_guard(&self) -> CustomResult<InFlightGuard<'_>, CheckoutError> {
        self.submission_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| InFlightGuard(&self.submission_in_flight))
            .map_err(|_| error_stack::report!(CheckoutError::SubmissionInFlight))
    }

    fn buyer_email(&self) -> Option<String> {
        self.intent
            .buyer
            .as_ref()
            .and_then(|buyer| buyer.email.as_ref())
            .map(|email| email.peek().clone())
    }

    /// Apply a confirmed status, honoring the state machine. Transitions the
    /// machine does not admit (e.g. out of a terminal state) are ignored.
    fn apply_status(state: &mut SessionState, next: PurchaseStatus) {
        if state.status.can_transition_to(next) {
            state.status = next;
        } else {
            tracing::warn!(
                current = %state.status,
                rejected_transition = %next,
                "ignoring inadmissible status transition"
            );
        }
    }

    // ---- read-side accessors -------------------------------------------

    pub fn app_id(&self) -> &str {
        &self.intent.app_id
    }

    pub fn status(&self) -> PurchaseStatus {
        self.state().status
    }

    pub fn preference_id(&self) -> Option<String> {
        self.state().preference_id.clone()
    }

    pub fn payment_id(&self) -> Option<String> {
        self.state().payment_id.clone()
    }

    /// Display copy for a rejected purchase, from the rejection classifier.
    pub fn rejection_message(&self) -> Option<String> {
        let state = self.state();
        (state.status == PurchaseStatus::Rejected)
            .then(|| rejection::classify(state.status_detail.as_deref().unwrap_or_default()))
    }

    /// The resolved grant, if download handoff already happened.
    pub fn download(&self) -> Option<ResolvedDownload> {
        self.state().download.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submission_in_flight.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Mark the page gone. In-flight results observe this and are dropped
    /// instead of being applied to a view nobody is looking at.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    // ---- flows ----------------------------------------------------------

    /// Create the provider preference for a redirect or wallet checkout.
    #[instrument(skip_all, fields(app_id = %self.intent.app_id))]
    pub async fn start_preference(&self) -> CustomResult<PaymentPreference, CheckoutError> {
        self.ensure_open()?;
        self.ensure_submittable()?;
        let guard = self.acquire_submission_guard()?;
        let result = initiation::create_preference(self.backend.as_ref(), &self.intent).await;
        drop(guard);
        self.ensure_open()?;

        let preference = result?;
        self.state().preference_id = Some(preference.preference_id.clone());
        Ok(preference)
    }

    /// Submit a direct card charge and apply the provider's decision.
    ///
    /// While one submission is awaiting its answer, further calls fail fast
    /// with [`CheckoutError::SubmissionInFlight`]; this is what keeps a
    /// double click from producing a duplicate charge. Once the purchase is
    /// decided the session accepts no further charges
    /// ([`CheckoutError::PurchaseAlreadyDecided`], before any dispatch).
    /// The token is consumed either way and is never resubmitted
    /// automatically.
    #[instrument(skip_all, fields(app_id = %self.intent.app_id))]
    pub async fn submit_direct_charge(
        &self,
        request: DirectPaymentRequest,
    ) -> CustomResult<PurchaseStatus, CheckoutError> {
        self.ensure_open()?;
        self.ensure_submittable()?;
        let guard = self.acquire_submission_guard()?;
        let result =
            initiation::create_direct_charge(self.backend.as_ref(), &self.intent.app_id, &request)
                .await;
        drop(guard);
        self.ensure_open()?;

        let response = result?;
        let next = map_payment_status(&response.status);
        let mut state = self.state();
        state.payment_id = response.id;
        state.status_detail = response.status_detail;
        Self::apply_status(&mut state, next);
        Ok(state.status)
    }

    /// Explicit "refresh status" action for pending / in-process purchases.
    ///
    /// Never called automatically: re-checking is always a user or page
    /// action, so the provider is not hammered by a polling loop. Terminal
    /// states return immediately without a lookup.
    #[instrument(skip_all, fields(app_id = %self.intent.app_id))]
    pub async fn refresh_status(&self) -> CustomResult<PurchaseStatus, CheckoutError> {
        self.ensure_open()?;
        let lookup = {
            let state = self.state();
            if !state.status.is_refreshable() {
                return Ok(state.status);
            }
            StatusLookup {
                preference_id: state.preference_id.clone(),
                payment_id: state.payment_id.clone(),
                status_hint: None,
            }
        };

        let resolved =
            status::resolve_status(self.backend.as_ref(), &self.intent.app_id, &lookup).await;
        self.ensure_open()?;
        let resolved = resolved?;

        // A failed lookup renders the error screen but is never persisted as
        // a transition; the purchase may still be decided on a later refresh.
        if resolved.status == PurchaseStatus::Error {
            return Ok(PurchaseStatus::Error);
        }

        let mut state = self.state();
        if resolved.payment_id.is_some() {
            state.payment_id = resolved.payment_id;
        }
        if resolved.status_detail.is_some() {
            state.status_detail = resolved.status_detail;
        }
        if resolved.email.is_some() {
            state.grant_email = resolved.email;
        }
        Self::apply_status(&mut state, resolved.status);

        // A grant embedded in the status response saves the handoff call,
        // but only an approved confirmation may carry one.
        if state.status == PurchaseStatus::Approved {
            if let Some(raw_url) = resolved.download_url {
                let url = download::resolve_download_url(self.backend.base_url(), &raw_url)?;
                state.download = Some(ResolvedDownload {
                    url,
                    email: state.grant_email.clone(),
                });
            }
        }
        Ok(state.status)
    }

    /// Resolve the download grant for an approved purchase.
    ///
    /// Unreachable in any other state. Prefers the payment id as proof of
    /// purchase and falls back to the buyer email for re-delivery.
    #[instrument(skip_all, fields(app_id = %self.intent.app_id))]
    pub async fn request_download(&self) -> CustomResult<ResolvedDownload, CheckoutError> {
        self.ensure_open()?;
        let (payment_id, cached) = {
            let state = self.state();
            if state.status != PurchaseStatus::Approved {
                return Err(error_stack::report!(CheckoutError::PurchaseNotApproved));
            }
            (state.payment_id.clone(), state.download.clone())
        };
        if let Some(download) = cached {
            return Ok(download);
        }

        let email = self.buyer_email();
        let resolved = download::grant_download(
            self.backend.as_ref(),
            &self.intent.app_id,
            payment_id.as_deref(),
            email.as_deref(),
        )
        .await;
        self.ensure_open()?;
        let resolved = resolved?;

        self.state().download = Some(resolved.clone());
        Ok(resolved)
    }

    /// "Resend my download link": email-only re-delivery for buyers who come
    /// back without a payment id.
    #[instrument(skip_all, fields(app_id = %self.intent.app_id))]
    pub async fn resend_download_link(
        &self,
        email: &str,
    ) -> CustomResult<ResolvedDownload, CheckoutError> {
        self.ensure_open()?;
        if self.state().status != PurchaseStatus::Approved {
            return Err(error_stack::report!(CheckoutError::PurchaseNotApproved));
        }
        let resolved =
            download::grant_download(self.backend.as_ref(), &self.intent.app_id, None, Some(email))
                .await;
        self.ensure_open()?;
        resolved
    }

    /// Post-purchase rating. Fire and forget: a failed submission is logged
    /// and never surfaces as an error state on the page.
    #[instrument(skip_all, fields(app_id = %self.intent.app_id))]
    pub async fn leave_feedback(
        &self,
        rating: u8,
        comment: Option<String>,
    ) -> CustomResult<(), CheckoutError> {
        self.ensure_open()?;
        if !(1..=5).contains(&rating) {
            return Err(error_stack::report!(CheckoutError::InvalidRequest {
                message: "rating must be between 1 and 5".to_string(),
            }));
        }
        let request = storefront_api_models::downloads::FeedbackRequest { rating, comment };
        if let Err(error) = self
            .backend
            .submit_feedback(&self.intent.app_id, &request)
            .await
        {
            tracing::error!(?error, "feedback submission failed");
        }
        Ok(())
    }
}
