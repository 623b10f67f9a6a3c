//! Checkout core for the storefront: payment initiation, status
//! reconciliation, rejection classification and download handoff over the
//! marketplace REST backend and the Mercado Pago provider SDK.
//!
//! The crate is organized the same way top to bottom as a request flows:
//! [`services`] owns the HTTP seam to the backend, [`connectors`] owns the
//! provider-specific payload and error shapes, and [`core`] owns the flows
//! and the purchase state machine ([`core::session::CheckoutSession`]).

pub mod configs;
pub mod connectors;
pub mod core;
pub mod errors;
pub mod sdk;
pub mod services;

pub use crate::{
    configs::Settings,
    core::session::CheckoutSession,
    errors::{CheckoutError, CustomResult},
    services::api_client::{BackendClient, HttpBackendClient},
};
