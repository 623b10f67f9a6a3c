//! Provider SDK capability.
//!
//! The SDK script is acquired once per process through a memoized async
//! handle and is never torn down; widget instances built from it (card form,
//! wallet button, status screen) are created per use and destroyed when
//! dropped. Availability is never assumed: acquisition waits for the ready
//! signal with a bounded timeout and reports a hard failure after it,
//! instead of spinning forever.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::errors::{CheckoutError, CustomResult};

/// Loads the provider SDK and waits for its ready signal.
#[async_trait]
pub trait SdkLoader: Send + Sync {
    async fn load(&self) -> CustomResult<Arc<dyn ProviderSdk>, CheckoutError>;
}

/// The loaded SDK: a factory for widget instances.
pub trait ProviderSdk: Send + Sync {
    fn card_form(&self, amount: f64) -> CustomResult<Widget, CheckoutError>;
    fn wallet_button(&self, preference_id: &str) -> CustomResult<Widget, CheckoutError>;
    fn status_screen(&self, payment_id: &str) -> CustomResult<Widget, CheckoutError>;
}

/// A mounted widget. Owned exclusively by the component that created it.
pub trait WidgetInstance: Send {
    fn teardown(&mut self);
}

/// Scoped widget handle; tears the instance down on drop.
pub struct Widget {
    inner: Option<Box<dyn WidgetInstance>>,
}

impl Widget {
    pub fn new(inner: Box<dyn WidgetInstance>) -> Self {
        Self { inner: Some(inner) }
    }
}

impl Drop for Widget {
    fn drop(&mut self) {
        if let Some(mut instance) = self.inner.take() {
            instance.teardown();
        }
    }
}

/// Memoized SDK handle. The first `acquire` runs the loader (with the
/// bounded ready-wait); later calls reuse the loaded handle. A failed load
/// is not cached, so the user can retry after a transient failure.
pub struct SdkRuntime {
    cell: OnceCell<Arc<dyn ProviderSdk>>,
    ready_timeout: Duration,
}

impl SdkRuntime {
    pub fn new(ready_timeout: Duration) -> Self {
        Self {
            cell: OnceCell::new(),
            ready_timeout,
        }
    }

    pub async fn acquire(
        &self,
        loader: &dyn SdkLoader,
    ) -> CustomResult<Arc<dyn ProviderSdk>, CheckoutError> {
        self.cell
            .get_or_try_init(|| async {
                tokio::time::timeout(self.ready_timeout, loader.load())
                    .await
                    .map_err(|_elapsed| {
                        error_stack::report!(CheckoutError::SdkUnavailable)
                            .attach_printable("SDK ready signal did not arrive in time")
                    })?
            })
            .await
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}
