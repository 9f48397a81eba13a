use async_trait::async_trait;

use super::types::CheckoutOptions;
use crate::error::Error;

/// The gateway's hosted checkout widget.
///
/// Implemented by the host UI. After `open` succeeds the widget reports back
/// by calling [`PaymentOrchestrator::on_success`] or
/// [`PaymentOrchestrator::on_dismiss`]; those are the only inbound events.
///
/// [`PaymentOrchestrator::on_success`]: super::PaymentOrchestrator::on_success
/// [`PaymentOrchestrator::on_dismiss`]: super::PaymentOrchestrator::on_dismiss
#[async_trait]
pub trait PaymentWidget: Send + Sync {
    /// Whether the gateway script is already available
    fn is_script_loaded(&self) -> bool;

    /// Load the gateway script from `src`
    async fn load_script(&self, src: &str) -> Result<(), Error>;

    /// Open the widget; returns once it is shown, not when payment completes
    fn open(&self, options: CheckoutOptions) -> Result<(), Error>;
}
