//! Screen-to-screen handoffs
//!
//! Screens never call each other. Each operation that leaves a screen returns
//! a [`Route`] and the host UI performs the navigation.

use serde::{Deserialize, Serialize};

use crate::order::OrderDraft;
use crate::payment::VerificationResult;

/// State carried from checkout into payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHandoff {
    pub order_payload: OrderDraft,
}

/// State carried from payment into the confirmation view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationHandoff {
    pub order_payload: OrderDraft,
    pub payment_data: VerificationResult,
}

/// Where the host UI should go next
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Landing page
    Home,
    /// Previous screen in history
    Back,
    Payment(PaymentHandoff),
    Confirmation(ConfirmationHandoff),
}

/// Entry point of the confirmation view.
///
/// Without payment state there is nothing to confirm, so the view redirects
/// home.
pub fn enter_confirmation(state: Option<ConfirmationHandoff>) -> Result<ConfirmationHandoff, Route> {
    state.ok_or(Route::Home)
}
