//! Payment orchestration: gateway order, hosted widget, server-side verification

mod client;
mod types;
mod widget;

use log::{debug, error, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::busy::{BusyFlag, BusyGuard};
use crate::error::Error;
use crate::navigation::{ConfirmationHandoff, PaymentHandoff, Route};
use crate::notification::Notifier;
use crate::order::OrderDraft;

pub use client::PaymentClient;
pub use types::*;
pub use widget::PaymentWidget;

/// Payment screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentState {
    LoadingConfig,
    Ready,
    CreatingOrder,
    AwaitingGateway,
    Verifying,
    Succeeded,
    Failed,
}

/// What the payment screen shows on entry
pub enum PaymentScreen {
    /// No order draft in navigation state
    Redirect(Route),
    Payment(PaymentOrchestrator),
}

/// Collaborators shared by every payment attempt
#[derive(Clone)]
pub(crate) struct PaymentContext {
    pub client: PaymentClient,
    pub widget: Arc<dyn PaymentWidget>,
    pub notifier: Notifier,
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis()
}

/// Client-generated receipt tagging one payment attempt
pub fn generate_receipt() -> String {
    format!("receipt_{}", unix_millis())
}

/// Time-based order number sent with verification
pub fn generate_order_number() -> String {
    format!("ORD{}", unix_millis())
}

/// Drives one order through the gateway
pub struct PaymentOrchestrator {
    state: PaymentState,
    order: OrderDraft,
    config: Option<GatewayConfig>,
    gateway_order: Option<GatewayOrder>,
    verification: Option<VerificationResult>,
    inline_error: Option<String>,
    processing: BusyFlag,
    in_flight: Option<BusyGuard>,
    ctx: PaymentContext,
}

impl PaymentOrchestrator {
    /// Enter the payment screen and load the gateway configuration.
    ///
    /// Without an order draft the screen redirects home and no state is
    /// entered.
    pub(crate) async fn start(state: Option<PaymentHandoff>, ctx: PaymentContext) -> PaymentScreen {
        let Some(handoff) = state else {
            info!("payment entered without an order; redirecting home");
            return PaymentScreen::Redirect(Route::Home);
        };

        let mut orchestrator = Self {
            state: PaymentState::LoadingConfig,
            order: handoff.order_payload,
            config: None,
            gateway_order: None,
            verification: None,
            inline_error: None,
            processing: BusyFlag::new(),
            in_flight: None,
            ctx,
        };
        orchestrator.load_config().await;
        PaymentScreen::Payment(orchestrator)
    }

    /// Fetch the gateway configuration; a no-op once it has loaded.
    ///
    /// Failure leaves the screen usable with paying disabled, so the host can
    /// call this again to retry.
    pub async fn load_config(&mut self) {
        if self.config.is_some() {
            return;
        }
        self.state = PaymentState::LoadingConfig;

        match self.ctx.client.fetch_config().await {
            Ok(config) => {
                debug!("gateway config loaded for {}", config.name);
                self.config = Some(config);
                self.inline_error = None;
                self.state = PaymentState::Ready;
            }
            Err(e) => {
                error!("failed to load gateway config: {}", e);
                self.inline_error = Some(format!(
                    "Payment configuration error: {}",
                    e.user_message("unable to load payment settings")
                ));
                self.state = PaymentState::Failed;
            }
        }
    }

    pub fn state(&self) -> PaymentState {
        self.state
    }

    pub fn order(&self) -> &OrderDraft {
        &self.order
    }

    pub fn config(&self) -> Option<&GatewayConfig> {
        self.config.as_ref()
    }

    pub fn gateway_order(&self) -> Option<&GatewayOrder> {
        self.gateway_order.as_ref()
    }

    /// Present only after the backend confirmed the payment
    pub fn verification(&self) -> Option<&VerificationResult> {
        self.verification.as_ref()
    }

    /// Error shown next to the pay button (config, order and script failures)
    pub fn inline_error(&self) -> Option<&str> {
        self.inline_error.as_deref()
    }

    /// Set from the pay click until the attempt settles
    pub fn processing(&self) -> BusyFlag {
        self.processing.clone()
    }

    pub fn total(&self) -> Decimal {
        self.order.total_price
    }

    /// Whether the pay button is enabled
    pub fn can_pay(&self) -> bool {
        self.config.is_some()
            && !self.processing.is_busy()
            && self.total() > Decimal::ZERO
            && matches!(self.state, PaymentState::Ready | PaymentState::Failed)
    }

    /// Show `message` next to the pay button and hand back the cause
    fn fail_inline(&mut self, message: String, cause: Error) -> Error {
        warn!("payment attempt failed: {} ({})", message, cause);
        self.state = PaymentState::Failed;
        self.inline_error = Some(message);
        self.gateway_order = None;
        self.in_flight = None;
        cause
    }

    /// Start a payment attempt: load the gateway script, mint a gateway order
    /// and open the widget.
    ///
    /// On success the orchestrator waits in `AwaitingGateway` for the widget
    /// callbacks. Failures surface through [`inline_error`](Self::inline_error)
    /// and re-enable paying.
    pub async fn pay(&mut self) -> Result<(), Error> {
        let Some(config) = self.config.clone() else {
            return Err(Error::config("Payment configuration not loaded"));
        };
        if !matches!(self.state, PaymentState::Ready | PaymentState::Failed) {
            return Err(Error::invalid_state(format!("cannot pay while {:?}", self.state)));
        }
        if self.total() <= Decimal::ZERO {
            self.inline_error = Some("Invalid order amount".to_string());
            return Err(Error::invalid_state("order total must be greater than zero"));
        }
        let guard = self.processing.try_acquire().ok_or(Error::Busy)?;
        self.in_flight = Some(guard);

        self.state = PaymentState::CreatingOrder;
        self.inline_error = None;

        let options = self.ctx.client.options().clone();
        let widget = Arc::clone(&self.ctx.widget);

        if !widget.is_script_loaded() {
            debug!("loading gateway script from {}", options.gateway_script_url);
            if let Err(e) = widget.load_script(&options.gateway_script_url).await {
                error!("gateway script failed to load: {}", e);
                return Err(self.fail_inline(
                    "Failed to load payment gateway. Please check your connection and try again."
                        .to_string(),
                    e,
                ));
            }
        }

        let address = self.order.address.clone();
        let notes = OrderNotes {
            order_type: "rental".to_string(),
            customer_email: address.email.clone(),
        };
        let request = CreateOrderRequest {
            amount: self.total(),
            currency: options.currency.clone(),
            receipt: generate_receipt(),
            notes: notes.clone(),
        };

        let gateway_order = match self.ctx.client.create_order(&request).await {
            Ok(order) => order,
            Err(e) => {
                let message = e.user_message("Failed to create payment order");
                return Err(self.fail_inline(message, e));
            }
        };
        info!("gateway order {} created (receipt {})", gateway_order.id, request.receipt);

        let checkout = CheckoutOptions {
            key: config.key.clone(),
            amount: gateway_order.amount,
            currency: gateway_order.currency.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
            image: config.image.clone(),
            order_id: gateway_order.id.clone(),
            prefill: CheckoutPrefill {
                name: address.full_name(),
                email: address.email.clone(),
                contact: address.phone_number.clone(),
            },
            notes,
            theme: CheckoutTheme {
                color: options.theme_color.clone(),
            },
        };

        if let Err(e) = widget.open(checkout) {
            let message = e.user_message("Failed to open payment window");
            return Err(self.fail_inline(message, e));
        }

        self.gateway_order = Some(gateway_order);
        self.state = PaymentState::AwaitingGateway;
        Ok(())
    }

    /// The user closed the widget without paying: back to `Ready`, no error
    pub fn on_dismiss(&mut self) {
        if self.state != PaymentState::AwaitingGateway {
            debug!("ignoring widget dismissal while {:?}", self.state);
            return;
        }
        info!("payment widget dismissed");
        self.state = PaymentState::Ready;
        self.gateway_order = None;
        self.in_flight = None;
    }

    /// The widget reported a completed payment; verify it with the backend.
    ///
    /// Verification failures are reported through the notifier, since the
    /// widget has already closed. On success the confirmation route carries
    /// both the order draft and the verification result.
    pub async fn on_success(&mut self, event: GatewaySuccess) -> Result<Route, Error> {
        if self.state != PaymentState::AwaitingGateway {
            return Err(Error::invalid_state(format!(
                "unexpected payment callback while {:?}",
                self.state
            )));
        }
        if let Some(order) = &self.gateway_order {
            if order.id != event.gateway_order_id {
                warn!(
                    "callback order id {} differs from created order {}",
                    event.gateway_order_id, order.id
                );
            }
        }
        self.state = PaymentState::Verifying;

        let address = &self.order.address;
        let request = VerifyPaymentRequest {
            gateway_order_id: event.gateway_order_id.clone(),
            gateway_payment_id: event.gateway_payment_id.clone(),
            gateway_signature: event.gateway_signature.clone(),
            order_data: VerifyOrderData {
                order_number: generate_order_number(),
                customer_name: address.full_name(),
                customer_email: address.email.clone(),
                customer_phone: address.phone_number.clone(),
                products: self.order.products.clone(),
                total_price: self.order.total_price,
                address: address.clone(),
            },
        };

        let outcome = self.ctx.client.verify(&request).await;
        self.in_flight = None;

        match outcome {
            Ok((details, message)) => {
                let result = VerificationResult {
                    order_number: request.order_data.order_number,
                    gateway_order_id: event.gateway_order_id,
                    gateway_payment_id: event.gateway_payment_id,
                    details,
                    message,
                };
                info!("payment {} verified", result.gateway_payment_id);
                self.verification = Some(result.clone());
                self.state = PaymentState::Succeeded;
                self.ctx.notifier.success("Payment successful!");

                Ok(Route::Confirmation(ConfirmationHandoff {
                    order_payload: self.order.clone(),
                    payment_data: result,
                }))
            }
            Err(e) => {
                error!("payment verification failed: {}", e);
                self.state = PaymentState::Failed;
                self.ctx
                    .notifier
                    .error(e.user_message("Payment verification failed"));
                Err(e)
            }
        }
    }
}
