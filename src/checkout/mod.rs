//! Two-step checkout: choose an address, then review and confirm

mod entry;

use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

use crate::address::{mark_default, Address, AddressClient};
use crate::busy::BusyFlag;
use crate::error::Error;
use crate::navigation::{PaymentHandoff, Route};
use crate::notification::Notifier;
use crate::order::{assemble_order_draft, format_amount, order_total};
use crate::product::ProductLineItem;
use crate::store::{default_address_key, load_json, save_json, KeyValueStore};

pub use entry::CheckoutEntry;
pub(crate) use entry::resolve_products;

/// Checkout step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    /// Pick, create or edit the shipping address
    Address,
    /// Show the total and address summary; confirm or go back
    Review,
}

/// What the checkout screen shows on entry
pub enum CheckoutScreen {
    /// No product was supplied; only back/home navigation is offered
    NoProducts,
    Checkout(CheckoutSequencer),
}

impl CheckoutScreen {
    /// Back navigation; only the empty screen offers it
    pub fn go_back(&self) -> Option<Route> {
        matches!(self, Self::NoProducts).then_some(Route::Back)
    }

    pub fn go_home(&self) -> Option<Route> {
        matches!(self, Self::NoProducts).then_some(Route::Home)
    }
}

/// Collaborators shared by every checkout
#[derive(Clone)]
pub(crate) struct CheckoutContext {
    pub addresses: AddressClient,
    pub store: Arc<dyn KeyValueStore>,
    pub notifier: Notifier,
    pub processing_delay: Duration,
}

/// Address → review state machine
pub struct CheckoutSequencer {
    step: CheckoutStep,
    products: Vec<ProductLineItem>,
    addresses: Vec<Address>,
    active: Address,
    adding_new_address: bool,
    user_id: String,
    store: Arc<dyn KeyValueStore>,
    notifier: Notifier,
    submitting: BusyFlag,
    processing_delay: Duration,
}

impl CheckoutSequencer {
    /// Enter checkout for `user_id`.
    ///
    /// Resolves the products (navigation state first, then the local cache)
    /// and fetches the saved addresses. A failed fetch is reported and the
    /// user starts on a new address instead.
    pub(crate) async fn start(
        entry: Option<CheckoutEntry>,
        user_id: &str,
        ctx: CheckoutContext,
    ) -> CheckoutScreen {
        let products = resolve_products(entry, ctx.store.as_ref());
        if products.is_empty() {
            info!("checkout entered without products");
            return CheckoutScreen::NoProducts;
        }

        let addresses = match ctx.addresses.list().await {
            Ok(addresses) => addresses,
            Err(e) => {
                warn!("failed to load addresses: {}", e);
                ctx.notifier.error(e.user_message("Failed to load addresses"));
                Vec::new()
            }
        };

        let mut sequencer = Self {
            step: CheckoutStep::Address,
            products,
            addresses,
            active: Address::default(),
            adding_new_address: false,
            user_id: user_id.to_string(),
            store: ctx.store,
            notifier: ctx.notifier,
            submitting: BusyFlag::new(),
            processing_delay: ctx.processing_delay,
        };
        sequencer.reset_active_address();

        debug!(
            "checkout started with {} products and {} addresses",
            sequencer.products.len(),
            sequencer.addresses.len()
        );
        CheckoutScreen::Checkout(sequencer)
    }

    /// Cached default → flagged default → first address → new draft
    fn preferred_address(&self) -> Option<Address> {
        let cached = load_json::<Address>(self.store.as_ref(), &default_address_key(&self.user_id))
            .unwrap_or_else(|e| {
                warn!("could not read cached default address: {}", e);
                None
            });

        cached
            .and_then(|c| self.addresses.iter().find(|a| a.id == c.id))
            .or_else(|| self.addresses.iter().find(|a| a.is_default))
            .or_else(|| self.addresses.first())
            .cloned()
    }

    fn reset_active_address(&mut self) {
        match self.preferred_address() {
            Some(address) => {
                self.active = address;
                self.adding_new_address = false;
            }
            None => {
                self.active = Address::new_draft();
                self.adding_new_address = true;
            }
        }
    }

    fn require_step(&self, step: CheckoutStep) -> Result<(), Error> {
        if self.step != step {
            return Err(Error::invalid_state(format!(
                "expected {:?} step, currently {:?}",
                step, self.step
            )));
        }
        Ok(())
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn products(&self) -> &[ProductLineItem] {
        &self.products
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn active_address(&self) -> &Address {
        &self.active
    }

    /// Edit the active address fields (the new-address form binds here)
    pub fn active_address_mut(&mut self) -> &mut Address {
        &mut self.active
    }

    pub fn is_adding_new_address(&self) -> bool {
        self.adding_new_address
    }

    /// Observable while `confirm` is in flight
    pub fn submitting(&self) -> BusyFlag {
        self.submitting.clone()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Make a saved address the active one, without validating it
    pub fn select_address(&mut self, id: &str) -> Result<(), Error> {
        self.require_step(CheckoutStep::Address)?;
        let address = self
            .addresses
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| Error::invalid_state(format!("unknown address {}", id)))?;

        debug!("selected address {}", address.id);
        self.active = address;
        self.adding_new_address = false;
        Ok(())
    }

    /// Show or hide the new-address form.
    ///
    /// Showing it replaces the active address with a blank draft; hiding it
    /// falls back to the preferred saved address.
    pub fn toggle_add_new_address(&mut self) -> Result<(), Error> {
        self.require_step(CheckoutStep::Address)?;
        if self.adding_new_address {
            if self.addresses.is_empty() {
                return Ok(());
            }
            self.reset_active_address();
        } else {
            self.active = Address::new_draft();
            self.adding_new_address = true;
        }
        Ok(())
    }

    /// Flag `id` as the user's only default address and remember it locally
    pub fn make_default(&mut self, id: &str) -> Result<(), Error> {
        self.require_step(CheckoutStep::Address)?;
        let chosen = mark_default(&mut self.addresses, id)
            .ok_or_else(|| Error::invalid_state(format!("unknown address {}", id)))?;

        if let Some(current) = self.addresses.iter().find(|a| a.id == self.active.id) {
            self.active.is_default = current.is_default;
        }

        save_json(self.store.as_ref(), &default_address_key(&self.user_id), &chosen)?;
        info!("address {} is now the default", id);
        self.notifier.success("Default address updated");
        Ok(())
    }

    /// Validate the active address and move to review.
    ///
    /// On failure the violated rule is shown and the step does not change.
    pub fn proceed_to_review(&mut self) -> Result<(), Error> {
        self.require_step(CheckoutStep::Address)?;
        if let Err(rule) = self.active.validate() {
            debug!("address rejected: {}", rule);
            self.notifier.error(rule.to_string());
            return Err(rule.into());
        }
        self.step = CheckoutStep::Review;
        Ok(())
    }

    /// Return to the address step; always allowed
    pub fn back_to_address(&mut self) {
        self.step = CheckoutStep::Address;
    }

    pub fn total(&self) -> Decimal {
        order_total(&self.products)
    }

    /// Total as shown on the review step, e.g. `₹1800.00`
    pub fn formatted_total(&self) -> String {
        format_amount(self.total())
    }

    pub fn address_summary(&self) -> String {
        self.active.summary()
    }

    /// Confirm the order and hand it to payment.
    ///
    /// Blocks duplicate submission while the processing delay runs; the flag
    /// clears on both success and failure.
    pub async fn confirm(&mut self) -> Result<Route, Error> {
        self.require_step(CheckoutStep::Review)?;
        let _guard = self.submitting.try_acquire().ok_or(Error::Busy)?;

        if let Err(rule) = self.active.validate() {
            self.notifier.error(rule.to_string());
            self.step = CheckoutStep::Address;
            return Err(rule.into());
        }

        tokio::time::sleep(self.processing_delay).await;

        let draft = assemble_order_draft(&self.products, &self.active);
        info!(
            "order confirmed: {} items, total {}",
            draft.products.len(),
            format_amount(draft.total_price)
        );

        Ok(Route::Payment(PaymentHandoff {
            order_payload: draft,
        }))
    }
}
