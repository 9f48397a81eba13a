//! Rental Checkout Client Library
//!
//! Client-side checkout and payment orchestration for a clothing rental
//! storefront: address selection and validation, order drafts, gateway order
//! creation, the hosted payment widget and server-side payment verification.

pub mod address;
pub mod busy;
pub mod checkout;
pub mod config;
pub mod error;
pub mod fetch;
pub mod navigation;
pub mod notification;
pub mod order;
pub mod payment;
pub mod product;
pub mod store;

use reqwest::Client;
use std::sync::Arc;

use crate::address::AddressClient;
use crate::checkout::{CheckoutContext, CheckoutEntry, CheckoutScreen, CheckoutSequencer};
use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::navigation::PaymentHandoff;
use crate::notification::Notifier;
use crate::payment::{PaymentClient, PaymentContext, PaymentOrchestrator, PaymentScreen, PaymentWidget};
use crate::store::{KeyValueStore, MemoryStore};

/// The main entry point for the rental checkout client
pub struct RentalClient {
    /// The base URL of the rental backend API
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
    /// Local cache for the default address and last selected product
    store: Arc<dyn KeyValueStore>,
    /// Notification channel shared by every screen
    notifier: Notifier,
}

impl RentalClient {
    /// Create a new client with default options and an in-memory store
    ///
    /// # Example
    ///
    /// ```
    /// use rental_checkout::RentalClient;
    ///
    /// let client = RentalClient::new("https://api.example.com");
    /// ```
    pub fn new(api_url: &str) -> Self {
        Self::new_with_options(api_url, ClientOptions::default())
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use rental_checkout::{RentalClient, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_request_timeout(Some(Duration::from_secs(10)));
    /// let client = RentalClient::new_with_options("https://api.example.com", options);
    /// ```
    pub fn new_with_options(api_url: &str, options: ClientOptions) -> Self {
        let http_client = Client::new();
        let notifier = Notifier::new(options.notification_duration);

        Self {
            url: api_url.to_string(),
            http_client,
            options,
            store: Arc::new(MemoryStore::new()),
            notifier,
        }
    }

    /// Create a client from `RENTAL_API_URL` and the variables read by
    /// [`ClientOptions::from_env`]
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("RENTAL_API_URL")
            .map_err(|_| Error::config("RENTAL_API_URL environment variable not found"))?;
        url::Url::parse(&url)?;
        Ok(Self::new_with_options(&url, ClientOptions::from_env()?))
    }

    /// Use `store` for the client-side caches
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = store;
        self
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Address endpoints
    pub fn addresses(&self) -> AddressClient {
        AddressClient::new(&self.url, self.http_client.clone(), self.options.clone())
    }

    /// Payment endpoints
    pub fn payments(&self) -> PaymentClient {
        PaymentClient::new(&self.url, self.http_client.clone(), self.options.clone())
    }

    /// Enter checkout for `user_id` with the navigation state the product or
    /// cart screen supplied
    pub async fn start_checkout(&self, entry: Option<CheckoutEntry>, user_id: &str) -> CheckoutScreen {
        let ctx = CheckoutContext {
            addresses: self.addresses(),
            store: self.store(),
            notifier: self.notifier.clone(),
            processing_delay: self.options.processing_delay,
        };
        CheckoutSequencer::start(entry, user_id, ctx).await
    }

    /// Enter payment with the state checkout handed over
    pub async fn start_payment(
        &self,
        state: Option<PaymentHandoff>,
        widget: Arc<dyn PaymentWidget>,
    ) -> PaymentScreen {
        let ctx = PaymentContext {
            client: self.payments(),
            widget,
            notifier: self.notifier.clone(),
        };
        PaymentOrchestrator::start(state, ctx).await
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::address::{Address, AddressError};
    pub use crate::checkout::{CheckoutEntry, CheckoutScreen, CheckoutSequencer, CheckoutStep};
    pub use crate::config::ClientOptions;
    pub use crate::error::{Error, Result};
    pub use crate::navigation::{ConfirmationHandoff, PaymentHandoff, Route};
    pub use crate::notification::{Notification, NotificationKind, Notifier};
    pub use crate::order::OrderDraft;
    pub use crate::payment::{GatewaySuccess, PaymentOrchestrator, PaymentScreen, PaymentState, PaymentWidget};
    pub use crate::product::ProductLineItem;
    pub use crate::store::{FileStore, KeyValueStore, MemoryStore};
    pub use crate::RentalClient;
}
