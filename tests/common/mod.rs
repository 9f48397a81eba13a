#![allow(dead_code)]

use async_trait::async_trait;
use rental_checkout::config::ClientOptions;
use rental_checkout::error::Error;
use rental_checkout::payment::{CheckoutOptions, PaymentWidget};
use rental_checkout::RentalClient;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

/// A client against `uri` that skips the artificial processing delay
pub fn test_client(uri: &str) -> RentalClient {
    init_logger();
    let options = ClientOptions::default()
        .with_processing_delay(Duration::ZERO)
        .with_access_token("test-token");
    RentalClient::new_with_options(uri, options)
}

pub fn valid_address_json(id: &str, is_default: bool) -> Value {
    json!({
        "id": id,
        "address_type": "home",
        "street_address": "12 MG Road",
        "city": "Pune",
        "state": "Maharashtra",
        "postal_code": "411001",
        "country": "India",
        "phone_number": "9876543210",
        "first_name": "Asha",
        "last_name": "Rao",
        "email": "asha@example.com",
        "isDefault": is_default
    })
}

/// Records what the payment flow asked of the hosted widget
#[derive(Default)]
pub struct MockWidget {
    pub loaded: AtomicBool,
    pub fail_load: bool,
    pub load_calls: AtomicUsize,
    pub opened: Mutex<Vec<CheckoutOptions>>,
}

impl MockWidget {
    pub fn failing_load() -> Self {
        Self {
            fail_load: true,
            ..Self::default()
        }
    }

    pub fn open_count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    pub fn last_opened(&self) -> Option<CheckoutOptions> {
        self.opened.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PaymentWidget for MockWidget {
    fn is_script_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    async fn load_script(&self, _src: &str) -> Result<(), Error> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_load {
            return Err(Error::gateway("script blocked"));
        }
        self.loaded.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn open(&self, options: CheckoutOptions) -> Result<(), Error> {
        self.opened.lock().unwrap().push(options);
        Ok(())
    }
}
