//! Configuration options for the rental checkout client

use std::time::Duration;

use crate::error::{Error, Result};

/// Backend endpoint paths, relative to the API base URL
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Saved addresses for the signed-in user
    pub addresses: String,

    /// Gateway public key and branding
    pub payment_config: String,

    /// Mints a gateway order
    pub create_order: String,

    /// Verifies a completed payment and persists the order
    pub verify_payment: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            addresses: "/api/addresses".to_string(),
            payment_config: "/api/payment/config".to_string(),
            create_order: "/api/payment/create-order".to_string(),
            verify_payment: "/api/payment/verify".to_string(),
        }
    }
}

/// Configuration options for the rental checkout client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Bearer token sent with every backend request
    pub access_token: Option<String>,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// ISO currency code used for gateway orders
    pub currency: String,

    /// Artificial delay between confirming the order and entering payment
    pub processing_delay: Duration,

    /// How long a notification stays visible before it is dismissed
    pub notification_duration: Duration,

    /// Location of the gateway's hosted checkout script
    pub gateway_script_url: String,

    /// Theme colour passed to the gateway widget
    pub theme_color: String,

    /// Backend endpoint paths
    pub endpoints: Endpoints,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            access_token: None,
            request_timeout: Some(Duration::from_secs(30)),
            currency: "INR".to_string(),
            processing_delay: Duration::from_millis(1500),
            notification_duration: Duration::from_secs(3),
            gateway_script_url: "https://checkout.razorpay.com/v1/checkout.js".to_string(),
            theme_color: "#8B5CF6".to_string(),
            endpoints: Endpoints::default(),
        }
    }
}

impl ClientOptions {
    /// Build options from the defaults, overlaid with environment variables.
    ///
    /// Recognised variables: `RENTAL_API_TOKEN`, `RENTAL_REQUEST_TIMEOUT_SECS`
    /// (0 disables the timeout) and `RENTAL_CURRENCY`.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(token) = std::env::var("RENTAL_API_TOKEN") {
            if !token.is_empty() {
                options.access_token = Some(token);
            }
        }

        if let Ok(secs) = std::env::var("RENTAL_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::config(format!("RENTAL_REQUEST_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            options.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Ok(currency) = std::env::var("RENTAL_CURRENCY") {
            if !currency.is_empty() {
                options.currency = currency.to_uppercase();
            }
        }

        Ok(options)
    }

    /// Set the bearer token
    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the currency
    pub fn with_currency(mut self, value: &str) -> Self {
        self.currency = value.to_string();
        self
    }

    /// Set the simulated processing delay
    pub fn with_processing_delay(mut self, value: Duration) -> Self {
        self.processing_delay = value;
        self
    }

    /// Set the notification auto-dismiss duration
    pub fn with_notification_duration(mut self, value: Duration) -> Self {
        self.notification_duration = value;
        self
    }

    /// Set the gateway script URL
    pub fn with_gateway_script_url(mut self, value: &str) -> Self {
        self.gateway_script_url = value.to_string();
        self
    }

    /// Set the widget theme colour
    pub fn with_theme_color(mut self, value: &str) -> Self {
        self.theme_color = value.to_string();
        self
    }

    /// Replace the endpoint paths
    pub fn with_endpoints(mut self, value: Endpoints) -> Self {
        self.endpoints = value;
        self
    }
}
