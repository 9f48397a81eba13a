use reqwest::Client;
use serde_json::Value;

use super::types::{CreateOrderRequest, GatewayConfig, GatewayOrder, VerifyPaymentRequest};
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{endpoint_url, Fetch};

/// Client for the backend's payment endpoints
#[derive(Clone)]
pub struct PaymentClient {
    url: String,
    client: Client,
    options: ClientOptions,
}

impl PaymentClient {
    pub(crate) fn new(url: &str, client: Client, options: ClientOptions) -> Self {
        Self {
            url: url.to_string(),
            client,
            options,
        }
    }

    pub(crate) fn options(&self) -> &ClientOptions {
        &self.options
    }

    fn endpoint(&self, path: &str) -> String {
        endpoint_url(&self.url, path)
    }

    /// Fetch the gateway key and branding
    pub async fn fetch_config(&self) -> Result<GatewayConfig, Error> {
        let url = self.endpoint(&self.options.endpoints.payment_config);

        Fetch::get(&self.client, &url)
            .bearer_auth(self.options.access_token.as_deref())
            .timeout(self.options.request_timeout)
            .execute::<GatewayConfig>()
            .await?
            .into_data("Failed to load payment configuration")
    }

    /// Ask the backend to mint a gateway order
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<GatewayOrder, Error> {
        let url = self.endpoint(&self.options.endpoints.create_order);

        Fetch::post(&self.client, &url)
            .bearer_auth(self.options.access_token.as_deref())
            .timeout(self.options.request_timeout)
            .json(request)?
            .execute::<GatewayOrder>()
            .await?
            .into_data("Failed to create payment order")
    }

    /// Verify a completed payment.
    ///
    /// Returns the backend's `data` (or `null`) together with its message.
    pub async fn verify(&self, request: &VerifyPaymentRequest) -> Result<(Value, Option<String>), Error> {
        let url = self.endpoint(&self.options.endpoints.verify_payment);

        let envelope = Fetch::post(&self.client, &url)
            .bearer_auth(self.options.access_token.as_deref())
            .timeout(self.options.request_timeout)
            .json(request)?
            .execute::<Value>()
            .await?;

        if !envelope.success {
            let message = envelope
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Payment verification failed".to_string());
            return Err(Error::api(message));
        }

        Ok((envelope.data.unwrap_or(Value::Null), envelope.message))
    }
}
