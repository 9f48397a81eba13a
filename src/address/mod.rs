//! Saved shipping addresses

mod types;
mod validate;

use reqwest::Client;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{endpoint_url, Fetch};

pub use types::*;
pub use validate::*;

/// Client for the backend's address endpoints
#[derive(Clone)]
pub struct AddressClient {
    /// The API base URL
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Client options
    options: ClientOptions,
}

impl AddressClient {
    pub(crate) fn new(url: &str, client: Client, options: ClientOptions) -> Self {
        Self {
            url: url.to_string(),
            client,
            options,
        }
    }

    /// Fetch the signed-in user's saved addresses
    pub async fn list(&self) -> Result<Vec<Address>, Error> {
        let url = endpoint_url(&self.url, &self.options.endpoints.addresses);

        let addresses = Fetch::get(&self.client, &url)
            .bearer_auth(self.options.access_token.as_deref())
            .timeout(self.options.request_timeout)
            .execute::<Vec<Address>>()
            .await?
            .into_data("Failed to load addresses")?;

        log::debug!("fetched {} addresses", addresses.len());
        Ok(addresses)
    }
}
