//! Shipping address types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A shipping address, as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Backend identifier; locally created drafts get a `local-` prefixed id
    #[serde(alias = "_id", deserialize_with = "id_from_any")]
    pub id: String,

    /// "home", "work" or "other"
    pub address_type: String,

    pub street_address: String,

    pub city: String,

    pub state: String,

    pub postal_code: String,

    pub country: String,

    pub phone_number: String,

    pub first_name: String,

    pub last_name: String,

    pub email: String,

    #[serde(rename = "isDefault", alias = "is_default")]
    pub is_default: bool,
}

impl Default for Address {
    fn default() -> Self {
        Self {
            id: String::new(),
            address_type: "home".to_string(),
            street_address: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: "India".to_string(),
            phone_number: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            is_default: false,
        }
    }
}

impl Address {
    /// A blank address not yet known to the backend
    pub fn new_draft() -> Self {
        Self {
            id: format!("local-{}", uuid::Uuid::new_v4()),
            ..Self::default()
        }
    }

    /// Whether this address only exists on the client
    pub fn is_local(&self) -> bool {
        self.id.is_empty() || self.id.starts_with("local-")
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// One-line summary for the review step
    pub fn summary(&self) -> String {
        [
            self.street_address.trim(),
            self.city.trim(),
            self.state.trim(),
            self.postal_code.trim(),
            self.country.trim(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Flag `id` as the only default address in `addresses`.
///
/// Every address sharing that id is flagged; all others are cleared. Returns
/// the first matching address, or `None` (leaving the list untouched) when no
/// address has that id.
pub fn mark_default(addresses: &mut [Address], id: &str) -> Option<Address> {
    if !addresses.iter().any(|a| a.id == id) {
        return None;
    }
    for address in addresses.iter_mut() {
        address.is_default = address.id == id;
    }
    addresses.iter().find(|a| a.id == id).cloned()
}

fn id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
