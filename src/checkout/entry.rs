//! Resolving the products a checkout starts with

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::product::ProductLineItem;
use crate::store::{load_json, save_json, KeyValueStore, SELECTED_PRODUCT_KEY};

/// Navigation state handed to checkout by the product or cart screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckoutEntry {
    /// "Rent now" on a single product
    pub product: Option<Value>,

    /// Checkout of the whole cart
    #[serde(alias = "cartItems")]
    pub products: Vec<Value>,
}

impl CheckoutEntry {
    pub fn single(product: Value) -> Self {
        Self {
            product: Some(product),
            products: Vec::new(),
        }
    }

    pub fn cart(products: Vec<Value>) -> Self {
        Self {
            product: None,
            products,
        }
    }
}

/// Pick the raw products for this checkout.
///
/// A single product wins over a cart list. Whatever navigation supplied is
/// written to the "last selected product" cache; without navigation state the
/// cache is the fallback. Cache failures are logged and otherwise ignored.
pub(crate) fn resolve_products(
    entry: Option<CheckoutEntry>,
    store: &dyn KeyValueStore,
) -> Vec<ProductLineItem> {
    let entry = entry.unwrap_or_default();

    let raw: Vec<Value> = if let Some(product) = entry.product.filter(|p| !p.is_null()) {
        if let Err(e) = save_json(store, SELECTED_PRODUCT_KEY, &product) {
            warn!("could not cache selected product: {}", e);
        }
        vec![product]
    } else if !entry.products.is_empty() {
        if let Err(e) = save_json(store, SELECTED_PRODUCT_KEY, &entry.products) {
            warn!("could not cache selected products: {}", e);
        }
        entry.products
    } else {
        match load_json::<Value>(store, SELECTED_PRODUCT_KEY) {
            Ok(Some(Value::Array(items))) => items,
            Ok(Some(Value::Null)) | Ok(None) => Vec::new(),
            Ok(Some(item)) => vec![item],
            Err(e) => {
                warn!("could not read cached product: {}", e);
                Vec::new()
            }
        }
    };

    raw.iter()
        .filter(|p| p.is_object())
        .map(ProductLineItem::from_raw)
        .collect()
}
