//! Order drafts assembled at checkout

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::product::ProductLineItem;

/// The order as the client sees it before payment is verified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub products: Vec<ProductLineItem>,

    #[serde(rename = "totalPrice")]
    pub total_price: Decimal,

    pub address: Address,
}

/// Sum of rental price plus deposit over every item.
///
/// Saturates at `Decimal::MAX` rather than overflowing.
pub fn order_total(products: &[ProductLineItem]) -> Decimal {
    products
        .iter()
        .fold(Decimal::ZERO, |total, item| total.saturating_add(item.line_total()))
}

/// Build the order draft for `products` shipped to `address`
pub fn assemble_order_draft(products: &[ProductLineItem], address: &Address) -> OrderDraft {
    OrderDraft {
        products: products.to_vec(),
        total_price: order_total(products),
        address: address.clone(),
    }
}

/// Display an amount in rupees with two decimals, e.g. `₹1800.00`
pub fn format_amount(amount: Decimal) -> String {
    format!("₹{:.2}", amount.round_dp(2))
}
