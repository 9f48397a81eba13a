//! Types for the payment gateway endpoints and widget

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::address::Address;
use crate::product::ProductLineItem;

/// Public gateway key and branding, served by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Publishable key for the hosted widget
    #[serde(alias = "key_id", alias = "keyId")]
    pub key: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Logo shown in the widget
    #[serde(default, alias = "logo")]
    pub image: Option<String>,
}

/// Purpose metadata attached to a gateway order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderNotes {
    pub order_type: String,
    pub customer_email: String,
}

/// Body of the create-order call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Amount in major currency units
    pub amount: Decimal,
    pub currency: String,
    pub receipt: String,
    pub notes: OrderNotes,
}

/// A gateway order minted by the backend for one payment attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,

    /// Amount as the gateway expects it (usually minor units)
    pub amount: Decimal,

    pub currency: String,

    #[serde(default)]
    pub receipt: Option<String>,
}

/// Payload of the widget's success callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySuccess {
    #[serde(alias = "razorpay_order_id")]
    pub gateway_order_id: String,

    #[serde(alias = "razorpay_payment_id")]
    pub gateway_payment_id: String,

    #[serde(alias = "razorpay_signature")]
    pub gateway_signature: String,
}

/// Order details sent along with a verification request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOrderData {
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub products: Vec<ProductLineItem>,
    pub total_price: Decimal,
    pub address: Address,
}

/// Body of the verify call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub gateway_signature: String,
    #[serde(rename = "orderData")]
    pub order_data: VerifyOrderData,
}

/// Outcome of a verified payment, handed to the confirmation view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub order_number: String,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,

    /// Whatever the backend returned as `data`
    pub details: Value,

    pub message: Option<String>,
}

/// Prefilled customer fields in the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutPrefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutTheme {
    pub color: String,
}

/// Everything the hosted widget needs to open
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutOptions {
    pub key: String,
    pub amount: Decimal,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub order_id: String,
    pub prefill: CheckoutPrefill,
    pub notes: OrderNotes,
    pub theme: CheckoutTheme,
}
