//! Payment order creation.
//!
//! The service never touches card data. It asks the gateway for an order
//! id, hands that to the hosted checkout, and later checks the signature
//! the gateway returns (see [`verdict_core::SignatureVerifier`]).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use verdict_core::DecisionType;

use crate::config::PaymentSettings;

mod razorpay;

pub use razorpay::{
    RazorpayGateway, CREDENTIALS_NOT_CONFIGURED, RAZORPAY_KEY_ID_ENV, RAZORPAY_KEY_SECRET_ENV,
};

/// Errors from the payment gateway.
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("{0}")]
    NotConfigured(String),

    #[error("Order amount must be positive")]
    InvalidAmount,

    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Gateway error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),
}

/// Metadata stored with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderNotes {
    #[serde(rename = "type")]
    pub decision_type: String,
    pub input: String,
}

/// An order to be created at the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    /// Amount in the currency's minor unit (paise for INR)
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
    pub notes: OrderNotes,
}

impl OrderRequest {
    /// Build the order for one paid decision.
    ///
    /// The receipt carries the current Unix time in milliseconds and the
    /// input note is cut to `settings.notes_input_chars` characters.
    pub fn for_decision(
        amount: u64,
        decision_type: DecisionType,
        input: &str,
        settings: &PaymentSettings,
    ) -> Self {
        Self {
            amount,
            currency: settings.currency.clone(),
            receipt: format!(
                "{}{}",
                settings.receipt_prefix,
                chrono::Utc::now().timestamp_millis()
            ),
            notes: OrderNotes {
                decision_type: decision_type.as_str().to_string(),
                input: input.chars().take(settings.notes_input_chars).collect(),
            },
        }
    }
}

/// A created order. Only `id` is needed downstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A payment gateway that can create orders.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: OrderRequest) -> Result<Order, PaymentError>;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_decision_defaults() {
        let settings = PaymentSettings::default();
        let order = OrderRequest::for_decision(500, DecisionType::NowLater, "Move abroad", &settings);

        assert_eq!(order.amount, 500);
        assert_eq!(order.currency, "INR");
        assert!(order.receipt.starts_with("receipt_"));
        assert!(order.receipt["receipt_".len()..].parse::<i64>().is_ok());
        assert_eq!(order.notes.decision_type, "now-later");
        assert_eq!(order.notes.input, "Move abroad");
    }

    #[test]
    fn test_notes_input_cut_on_char_boundary() {
        let settings = PaymentSettings::default();
        let input = "é".repeat(150);
        let order = OrderRequest::for_decision(500, DecisionType::YesNo, &input, &settings);
        assert_eq!(order.notes.input.chars().count(), 100);
    }

    #[test]
    fn test_order_request_wire_format() {
        let settings = PaymentSettings::default();
        let order = OrderRequest::for_decision(500, DecisionType::YesNo, "x", &settings);
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["notes"]["type"], "yes-no");
        assert_eq!(json["amount"], 500);
    }
}
