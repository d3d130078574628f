//! Inbound webhook notification types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::invoice::InvoiceId;
use super::transaction::TxRef;

/// Notification types the payment processor delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEventType {
    #[serde(rename = "payment.succeeded")]
    PaymentSucceeded,
    #[serde(rename = "payment.failed")]
    PaymentFailed,
    #[serde(rename = "refund.succeeded")]
    RefundSucceeded,
}

impl WebhookEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEventType::PaymentSucceeded => "payment.succeeded",
            WebhookEventType::PaymentFailed => "payment.failed",
            WebhookEventType::RefundSucceeded => "refund.succeeded",
        }
    }
}

impl std::fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for WebhookEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment.succeeded" => Ok(WebhookEventType::PaymentSucceeded),
            "payment.failed" => Ok(WebhookEventType::PaymentFailed),
            "refund.succeeded" => Ok(WebhookEventType::RefundSucceeded),
            _ => Err(format!("Unknown webhook event type: {}", s)),
        }
    }
}

/// Idempotency key for webhook admission.
///
/// Delivery is at-least-once; two events with the same key are the same
/// logical notification and must apply at most one effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub event_type: WebhookEventType,
    pub invoice_id: InvoiceId,
    pub tx_ref: TxRef,
}

/// One inbound webhook delivery.
///
/// `payload` holds the untouched wire bytes: the signature covers exactly
/// those bytes, so a re-serialized copy would not verify.
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    pub event_type: WebhookEventType,
    pub invoice_id: InvoiceId,
    pub tx_ref: TxRef,
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
    pub payload: Vec<u8>,
    pub signature: String,
}

impl WebhookEvent {
    /// Parses the raw payload as JSON.
    ///
    /// The signature is computed over the raw bytes, so callers verify
    /// first and parse second.
    pub fn parsed_payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }

    pub fn key(&self) -> EventKey {
        EventKey {
            event_type: self.event_type,
            invoice_id: self.invoice_id,
            tx_ref: self.tx_ref.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Currency;

    fn event(event_type: WebhookEventType, tx_ref: &str) -> WebhookEvent {
        WebhookEvent {
            event_type,
            invoice_id: InvoiceId::from_uuid(uuid::Uuid::nil()),
            tx_ref: TxRef::new(tx_ref),
            amount: Amount::from_units(100, Currency::BTC),
            timestamp: Utc::now(),
            payload: b"{}".to_vec(),
            signature: String::new(),
        }
    }

    #[test]
    fn test_event_type_parse() {
        assert_eq!(
            "payment.succeeded".parse::<WebhookEventType>().unwrap(),
            WebhookEventType::PaymentSucceeded
        );
        assert!("payment.exploded".parse::<WebhookEventType>().is_err());
    }

    #[test]
    fn test_same_delivery_same_key() {
        let a = event(WebhookEventType::PaymentSucceeded, "tx-1");
        let b = event(WebhookEventType::PaymentSucceeded, "tx-1");
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_key_distinguishes_type_and_tx() {
        let a = event(WebhookEventType::PaymentSucceeded, "tx-1");
        let b = event(WebhookEventType::RefundSucceeded, "tx-1");
        let c = event(WebhookEventType::PaymentSucceeded, "tx-2");
        assert_ne!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }
}
