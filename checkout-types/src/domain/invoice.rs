//! Invoice reference type.
//!
//! Invoices are owned by the storefront platform; the core only attaches a
//! payment-satisfied determination to them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::amount::Amount;
use super::transaction::TxRef;

/// Unique identifier for an Invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(Uuid);

impl InvoiceId {
    /// Creates a new random InvoiceId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an InvoiceId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for InvoiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for InvoiceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The slice of an invoice the verification core needs: what has to be
/// paid, where, and (once the shopper submits) with which transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    /// Amount due, in the invoice's settlement currency.
    pub amount: Amount,
    /// Merchant address the payment must arrive at.
    pub address: String,
    /// Transaction the shopper claims pays this invoice, if submitted.
    pub tx_ref: Option<TxRef>,
}

impl Invoice {
    pub fn new(amount: Amount, address: impl Into<String>) -> Self {
        Self {
            id: InvoiceId::new(),
            amount,
            address: address.into(),
            tx_ref: None,
        }
    }

    /// Attaches the shopper's claimed transaction reference.
    pub fn with_tx_ref(mut self, tx_ref: TxRef) -> Self {
        self.tx_ref = Some(tx_ref);
        self
    }
}
