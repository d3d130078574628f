//! Transaction record: the confirmation state machine's subject.

use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::currency::Currency;

/// Opaque on-chain transaction reference (id or hash).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxRef(String);

impl TxRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TxRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Verification status of a claimed transaction.
///
/// Transitions are monotonic: `Pending -> Confirmed` or `Pending ->
/// Rejected`, never reversed. `Confirmed` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxStatus {
    /// Seen (or claimed) but below the required confirmation depth.
    Pending,
    /// Reached the required confirmation depth.
    Confirmed,
    /// The ledger reported the transaction invalid or double-spent.
    Rejected,
}

impl TxStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TxStatus::Confirmed | TxStatus::Rejected)
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxStatus::Pending => write!(f, "PENDING"),
            TxStatus::Confirmed => write!(f, "CONFIRMED"),
            TxStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// A claimed payment transaction being tracked toward settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub currency: Currency,
    pub tx_ref: TxRef,
    /// Destination address the payment was claimed against.
    pub address: String,
    pub amount: Amount,
    /// Confirmations observed on the ledger so far.
    pub confirmations: u32,
    /// Confirmations required for the active network mode.
    pub required_confirmations: u32,
    pub status: TxStatus,
}

impl TransactionRecord {
    /// Creates a fresh record in `Pending` with no observed confirmations.
    pub fn pending(
        currency: Currency,
        tx_ref: TxRef,
        address: impl Into<String>,
        amount: Amount,
        required_confirmations: u32,
    ) -> Self {
        Self {
            currency,
            tx_ref,
            address: address.into(),
            amount,
            confirmations: 0,
            required_confirmations,
            status: TxStatus::Pending,
        }
    }

    /// Folds a new ledger observation into the record.
    ///
    /// Terminal states are preserved: a Confirmed or Rejected record never
    /// regresses, and observed confirmations never decrease even if the
    /// ledger momentarily reports fewer.
    pub fn observe(&mut self, confirmations: u32, ledger_valid: bool) {
        if self.status.is_terminal() {
            self.confirmations = self.confirmations.max(confirmations);
            return;
        }
        if !ledger_valid {
            self.status = TxStatus::Rejected;
            return;
        }
        self.confirmations = self.confirmations.max(confirmations);
        if self.confirmations >= self.required_confirmations {
            self.status = TxStatus::Confirmed;
        }
    }
}
