//! Port traits the verification core consumes.
//!
//! Adapters (HTTP chain clients, rate feeds, platform persistence)
//! implement these traits and are injected at construction.

pub mod ledger;
pub mod rates;
pub mod store;

pub use ledger::{LedgerClient, LedgerError, TxObservation, TxValidity};
pub use rates::{RateError, RateSource};
pub use store::{EffectSink, InvoiceStore, StoreError};
