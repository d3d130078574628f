//! # Checkout Types
//!
//! Domain types and port traits for the checkout payment-verification core.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Currency, Amount, TransactionRecord, WebhookEvent)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for the adapter-facing surface
//! - `error/` - Verification and coordinator error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Amount, Confirmations, Currency, CurrencyPolicy, EventKey, Invoice, InvoiceId, NetworkMode,
    PolicyTable, TransactionRecord, TxRef, TxStatus, WebhookEvent, WebhookEventType,
};
pub use dto::{Admission, AppliedEffect, PriceQuote, ValidationOutcome};
pub use error::{CoordinatorError, VerifyError};
pub use ports::{
    EffectSink, InvoiceStore, LedgerClient, LedgerError, RateError, RateSource, StoreError,
    TxObservation, TxValidity,
};
