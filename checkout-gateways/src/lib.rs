//! # Checkout Gateways
//!
//! Concrete adapters implementing the ports in `checkout-types`:
//! - `http` - reqwest-based rate source and ledger client with bounded
//!   timeouts
//! - `memory` - in-memory invoice store and effect sink for tests and
//!   platform-adapter smoke wiring

pub mod http;
pub mod memory;

pub use http::{HttpLedgerClient, HttpRateSource};
pub use memory::{InMemoryInvoiceStore, RecordedEffect, RecordingEffectSink};
