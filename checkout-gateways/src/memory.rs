//! In-memory adapters for the store ports.
//!
//! Used by integration tests and for smoke-wiring a platform adapter
//! before its real persistence is connected.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use checkout_types::{EffectSink, Invoice, InvoiceId, InvoiceStore, StoreError, TxRef};

/// Invoice store backed by a concurrent map.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<DashMap<InvoiceId, Invoice>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an invoice.
    pub fn upsert(&self, invoice: Invoice) {
        self.invoices.insert(invoice.id, invoice);
    }
}

#[async_trait::async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
        Ok(self.invoices.get(&id).map(|entry| entry.value().clone()))
    }
}

/// An effect the coordinator signaled.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEffect {
    InvoicePaid(InvoiceId, TxRef),
    InvoiceFailed(InvoiceId, TxRef),
    RefundReversed(InvoiceId, TxRef),
}

/// Effect sink that records every signaled effect in order.
#[derive(Clone, Default)]
pub struct RecordingEffectSink {
    effects: Arc<Mutex<Vec<RecordedEffect>>>,
}

impl RecordingEffectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the effects applied so far.
    pub fn effects(&self) -> Vec<RecordedEffect> {
        self.effects.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl EffectSink for RecordingEffectSink {
    async fn invoice_paid(&self, id: InvoiceId, tx_ref: &TxRef) -> Result<(), StoreError> {
        self.effects
            .lock()
            .unwrap()
            .push(RecordedEffect::InvoicePaid(id, tx_ref.clone()));
        Ok(())
    }

    async fn invoice_failed(&self, id: InvoiceId, tx_ref: &TxRef) -> Result<(), StoreError> {
        self.effects
            .lock()
            .unwrap()
            .push(RecordedEffect::InvoiceFailed(id, tx_ref.clone()));
        Ok(())
    }

    async fn refund_reversed(&self, id: InvoiceId, tx_ref: &TxRef) -> Result<(), StoreError> {
        self.effects
            .lock()
            .unwrap()
            .push(RecordedEffect::RefundReversed(id, tx_ref.clone()));
        Ok(())
    }
}
