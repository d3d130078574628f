//! Invoice persistence and effect-sink ports.
//!
//! The coordinator decides which effect a verified event warrants; the
//! platform adapter owning these traits performs the actual persistence.

use crate::domain::{Invoice, InvoiceId, TxRef};

/// Error type for platform persistence calls.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Read access to invoices owned by the storefront platform.
#[async_trait::async_trait]
pub trait InvoiceStore: Send + Sync + 'static {
    async fn invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError>;
}

/// Receives the single effect warranted by an admitted webhook event.
#[async_trait::async_trait]
pub trait EffectSink: Send + Sync + 'static {
    /// The invoice's payment settled.
    async fn invoice_paid(&self, id: InvoiceId, tx_ref: &TxRef) -> Result<(), StoreError>;

    /// The payment attempt failed; the invoice stays payable.
    async fn invoice_failed(&self, id: InvoiceId, tx_ref: &TxRef) -> Result<(), StoreError>;

    /// A refund settled; reverse the invoice's paid state.
    async fn refund_reversed(&self, id: InvoiceId, tx_ref: &TxRef) -> Result<(), StoreError>;
}
