//! Pure domain types for payment verification.

mod amount;
mod currency;
mod invoice;
mod policy;
mod transaction;
mod webhook;

pub use amount::Amount;
pub use currency::Currency;
pub use invoice::{Invoice, InvoiceId};
pub use policy::{Confirmations, CurrencyPolicy, NetworkMode, PolicyTable};
pub use transaction::{TransactionRecord, TxRef, TxStatus};
pub use webhook::{EventKey, WebhookEvent, WebhookEventType};
