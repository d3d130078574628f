//! Payment coordination.
//!
//! The outward face of the core: answers "has this invoice been paid" and
//! turns admitted webhook events into exactly one platform effect each.
//! Persistence stays behind the store ports.

use std::sync::Arc;

use tracing::{info, instrument};

use checkout_types::{
    Admission, AppliedEffect, CoordinatorError, Currency, EffectSink, Invoice, InvoiceId,
    InvoiceStore, LedgerClient, PolicyTable, PriceQuote, RateSource, StoreError, TxRef, TxStatus,
    ValidationOutcome, VerifyError, WebhookEvent, WebhookEventType,
};

use crate::config::VerifyConfig;
use crate::oracle::PriceOracle;
use crate::validator::TransactionValidator;
use crate::webhook::WebhookAuthenticator;

/// Orchestrates validation, pricing, and webhook effects.
///
/// Generic over the four ports; adapters are injected at compile time.
pub struct PaymentCoordinator<L, S, St, E>
where
    L: LedgerClient,
    S: RateSource,
    St: InvoiceStore,
    E: EffectSink,
{
    validator: TransactionValidator<L>,
    oracle: PriceOracle<S>,
    authenticator: WebhookAuthenticator,
    store: St,
    sink: E,
}

impl<L, S, St, E> PaymentCoordinator<L, S, St, E>
where
    L: LedgerClient,
    S: RateSource,
    St: InvoiceStore,
    E: EffectSink,
{
    /// Wires the components from one configuration and policy table.
    pub fn new(
        config: &VerifyConfig,
        policies: Arc<PolicyTable>,
        ledger: L,
        rates: S,
        store: St,
        sink: E,
    ) -> Self {
        Self {
            validator: TransactionValidator::new(
                ledger,
                policies,
                config.network_mode,
                config.call_timeout,
            ),
            oracle: PriceOracle::new(rates, config.rate_ttl, config.call_timeout),
            authenticator: WebhookAuthenticator::new(
                config.webhook_secret.clone(),
                config.dedup_retention,
            ),
            store,
            sink,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transaction validation surface
    // ─────────────────────────────────────────────────────────────────────────────

    /// Validates a claimed transaction arriving from a platform adapter.
    pub async fn validate_transaction(
        &self,
        currency_code: &str,
        tx_ref: &TxRef,
        address: &str,
        amount: f64,
    ) -> Result<ValidationOutcome, VerifyError> {
        let record = self
            .validator
            .validate_claim(currency_code, tx_ref, address, amount)
            .await?;
        Ok(ValidationOutcome::from(&record))
    }

    /// True iff the invoice's claimed transaction is Confirmed.
    ///
    /// An invoice with no claimed transaction is simply unpaid.
    pub async fn is_invoice_paid(&self, invoice: &Invoice) -> Result<bool, VerifyError> {
        let Some(tx_ref) = &invoice.tx_ref else {
            return Ok(false);
        };
        let record = self
            .validator
            .validate(tx_ref, &invoice.address, invoice.amount)
            .await?;
        Ok(record.status == TxStatus::Confirmed)
    }

    /// Resolves the invoice through the store, then checks payment.
    pub async fn is_invoice_paid_by_id(&self, id: InvoiceId) -> Result<bool, CoordinatorError> {
        let invoice = self
            .store
            .invoice(id)
            .await?
            .ok_or(StoreError::InvoiceNotFound(id))?;
        Ok(self.is_invoice_paid(&invoice).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Pricing surface
    // ─────────────────────────────────────────────────────────────────────────────

    pub async fn current_price(&self, currency: Currency) -> Result<PriceQuote, VerifyError> {
        self.oracle.current_rate(currency).await
    }

    pub fn is_rate_fresh(&self, currency: Currency) -> bool {
        self.oracle.is_fresh(currency)
    }

    pub async fn convert_amount(
        &self,
        amount: f64,
        currency: Currency,
        to_fiat: bool,
    ) -> Result<f64, VerifyError> {
        self.oracle.convert(amount, currency, to_fiat).await
    }

    pub fn format_amount(&self, amount: f64, currency: Currency) -> String {
        self.oracle.format_amount(amount, currency)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Webhook surface
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn verify_webhook_signature(&self, signature: &str, raw_payload: &[u8]) -> bool {
        self.authenticator.verify_signature(signature, raw_payload)
    }

    /// Applies the effect of a verified webhook event.
    ///
    /// Admission gates the call: a rejected signature surfaces
    /// `SignatureInvalid`, a replayed event `DuplicateEvent` (adapters
    /// acknowledge duplicates without retrying). Exactly one effect is
    /// signaled per admitted event.
    #[instrument(skip_all, fields(event_type = %event.event_type, invoice = %event.invoice_id))]
    pub async fn apply_webhook(
        &self,
        event: &WebhookEvent,
    ) -> Result<AppliedEffect, CoordinatorError> {
        match self.authenticator.admit(event) {
            Admission::Rejected => Err(VerifyError::SignatureInvalid.into()),
            Admission::Duplicate => Err(VerifyError::DuplicateEvent.into()),
            Admission::Admitted => {
                let effect = match event.event_type {
                    WebhookEventType::PaymentSucceeded => {
                        self.sink
                            .invoice_paid(event.invoice_id, &event.tx_ref)
                            .await?;
                        AppliedEffect::InvoicePaid
                    }
                    WebhookEventType::PaymentFailed => {
                        self.sink
                            .invoice_failed(event.invoice_id, &event.tx_ref)
                            .await?;
                        AppliedEffect::InvoiceFailed
                    }
                    WebhookEventType::RefundSucceeded => {
                        self.sink
                            .refund_reversed(event.invoice_id, &event.tx_ref)
                            .await?;
                        AppliedEffect::RefundReversed
                    }
                };
                info!(?effect, "webhook effect applied");
                Ok(effect)
            }
        }
    }
}
