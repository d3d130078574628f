//! Transaction validation: the confirmation state machine.
//!
//! A claimed payment passes through policy lookup, address check, amount
//! bounds, and a ledger confirmation read. Records are tracked per
//! (currency, transaction reference) so status only ever moves forward.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::{debug, instrument};

use checkout_types::{
    Amount, Currency, LedgerClient, LedgerError, NetworkMode, PolicyTable, TransactionRecord,
    TxObservation, TxRef, VerifyError,
};

use crate::address::AddressValidator;

/// Validates claimed transactions against policy and ledger state.
pub struct TransactionValidator<L: LedgerClient> {
    ledger: L,
    policies: Arc<PolicyTable>,
    addresses: AddressValidator,
    mode: NetworkMode,
    call_timeout: Duration,
    records: DashMap<(Currency, TxRef), TransactionRecord>,
}

impl<L: LedgerClient> TransactionValidator<L> {
    pub fn new(
        ledger: L,
        policies: Arc<PolicyTable>,
        mode: NetworkMode,
        call_timeout: Duration,
    ) -> Self {
        let addresses = AddressValidator::new(policies.clone());
        Self {
            ledger,
            policies,
            addresses,
            mode,
            call_timeout,
            records: DashMap::new(),
        }
    }

    /// Adapter-facing entry: the currency arrives as a wire code and the
    /// amount in display units. Unknown codes fail `UnsupportedCurrency`
    /// before any address or amount check runs.
    pub async fn validate_claim(
        &self,
        currency_code: &str,
        tx_ref: &TxRef,
        address: &str,
        amount: f64,
    ) -> Result<TransactionRecord, VerifyError> {
        let currency = Currency::from_str(currency_code)?;
        self.validate(tx_ref, address, Amount::from_display(amount, currency))
            .await
    }

    /// Validates a claimed transaction and folds the ledger observation
    /// into the tracked record.
    ///
    /// Idempotent for unchanged ledger state: the only side effect is the
    /// record upsert, and that is monotonic.
    #[instrument(skip_all, fields(currency = %amount.currency(), tx_ref = %tx_ref))]
    pub async fn validate(
        &self,
        tx_ref: &TxRef,
        address: &str,
        amount: Amount,
    ) -> Result<TransactionRecord, VerifyError> {
        let currency = amount.currency();
        let policy = self.policies.policy(currency);

        if !self.addresses.is_valid(currency, address) {
            return Err(VerifyError::InvalidAddress {
                currency,
                address: address.to_string(),
            });
        }

        if !policy.amount_in_range(amount) {
            return Err(VerifyError::AmountOutOfRange {
                currency,
                amount,
                min: policy.min_amount(),
                max: policy.max_amount(),
            });
        }

        let observation = self.observe_ledger(currency, tx_ref).await?;
        let required = policy.confirmations.for_mode(self.mode);

        // Entry locking serializes concurrent validations of the same
        // transaction reference.
        let mut entry = self
            .records
            .entry((currency, tx_ref.clone()))
            .or_insert_with(|| {
                TransactionRecord::pending(currency, tx_ref.clone(), address, amount, required)
            });
        entry.observe(observation.confirmations, observation.is_valid());
        let record = entry.value().clone();
        drop(entry);

        debug!(status = %record.status, confirmations = record.confirmations, "validated transaction");
        Ok(record)
    }

    async fn observe_ledger(
        &self,
        currency: Currency,
        tx_ref: &TxRef,
    ) -> Result<TxObservation, VerifyError> {
        match tokio::time::timeout(
            self.call_timeout,
            self.ledger.confirmations_for(currency, tx_ref),
        )
        .await
        {
            Ok(Ok(observation)) => Ok(observation),
            // Not yet propagated to the ledger: pending with zero
            // confirmations, not an error and not a rejection.
            Ok(Err(LedgerError::UnknownTransaction(_))) => Ok(TxObservation::valid(0)),
            Ok(Err(source)) => Err(VerifyError::LedgerUnavailable { currency, source }),
            Err(_) => Err(VerifyError::LedgerUnavailable {
                currency,
                source: LedgerError::Timeout,
            }),
        }
    }
}
