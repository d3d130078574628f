//! Address format validation.
//!
//! Pure and deterministic: driven entirely by the currency policy's
//! compiled pattern, no network calls.

use std::sync::Arc;

use checkout_types::{Currency, PolicyTable};

/// Validates payee addresses against each currency's format rule.
#[derive(Debug, Clone)]
pub struct AddressValidator {
    policies: Arc<PolicyTable>,
}

impl AddressValidator {
    pub fn new(policies: Arc<PolicyTable>) -> Self {
        Self { policies }
    }

    /// True iff `address` matches the format rule for `currency`.
    pub fn is_valid(&self, currency: Currency, address: &str) -> bool {
        self.policies.policy(currency).matches_address(address)
    }
}
