//! Per-currency payment policy: amount bounds, address format, and the
//! confirmation depth required before a payment counts as settled.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::currency::Currency;

/// Which chain network payments are verified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
    #[default]
    Main,
    Test,
}

impl std::fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkMode::Main => write!(f, "main"),
            NetworkMode::Test => write!(f, "test"),
        }
    }
}

impl std::str::FromStr for NetworkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main" | "mainnet" => Ok(NetworkMode::Main),
            "test" | "testnet" => Ok(NetworkMode::Test),
            _ => Err(format!("Unknown network mode: {}", s)),
        }
    }
}

/// Required confirmation counts per network mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmations {
    pub main: u32,
    pub test: u32,
}

impl Confirmations {
    pub fn for_mode(&self, mode: NetworkMode) -> u32 {
        match mode {
            NetworkMode::Main => self.main,
            NetworkMode::Test => self.test,
        }
    }
}

/// Static policy for one supported currency.
///
/// Created at process start, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct CurrencyPolicy {
    pub currency: Currency,
    /// Smallest transactable amount, in smallest units.
    pub min_units: i64,
    /// Largest transactable amount, in smallest units.
    pub max_units: i64,
    /// Required confirmations before a transaction is Confirmed.
    pub confirmations: Confirmations,
    address_pattern: Regex,
}

impl CurrencyPolicy {
    /// True iff the address matches this currency's format rule.
    pub fn matches_address(&self, address: &str) -> bool {
        self.address_pattern.is_match(address)
    }

    /// True iff the amount is within the transactable bounds.
    pub fn amount_in_range(&self, amount: Amount) -> bool {
        amount.units() >= self.min_units && amount.units() <= self.max_units
    }

    pub fn min_amount(&self) -> Amount {
        Amount::from_units(self.min_units, self.currency)
    }

    pub fn max_amount(&self) -> Amount {
        Amount::from_units(self.max_units, self.currency)
    }

    fn new(
        currency: Currency,
        min_units: i64,
        max_units: i64,
        confirmations: Confirmations,
        address_pattern: &str,
    ) -> Self {
        Self {
            currency,
            min_units,
            max_units,
            confirmations,
            address_pattern: Regex::new(address_pattern).expect("static address pattern"),
        }
    }
}

/// Total policy table over the closed currency set.
///
/// Lookups cannot fail: unknown currency codes are rejected earlier, at the
/// `Currency` parse boundary.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    policies: [CurrencyPolicy; 4],
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self {
            policies: [
                // Nimiq: IBAN-style base32, 1-minute blocks.
                CurrencyPolicy::new(
                    Currency::NIM,
                    1,                        // 0.00001 NIM
                    1_000_000_000_000_000,    // 10 billion NIM
                    Confirmations { main: 10, test: 2 },
                    r"^NQ[0-9]{2}( ?[0-9A-HJ-NP-VXY]{4}){8}$",
                ),
                // Bitcoin: legacy base58 or bech32, dust limit as floor.
                CurrencyPolicy::new(
                    Currency::BTC,
                    546,                      // 0.00000546 BTC
                    2_100_000_000_000_000,    // 21 million BTC
                    Confirmations { main: 3, test: 1 },
                    r"^(bc1[02-9ac-hj-np-z]{8,87}|tb1[02-9ac-hj-np-z]{8,87}|[13][a-km-zA-HJ-NP-Z1-9]{25,34})$",
                ),
                // USDC on Ethereum.
                CurrencyPolicy::new(
                    Currency::USDC,
                    10_000,                   // 0.01 USDC
                    1_000_000_000_000_000,    // 1 billion USDC
                    Confirmations { main: 12, test: 3 },
                    r"^0x[0-9a-fA-F]{40}$",
                ),
                // TerraUSD: bech32 with fixed hrp, instant finality.
                CurrencyPolicy::new(
                    Currency::UST,
                    10_000,                   // 0.01 UST
                    1_000_000_000_000_000,    // 1 billion UST
                    Confirmations { main: 1, test: 1 },
                    r"^terra1[02-9ac-hj-np-z]{38}$",
                ),
            ],
        }
    }
}

impl PolicyTable {
    /// Returns the policy for a supported currency. Total by construction.
    pub fn policy(&self, currency: Currency) -> &CurrencyPolicy {
        &self.policies[currency.index()]
    }

    /// Overrides the required confirmation counts for one currency.
    ///
    /// Deployments disagree on confirmation depth (merchant risk appetite,
    /// chain reorg behavior), so the requirement is configuration, not a
    /// constant.
    pub fn with_required_confirmations(mut self, currency: Currency, confirmations: Confirmations) -> Self {
        self.policies[currency.index()].confirmations = confirmations;
        self
    }

    /// Overrides the transactable amount bounds for one currency,
    /// expressed in smallest units.
    pub fn with_amount_bounds(mut self, currency: Currency, min_units: i64, max_units: i64) -> Self {
        let policy = &mut self.policies[currency.index()];
        policy.min_units = min_units;
        policy.max_units = max_units;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_btc_bech32_address_valid() {
        let table = PolicyTable::default();
        assert!(
            table
                .policy(Currency::BTC)
                .matches_address("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq")
        );
    }

    #[test]
    fn test_btc_legacy_address_valid() {
        let table = PolicyTable::default();
        assert!(
            table
                .policy(Currency::BTC)
                .matches_address("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2")
        );
    }

    #[test]
    fn test_btc_address_invalid() {
        let table = PolicyTable::default();
        let policy = table.policy(Currency::BTC);
        assert!(!policy.matches_address("bc1qar0"));
        assert!(!policy.matches_address("0x52908400098527886E0F7030069857D2E4169EE7"));
        assert!(!policy.matches_address(""));
    }

    #[test]
    fn test_nim_address() {
        let table = PolicyTable::default();
        let policy = table.policy(Currency::NIM);
        assert!(policy.matches_address("NQ07 0000 0000 0000 0000 0000 0000 0000 0000"));
        assert!(policy.matches_address(&format!("NQ07{}", "0".repeat(32))));
        assert!(!policy.matches_address("NQ07 0000"));
        // O and W are not in the Nimiq alphabet
        assert!(!policy.matches_address("NQ07 OOOO 0000 0000 0000 0000 0000 0000 0000"));
    }

    #[test]
    fn test_usdc_address() {
        let table = PolicyTable::default();
        let policy = table.policy(Currency::USDC);
        assert!(policy.matches_address("0x52908400098527886E0F7030069857D2E4169EE7"));
        assert!(!policy.matches_address("52908400098527886E0F7030069857D2E4169EE7"));
    }

    #[test]
    fn test_ust_address() {
        let table = PolicyTable::default();
        let policy = table.policy(Currency::UST);
        assert!(policy.matches_address("terra1x46rqay4d3cssq8gxxvqz8xt6nwlz4td20k38v"));
        assert!(!policy.matches_address("cosmos1x46rqay4d3cssq8gxxvqz8xt6nwlz4td20k38v"));
    }

    #[test]
    fn test_amount_bounds() {
        let table = PolicyTable::default();
        let policy = table.policy(Currency::BTC);
        assert!(policy.amount_in_range(Amount::from_units(123_456, Currency::BTC)));
        assert!(!policy.amount_in_range(Amount::from_units(100, Currency::BTC)));
        assert!(!policy.amount_in_range(Amount::from_units(-1, Currency::BTC)));
    }

    #[test]
    fn test_confirmation_override() {
        let table = PolicyTable::default()
            .with_required_confirmations(Currency::BTC, Confirmations { main: 2, test: 1 });
        assert_eq!(
            table
                .policy(Currency::BTC)
                .confirmations
                .for_mode(NetworkMode::Main),
            2
        );
        // other currencies untouched
        assert_eq!(
            table
                .policy(Currency::USDC)
                .confirmations
                .for_mode(NetworkMode::Main),
            12
        );
    }

    #[test]
    fn test_network_mode_parse() {
        assert_eq!("mainnet".parse::<NetworkMode>().unwrap(), NetworkMode::Main);
        assert_eq!("test".parse::<NetworkMode>().unwrap(), NetworkMode::Test);
        assert!("regtest".parse::<NetworkMode>().is_err());
    }
}
