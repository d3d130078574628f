//! Supported cryptocurrencies and their static metadata.

use serde::{Deserialize, Serialize};

use crate::error::VerifyError;

/// Cryptocurrencies accepted at checkout.
///
/// This is a closed set: adding a currency means adding a variant and its
/// policy row, so there is no "unknown key" failure mode past the parse
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    NIM,
    BTC,
    USDC,
    UST,
}

impl Currency {
    /// Returns the number of display decimal places for this currency.
    pub fn decimals(&self) -> u32 {
        match self {
            Currency::NIM => 5,
            Currency::BTC => 8,
            Currency::USDC | Currency::UST => 6,
        }
    }

    /// Smallest-unit multiplier: how many base units make one display unit.
    pub fn unit_multiplier(&self) -> i64 {
        10i64.pow(self.decimals())
    }

    /// Name of the indivisible base denomination.
    pub fn smallest_unit(&self) -> &'static str {
        match self {
            Currency::NIM => "luna",
            Currency::BTC => "satoshi",
            Currency::USDC => "micro-USDC",
            Currency::UST => "uusd",
        }
    }

    /// Ticker code as it appears on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::NIM => "NIM",
            Currency::BTC => "BTC",
            Currency::USDC => "USDC",
            Currency::UST => "UST",
        }
    }

    /// All supported currencies.
    pub fn all() -> &'static [Currency] {
        &[Currency::NIM, Currency::BTC, Currency::USDC, Currency::UST]
    }

    /// Position in the closed set, used for total policy-table indexing.
    pub(crate) fn index(&self) -> usize {
        match self {
            Currency::NIM => 0,
            Currency::BTC => 1,
            Currency::USDC => 2,
            Currency::UST => 3,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NIM" => Ok(Currency::NIM),
            "BTC" => Ok(Currency::BTC),
            "USDC" => Ok(Currency::USDC),
            "UST" => Ok(Currency::UST),
            _ => Err(VerifyError::UnsupportedCurrency(s.to_string())),
        }
    }
}
