//! Exchange-rate lookup by currency code.
//!
//! Rates are expressed as units of the currency per one US dollar. The
//! bundled table is static; callers with live rates implement [`RateTable`].

use crate::currency::CurrencyCode;

pub trait RateTable {
    /// Units of `code` per one USD.
    fn units_per_usd(&self, code: CurrencyCode) -> f64;

    /// Multiplier that converts an amount in `from` into `to`.
    fn exchange_rate(&self, from: CurrencyCode, to: CurrencyCode) -> f64 {
        if from == to {
            return 1.0;
        }
        self.units_per_usd(to) / self.units_per_usd(from)
    }

    fn convert(&self, amount: f64, from: CurrencyCode, to: CurrencyCode) -> f64 {
        if from == to {
            return amount;
        }
        amount * self.exchange_rate(from, to)
    }
}

/// Built-in reference rates.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRates;

impl RateTable for StaticRates {
    fn units_per_usd(&self, code: CurrencyCode) -> f64 {
        match code {
            CurrencyCode::Usd => 1.0,
            CurrencyCode::Sar => 3.75,
            CurrencyCode::Aed => 3.67,
            CurrencyCode::Jod => 0.709,
            CurrencyCode::Bhd => 0.376,
            CurrencyCode::Kwd => 0.307,
            CurrencyCode::Omr => 0.385,
            CurrencyCode::Qar => 3.64,
            CurrencyCode::Egp => 49.5,
            CurrencyCode::Mad => 9.85,
            CurrencyCode::Tnd => 3.12,
            CurrencyCode::Lbp => 89500.0,
            CurrencyCode::Iqd => 1310.0,
            CurrencyCode::Sdg => 601.0,
            CurrencyCode::Lyd => 4.85,
            CurrencyCode::Syp => 13000.0,
            CurrencyCode::Yer => 250.0,
            CurrencyCode::Dzd => 134.5,
            CurrencyCode::Eur => 0.92,
            CurrencyCode::Gbp => 0.79,
            CurrencyCode::Try => 32.5,
        }
    }
}
