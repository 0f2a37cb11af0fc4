//! taqqafi-core: currency catalog, exchange rates, and the record types shared
//! by the SMS pipeline and the review inbox

pub mod currency;
pub mod finance;
pub mod rates;

pub use currency::{detect_currency, CurrencyCode, CurrencyInfo, UnknownCurrency, CURRENCIES};
pub use finance::{Category, ContentHash, Direction, PendingTransaction, Transaction, UnknownCategory};
pub use rates::{RateTable, StaticRates};
