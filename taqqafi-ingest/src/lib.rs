//! taqqafi-ingest: bank SMS extraction pipeline (gate, normalizer, amount,
//! currency, direction, merchant, content hash).

pub mod amount;
pub mod direction;
pub mod gate;
pub mod hash;
pub mod merchant;
pub mod normalize;
pub mod sms;
pub mod types;

pub use amount::extract_amount;
pub use direction::classify_direction;
pub use gate::is_financial;
pub use hash::{compute_hash, is_processed, mark_processed};
pub use merchant::{extract_merchant, UNKNOWN_MERCHANT};
pub use sms::{parse_sms, ParserConfig, SmsParser};
pub use types::{InboundSms, ParsedTransaction, SmsOutcome};
