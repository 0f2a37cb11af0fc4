use serde::{Deserialize, Serialize};
use taqqafi_core::{ContentHash, CurrencyCode, Direction};

/// Normalized output of the SMS pipeline (bank-agnostic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    /// Always positive.
    pub amount: f64,
    pub currency: CurrencyCode,
    /// 2..=50 characters, or `"Unknown"`.
    pub merchant: String,
    pub direction: Direction,
    /// Original message, verbatim.
    pub raw_text: String,
    pub content_hash: ContentHash,
}

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "transaction", rename_all = "snake_case")]
pub enum SmsOutcome {
    /// Rejected by the gate: not a bank message. Ignore it.
    NotFinancial,
    /// Looked financial, but no usable amount was found.
    Unparseable,
    Parsed(ParsedTransaction),
}

impl SmsOutcome {
    pub fn transaction(&self) -> Option<&ParsedTransaction> {
        match self {
            SmsOutcome::Parsed(tx) => Some(tx),
            _ => None,
        }
    }

    pub fn into_transaction(self) -> Option<ParsedTransaction> {
        match self {
            SmsOutcome::Parsed(tx) => Some(tx),
            _ => None,
        }
    }
}

/// One raw message as delivered by the device or a relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundSms {
    pub sender: String,
    pub body: String,
}

impl InboundSms {
    pub fn new(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
        }
    }
}
