//! The SMS pipeline: gate → normalize → amount → currency → direction → merchant → hash.

use serde::{Deserialize, Serialize};
use taqqafi_core::{detect_currency, CurrencyCode};
use tracing::debug;

use crate::amount::extract_amount_normalized;
use crate::direction::classify_direction_normalized;
use crate::gate::matched_signal;
use crate::hash::compute_hash;
use crate::merchant::extract_merchant_normalized;
use crate::normalize::NormalizedText;
use crate::types::{ParsedTransaction, SmsOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Used when the message names no currency.
    #[serde(default)]
    pub default_currency: CurrencyCode,
}

/// Stateless parser; safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmsParser {
    config: ParserConfig,
}

impl SmsParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn with_default_currency(currency: CurrencyCode) -> Self {
        Self::new(ParserConfig {
            default_currency: currency,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn is_financial(&self, body: &str) -> bool {
        crate::gate::is_financial(body)
    }

    /// Parse one message. `sender` is carried for tracing only; it never
    /// influences the result.
    pub fn parse(&self, body: &str, sender: &str) -> SmsOutcome {
        let text = NormalizedText::new(body);

        let Some(signal) = matched_signal(&text) else {
            debug!(sender, "not a financial message");
            return SmsOutcome::NotFinancial;
        };

        let Some(amount) = extract_amount_normalized(&text) else {
            debug!(sender, ?signal, "financial message without a usable amount");
            return SmsOutcome::Unparseable;
        };

        let currency = detect_currency(&text.flat).unwrap_or(self.config.default_currency);
        let direction = classify_direction_normalized(&text);
        let merchant = extract_merchant_normalized(&text);

        debug!(
            sender,
            amount = amount.amount,
            family = ?amount.family,
            %currency,
            %direction,
            merchant = merchant.as_str(),
            "parsed transaction"
        );

        SmsOutcome::Parsed(ParsedTransaction {
            amount: amount.amount,
            currency,
            merchant,
            direction,
            raw_text: body.to_string(),
            content_hash: compute_hash(body),
        })
    }
}

/// Parse with the default configuration.
pub fn parse_sms(body: &str) -> SmsOutcome {
    SmsParser::default().parse(body, "")
}
