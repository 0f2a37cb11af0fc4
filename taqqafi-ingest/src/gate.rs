//! Financial-message gate: does this text look like a bank notification at all?
//!
//! Any single signal family is enough to pass. Messages that pass but carry
//! no usable amount are reported as unparseable further down the pipeline.

use once_cell::sync::Lazy;
use regex::Regex;
use taqqafi_core::currency::{arabic_symbols, latin_keywords};

use crate::normalize::{alternation, NormalizedText};

/// Which family of signal words fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    CurrencyCode,
    CurrencySymbol,
    CurrencyName,
    EnglishVerb,
    ArabicVerb,
    CardMarker,
    BalanceMarker,
}

const CURRENCY_NAMES: &[&str] = &["ريال", "درهم", "جنيه", "دينار", "ليرة", "ليره"];

const ENGLISH_VERBS: &[&str] = &[
    "debit", "credit", "deducted", "charged", "payment", "transfer", "purchase", "amount",
];

const ARABIC_VERBS: &[&str] = &[
    "مدين", "دائن", "خصم", "إيداع", "حوالة", "تحويل", "شراء", "دفع", "سداد", "مبلغ", "بقيمة",
    "بمبلغ", "تسديد", "سحب",
];

const CARD_MARKERS: &[&str] = &["mada", "card", "بطاقة", "مدى"];

const BALANCE_MARKERS: &[&str] = &["balance", "رصيد"];

static SIGNALS: Lazy<Vec<(Signal, Regex)>> = Lazy::new(|| {
    let build = |pattern: String| Regex::new(&pattern).expect("gate pattern");
    vec![
        (
            Signal::CurrencyCode,
            build(format!(r"(?i)\b(?:{})\b", alternation(latin_keywords()))),
        ),
        (Signal::CurrencySymbol, build(alternation(arabic_symbols()))),
        (
            Signal::CurrencyName,
            build(alternation(CURRENCY_NAMES.iter().copied())),
        ),
        (
            Signal::EnglishVerb,
            build(format!("(?i){}", alternation(ENGLISH_VERBS.iter().copied()))),
        ),
        (Signal::ArabicVerb, build(alternation(ARABIC_VERBS.iter().copied()))),
        (
            Signal::CardMarker,
            build(format!("(?i){}", alternation(CARD_MARKERS.iter().copied()))),
        ),
        (
            Signal::BalanceMarker,
            build(format!("(?i){}", alternation(BALANCE_MARKERS.iter().copied()))),
        ),
    ]
});

/// First signal family that matches the normalized text.
pub fn matched_signal(text: &NormalizedText) -> Option<Signal> {
    SIGNALS
        .iter()
        .find(|(_, re)| re.is_match(&text.normalized))
        .map(|(signal, _)| *signal)
}

pub fn is_financial_normalized(text: &NormalizedText) -> bool {
    matched_signal(text).is_some()
}

/// Does `text` look like a bank transaction notification?
pub fn is_financial(text: &str) -> bool {
    is_financial_normalized(&NormalizedText::new(text))
}
