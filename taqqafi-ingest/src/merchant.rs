//! Merchant / payee extraction.
//!
//! Families are tried in order against the flattened (not normalized) text.
//! The first family whose capture is 2..=50 characters after cleanup wins.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::normalize::NormalizedText;

pub const UNKNOWN_MERCHANT: &str = "Unknown";

const MIN_LEN: usize = 2;
const MAX_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MerchantFamilyId {
    /// `من: STARBUCKS`
    ArabicFromLabel,
    /// `من NOON في ...`
    ArabicFromName,
    /// `at IKEA on ...`, `from UBER and ...`, `@ Jarir ref ...`
    EnglishAtFrom,
    /// `لدى مطعم البيك.`
    ArabicAt,
    /// `Merchant: Amazon.sa. Date ...`
    MerchantLabel,
    /// `payment to Starbucks Coffee was ...`
    PaymentTo,
    /// `POS: LULU HYPER`, `مشتريات: ...`
    PointOfSale,
}

static FAMILIES: Lazy<Vec<(MerchantFamilyId, Regex)>> = Lazy::new(|| {
    let build = |pattern: &str| Regex::new(pattern).expect("merchant pattern");
    use MerchantFamilyId::*;
    vec![
        (ArabicFromLabel, build(r"\bمن\s*:\s*(.{2,40})$")),
        (
            ArabicFromName,
            build(r"(?i)\bمن\s+([A-Za-z0-9*.\-\s&']+?)(?:\s+في\b|\s+بتاريخ|$)"),
        ),
        (
            EnglishAtFrom,
            build(r"(?i)(?:\bat|\bfrom|@)\s+([A-Za-z0-9\s\-&'.*]+?)(?:\s+on\b|\s+dated?\b|\s+\d|\s+ref\b|\s+and\b|$)"),
        ),
        (
            ArabicAt,
            build(r"\bلدى\s+([\x{0600}-\x{06FF}\s]+?)(?:\s+بتاريخ|\s+الرصيد|\.\s|$)"),
        ),
        (
            MerchantLabel,
            build(r"(?i)\bmerchant\s*:\s*([A-Za-z0-9\s\-&'.]+?)(?:\s*\.\s+|\s+date\b|\s+ref\b|$)"),
        ),
        (
            PaymentTo,
            build(r"(?i)\b(?:payment\s+to|to)\s+([A-Za-z0-9\s\-&'.]+?)(?:\s+on\b|\s+ref\b|\s+was\b|$)"),
        ),
        (
            PointOfSale,
            build(r"(?i)(?:\bPOS|\bpurchase|مشتريات)\s*:?\s*([A-Za-z0-9\s\-&'.]{2,30})"),
        ),
    ]
});

static PENDING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\*\s*PENDING\b.*").expect("pending marker"));

/// Trim, collapse inner whitespace, and drop a trailing `* PENDING ...` marker.
fn clean_capture(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    PENDING_MARKER.replace(&collapsed, "").trim().to_string()
}

/// Title-case tokens that start with a Latin letter; leave everything else as is.
pub fn title_case_latin(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) if first.is_ascii_alphabetic() => {
                    let mut out = first.to_ascii_uppercase().to_string();
                    out.push_str(&chars.as_str().to_lowercase());
                    out
                }
                _ => word.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Winning family and its cleaned capture, before casing.
pub fn match_merchant(text: &NormalizedText) -> Option<(MerchantFamilyId, String)> {
    FAMILIES.iter().find_map(|(id, re)| {
        let caps = re.captures(&text.flat)?;
        let candidate = clean_capture(caps.get(1)?.as_str());
        let len = candidate.chars().count();
        if (MIN_LEN..=MAX_LEN).contains(&len) {
            Some((*id, candidate))
        } else {
            trace!(family = ?id, len, "merchant capture out of range");
            None
        }
    })
}

pub fn extract_merchant_normalized(text: &NormalizedText) -> String {
    match_merchant(text)
        .map(|(_, name)| title_case_latin(&name))
        .unwrap_or_else(|| UNKNOWN_MERCHANT.to_string())
}

/// Merchant name in `text`, or `"Unknown"`.
pub fn extract_merchant(text: &str) -> String {
    extract_merchant_normalized(&NormalizedText::new(text))
}
