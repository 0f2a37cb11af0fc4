//! Transaction amount extraction.
//!
//! Pattern families are tried in a fixed priority order. The first family
//! whose pattern matches anywhere in the message is the only one consulted:
//! its candidates are scanned left to right and the first one that parses
//! as a positive number and is not sitting right after a balance keyword
//! wins. If every candidate of that family is rejected the message is
//! rejected too; lower-priority families are never used as a fallback.

use once_cell::sync::Lazy;
use regex::Regex;
use taqqafi_core::currency::{arabic_symbols, latin_keywords};
use tracing::{debug, trace};

use crate::normalize::{alternation, westernize_digits, NormalizedText};

/// Characters of text inspected before a candidate for a balance keyword.
pub const BALANCE_LOOKBACK_CHARS: usize = 40;

pub const BALANCE_KEYWORDS: &[&str] = &[
    "balance",
    "available balance",
    "remaining balance",
    "current balance",
    "الرصيد",
    "الرصيد المتوفر",
    "الرصيد المتبقي",
    "رصيدك",
    "رصيد",
];

/// Pattern families in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountFamilyId {
    /// `amount of 18.44`, `with amount 18.44`
    EnglishAmountPhrase,
    /// `بقيمة 1.0`, `مبلغ 350`
    ArabicAmountWord,
    /// `المبلغ: 500`, `المبلغ: ريال 500`
    ArabicAmountLabel,
    /// `ريال سعودي 50`
    RiyalBeforeNumber,
    /// `دينار اردني 12.5`, `درهم 40`
    ArabicCurrencyBeforeNumber,
    /// `12.5 دينار`
    NumberBeforeArabicCurrency,
    /// `SAR 1,250.00`
    CodeBeforeNumber,
    /// `1,250.00 SAR`
    NumberBeforeCode,
    /// `ر.س 350`
    SymbolBeforeNumber,
    /// `350 ر.س`
    NumberBeforeSymbol,
    /// `ريال ١٨٫٤٤`
    CurrencyBeforeIndicNumber,
    /// `١٨٫٤٤ ريال`
    IndicNumberBeforeCurrency,
}

/// Which view of the message a family runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Digits {
    /// ASCII digits, after Arabic-Indic conversion.
    Western,
    /// Arabic-Indic digits left in place; captures are converted afterwards.
    ArabicIndic,
}

struct AmountFamily {
    id: AmountFamilyId,
    digits: Digits,
    pattern: Regex,
}

/// Result of scanning a single family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FamilyScan {
    /// Pattern did not match anywhere.
    NoMatch,
    /// First accepted candidate.
    Amount(f64),
    /// Pattern matched, but every candidate was invalid or next to a balance keyword.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountMatch {
    pub amount: f64,
    pub family: AmountFamilyId,
}

const NUMBER: &str = r"([0-9][0-9,]*(?:\.[0-9]+)?)";
const INDIC_NUMBER: &str = r"([\x{0660}-\x{0669}][\x{0660}-\x{0669},\x{066C}]*(?:[.\x{066B}][\x{0660}-\x{0669}]+)?)";
const ARABIC_WORD: &str = r"[\x{0600}-\x{06FF}]+";

static FAMILIES: Lazy<Vec<AmountFamily>> = Lazy::new(|| {
    let codes = alternation(latin_keywords());
    let symbols = alternation(arabic_symbols());
    let names = alternation(["دينار", "ريال", "درهم", "جنيه", "ليرة"]);
    let riyals = alternation([
        "ريال سعودي",
        "ريال عماني",
        "ريال قطري",
        "ريال يمني",
        "ريال",
    ]);
    let other_names = alternation(["درهم", "جنيه", "دينار", "ليرة"]);
    let indic_markers = alternation(["ريال", "ر.س", "درهم", "جنيه", "دينار"]);

    let family = |id, digits, pattern: String| AmountFamily {
        id,
        digits,
        pattern: Regex::new(&pattern).expect("amount pattern"),
    };

    use AmountFamilyId::*;
    vec![
        family(
            EnglishAmountPhrase,
            Digits::Western,
            format!(r"(?i)\b(?:with\s+amount|amount\s+of|amount\s+is|amount)\s+{NUMBER}"),
        ),
        family(
            ArabicAmountWord,
            Digits::Western,
            format!(r"(?:{})\s+{NUMBER}", alternation(["بقيمة", "بمبلغ", "قيمة", "مبلغ"])),
        ),
        family(
            ArabicAmountLabel,
            Digits::Western,
            format!(
                r"(?:{})\s*:\s*(?:{ARABIC_WORD}\s+)*?{NUMBER}",
                alternation(["المبلغ", "مبلغ"])
            ),
        ),
        family(
            RiyalBeforeNumber,
            Digits::Western,
            format!(r"(?:{riyals})\s+{NUMBER}"),
        ),
        family(
            ArabicCurrencyBeforeNumber,
            Digits::Western,
            format!(r"(?:{other_names})(?:\s+{ARABIC_WORD})?\s+{NUMBER}"),
        ),
        family(
            NumberBeforeArabicCurrency,
            Digits::Western,
            format!(r"{NUMBER}\s*(?:{names})"),
        ),
        family(
            CodeBeforeNumber,
            Digits::Western,
            format!(r"(?i)\b(?:{codes})\s*{NUMBER}"),
        ),
        family(
            NumberBeforeCode,
            Digits::Western,
            format!(r"(?i){NUMBER}\s*(?:{codes})\b"),
        ),
        family(
            SymbolBeforeNumber,
            Digits::Western,
            format!(r"(?:{symbols})\s*{NUMBER}"),
        ),
        family(
            NumberBeforeSymbol,
            Digits::Western,
            format!(r"{NUMBER}\s*(?:{symbols})"),
        ),
        family(
            CurrencyBeforeIndicNumber,
            Digits::ArabicIndic,
            format!(r"(?:{indic_markers})\s*{INDIC_NUMBER}"),
        ),
        family(
            IndicNumberBeforeCurrency,
            Digits::ArabicIndic,
            format!(r"{INDIC_NUMBER}\s*(?:{indic_markers})"),
        ),
    ]
});

/// Parse a captured literal: thousands separators stripped, `.` as decimal point.
/// Anything that is not a finite positive number is rejected.
pub fn parse_amount_literal(literal: &str) -> Option<f64> {
    let cleaned = westernize_digits(literal).replace(',', "");
    if cleaned.matches('.').count() > 1 {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// True when a balance keyword appears in the window of text just before `start`.
pub fn near_balance_keyword(text: &str, start: usize) -> bool {
    let prefix = &text[..start];
    let from = prefix
        .char_indices()
        .rev()
        .nth(BALANCE_LOOKBACK_CHARS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let window = prefix[from..].to_lowercase();
    BALANCE_KEYWORDS.iter().any(|kw| window.contains(kw))
}

fn scan(family: &AmountFamily, text: &NormalizedText) -> FamilyScan {
    let haystack = match family.digits {
        Digits::Western => &text.westernized,
        Digits::ArabicIndic => &text.normalized,
    };

    let mut matched = false;
    for caps in family.pattern.captures_iter(haystack) {
        matched = true;
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let Some(value) = parse_amount_literal(number.as_str()) else {
            trace!(family = ?family.id, literal = number.as_str(), "not a positive number");
            continue;
        };

        if near_balance_keyword(haystack, whole.start()) {
            trace!(family = ?family.id, value, "candidate follows a balance keyword");
            continue;
        }

        return FamilyScan::Amount(value);
    }

    if matched {
        FamilyScan::Exhausted
    } else {
        FamilyScan::NoMatch
    }
}

/// Scan one family in isolation.
pub fn scan_family(id: AmountFamilyId, text: &NormalizedText) -> FamilyScan {
    FAMILIES
        .iter()
        .find(|f| f.id == id)
        .map(|f| scan(f, text))
        .unwrap_or(FamilyScan::NoMatch)
}

pub fn extract_amount_normalized(text: &NormalizedText) -> Option<AmountMatch> {
    for family in FAMILIES.iter() {
        match scan(family, text) {
            FamilyScan::NoMatch => continue,
            FamilyScan::Amount(amount) => {
                debug!(family = ?family.id, amount, "amount extracted");
                return Some(AmountMatch {
                    amount,
                    family: family.id,
                });
            }
            FamilyScan::Exhausted => {
                debug!(family = ?family.id, "all candidates rejected; not falling through");
                return None;
            }
        }
    }
    None
}

/// Transaction amount in `text`, or `None` when no family yields a usable candidate.
pub fn extract_amount(text: &str) -> Option<f64> {
    extract_amount_normalized(&NormalizedText::new(text)).map(|m| m.amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use AmountFamilyId::*;

    fn family(id: AmountFamilyId, text: &str) -> FamilyScan {
        scan_family(id, &NormalizedText::new(text))
    }

    fn winner(text: &str) -> Option<AmountMatch> {
        extract_amount_normalized(&NormalizedText::new(text))
    }

    #[test]
    fn test_parse_amount_literal() {
        assert_eq!(parse_amount_literal("1,250.00"), Some(1250.0));
        assert_eq!(parse_amount_literal("18.44"), Some(18.44));
        assert_eq!(parse_amount_literal("١٨٫٤٤"), Some(18.44));
        assert_eq!(parse_amount_literal("0.00"), None);
        assert_eq!(parse_amount_literal(",,,"), None);
        assert_eq!(parse_amount_literal("1.2.3"), None);
    }

    #[test]
    fn test_near_balance_keyword_window() {
        let text = "Available balance: SAR 8,750.00";
        let start = text.find("SAR").unwrap();
        assert!(near_balance_keyword(text, start));

        let far = format!("balance{}SAR 5", " ".repeat(BALANCE_LOOKBACK_CHARS));
        let start = far.find("SAR").unwrap();
        assert!(!near_balance_keyword(&far, start));
    }

    #[test]
    fn test_english_amount_phrase() {
        let text = "You have purchase transaction with amount 18.44 USD on your credit card";
        assert_eq!(family(EnglishAmountPhrase, text), FamilyScan::Amount(18.44));
        assert_eq!(family(EnglishAmountPhrase, "Amount of 1,200 debited"), FamilyScan::Amount(1200.0));
    }

    #[test]
    fn test_arabic_amount_word() {
        let text = "تسديد الكتروني من حسابكم بقيمة 1.0 دينار اردني";
        assert_eq!(family(ArabicAmountWord, text), FamilyScan::Amount(1.0));
        assert_eq!(family(ArabicAmountWord, "تم خصم مبلغ 350.00 ر.س"), FamilyScan::Amount(350.0));
    }

    #[test]
    fn test_arabic_amount_label() {
        assert_eq!(family(ArabicAmountLabel, "المبلغ: 500 ريال"), FamilyScan::Amount(500.0));
        assert_eq!(family(ArabicAmountLabel, "المبلغ: ريال 75.5"), FamilyScan::Amount(75.5));
    }

    #[test]
    fn test_riyal_before_number() {
        assert_eq!(family(RiyalBeforeNumber, "شراء ريال سعودي 45.50"), FamilyScan::Amount(45.5));
    }

    #[test]
    fn test_arabic_currency_before_number() {
        assert_eq!(family(ArabicCurrencyBeforeNumber, "سحب دينار كويتي 20.250"), FamilyScan::Amount(20.25));
        assert_eq!(family(ArabicCurrencyBeforeNumber, "سحب درهم 40"), FamilyScan::Amount(40.0));
    }

    #[test]
    fn test_number_before_arabic_currency() {
        assert_eq!(family(NumberBeforeArabicCurrency, "شراء 12.5 دينار"), FamilyScan::Amount(12.5));
    }

    #[test]
    fn test_code_before_and_after_number() {
        assert_eq!(family(CodeBeforeNumber, "SAR 1,250.00 deducted"), FamilyScan::Amount(1250.0));
        assert_eq!(family(NumberBeforeCode, "1,250.00 SAR deducted"), FamilyScan::Amount(1250.0));
        assert_eq!(family(CodeBeforeNumber, "kd5 spent"), FamilyScan::Amount(5.0));
    }

    #[test]
    fn test_symbol_before_and_after_number() {
        assert_eq!(family(SymbolBeforeNumber, "خصم ر.س 99"), FamilyScan::Amount(99.0));
        assert_eq!(family(NumberBeforeSymbol, "خصم 99 ر.س"), FamilyScan::Amount(99.0));
        assert_eq!(family(NumberBeforeSymbol, "خصم 30 د.إ"), FamilyScan::Amount(30.0));
    }

    #[test]
    fn test_arabic_indic_families() {
        assert_eq!(family(CurrencyBeforeIndicNumber, "شراء ريال ١٨٫٤٤"), FamilyScan::Amount(18.44));
        assert_eq!(family(IndicNumberBeforeCurrency, "شراء ١٬٢٠٠ ريال"), FamilyScan::Amount(1200.0));
    }

    #[test]
    fn test_arabic_indic_message_parses_to_western_value() {
        assert_eq!(extract_amount("تم شراء بقيمة ١٨٫٤٤ ريال"), Some(18.44));
    }

    #[test]
    fn test_balance_exclusion() {
        let text = "SNB Alert: SAR 1,250.00 deducted. Merchant: Amazon.sa. Date: 25/02/2026. Available balance: SAR 8,750.00";
        let m = winner(text).unwrap();
        assert_eq!(m.amount, 1250.0);
        assert_eq!(m.family, CodeBeforeNumber);
    }

    #[test]
    fn test_balance_first_then_amount_in_same_family() {
        let text = "Balance SAR 9,000.00 noted earlier today; your card purchase of SAR 120.00";
        assert_eq!(extract_amount(text), Some(120.0));
    }

    #[test]
    fn test_higher_priority_family_wins() {
        // the code family would pick 7.00, but the amount phrase comes first
        let text = "SAR 7.00 fee applied, transaction amount 300.00";
        let m = winner(text).unwrap();
        assert_eq!(m.amount, 300.0);
        assert_eq!(m.family, EnglishAmountPhrase);
    }

    #[test]
    fn test_exhausted_family_does_not_fall_through() {
        // only the balance figure sits next to a code; the trailing "50 ر.س" would
        // match a lower family but must not be used
        let text = "Your current balance: SAR 4,000.00 as of this morning. Cashback 50 ر.س";
        assert_eq!(family(CodeBeforeNumber, text), FamilyScan::Exhausted);
        assert_eq!(family(NumberBeforeSymbol, text), FamilyScan::Amount(50.0));
        assert_eq!(extract_amount(text), None);
    }

    #[test]
    fn test_zero_amount_rejects() {
        assert_eq!(extract_amount("amount 0.00 charged"), None);
    }

    #[test]
    fn test_no_amount() {
        assert_eq!(extract_amount("Your card has been blocked"), None);
    }
}
