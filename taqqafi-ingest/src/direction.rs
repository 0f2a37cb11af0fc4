//! Debit/credit classification by keyword scan.
//!
//! Any debit keyword decides the result, even when a credit keyword is also
//! present ("credit card", "available balance" notices on a purchase).
//! No keyword at all defaults to debit.

use taqqafi_core::Direction;

use crate::normalize::NormalizedText;

pub const DEBIT_KEYWORDS: &[&str] = &[
    "deducted",
    "charged",
    "debit",
    "spent",
    "purchase",
    "payment",
    "paid",
    "تم خصم",
    "مدين",
    "مشتريات",
    "دفع",
    "سداد",
    "شراء",
    "خصم",
    "خصم نهائي",
    "حجز مبلغ",
    "عملية شراء",
    "تسديد",
    "سحب",
    "صرف",
];

pub const CREDIT_KEYWORDS: &[&str] = &[
    "received",
    "credited",
    "credit",
    "deposited",
    "refund",
    "salary",
    "تم إيداع",
    "دائن",
    "استرداد",
    "إيداع",
    "راتب",
];

fn any_keyword(keywords: &[&str], normalized: &str, flat: &str) -> bool {
    keywords.iter().any(|kw| {
        let kw = kw.to_lowercase();
        normalized.contains(&kw) || flat.contains(&kw)
    })
}

pub fn classify_direction_normalized(text: &NormalizedText) -> Direction {
    let normalized = text.normalized.to_lowercase();
    let flat = text.flat.to_lowercase();

    if any_keyword(DEBIT_KEYWORDS, &normalized, &flat) {
        return Direction::Debit;
    }
    if any_keyword(CREDIT_KEYWORDS, &normalized, &flat) {
        return Direction::Credit;
    }
    Direction::Debit
}

pub fn classify_direction(text: &str) -> Direction {
    classify_direction_normalized(&NormalizedText::new(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_keyword() {
        assert_eq!(classify_direction("SAR 89.50 deducted from your account"), Direction::Debit);
        assert_eq!(classify_direction("تم خصم مبلغ 350.00 ر.س"), Direction::Debit);
    }

    #[test]
    fn test_credit_keyword() {
        assert_eq!(
            classify_direction("Salary of SAR 10,000.00 credited to your account"),
            Direction::Credit
        );
        assert_eq!(classify_direction("تم إيداع 500 ريال في حسابك"), Direction::Credit);
    }

    #[test]
    fn test_debit_wins_over_credit() {
        let text = "Purchase of USD 18.44 on your credit card";
        assert_eq!(classify_direction(text), Direction::Debit);
    }

    #[test]
    fn test_refund_with_debit_word_stays_debit() {
        // a refund notice that mentions the original purchase is still read as debit
        let text = "Refund for purchase at Noon: SAR 99.00";
        assert_eq!(classify_direction(text), Direction::Debit);
    }

    #[test]
    fn test_defaults_to_debit() {
        assert_eq!(classify_direction("SAR 40.00 at Jarir"), Direction::Debit);
    }

    #[test]
    fn test_arabic_credit_after_hamza_normalization() {
        // the normalized view reads "تم ايداع"; the flat view still matches "تم إيداع"
        assert_eq!(classify_direction("تم  إيداع\nراتب شهر فبراير"), Direction::Credit);
    }
}
