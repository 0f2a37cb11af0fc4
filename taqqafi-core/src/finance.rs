//! Finance record types shared by the SMS pipeline and the review inbox

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::currency::CurrencyCode;

/// Spending categories, in the order keyword rules are evaluated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Bills,
    Health,
    Entertainment,
    Education,
    Misc,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Bills,
        Category::Health,
        Category::Entertainment,
        Category::Education,
        Category::Misc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Education => "Education",
            Category::Misc => "Misc",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Money leaving (`Debit`) or entering (`Credit`) the account.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Debit,
    Credit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Debit => "debit",
            Direction::Credit => "credit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hex digest of a message body, used as the dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Placeholder key for a hand-entered record that never came from an SMS.
    pub fn manual(id: &str) -> Self {
        Self(format!("manual_{id}"))
    }

    pub fn is_manual(&self) -> bool {
        self.0.starts_with("manual_")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A parsed SMS awaiting user review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingTransaction {
    pub id: String,
    pub hash: ContentHash,
    pub amount: f64,
    pub currency: CurrencyCode,
    pub merchant: String,
    pub category: Category,
    pub direction: Direction,
    pub raw_text: String,
    pub sender: String,
    pub received_at: DateTime<Utc>,
    pub month: u32,
    pub year: i32,
}

/// An approved transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub hash: ContentHash,
    pub amount: f64,
    pub currency: CurrencyCode,
    pub merchant: String,
    pub category: Category,
    pub direction: Direction,
    pub raw_text: String,
    pub sender: String,
    pub approved_at: DateTime<Utc>,
    pub month: u32,
    pub year: i32,
}

impl PendingTransaction {
    pub fn approve(self, approved_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id: self.id,
            hash: self.hash,
            amount: self.amount,
            currency: self.currency,
            merchant: self.merchant,
            category: self.category,
            direction: self.direction,
            raw_text: self.raw_text,
            sender: self.sender,
            approved_at,
            month: self.month,
            year: self.year,
        }
    }
}

impl Transaction {
    pub fn is_debit(&self) -> bool {
        self.direction == Direction::Debit
    }

    pub fn in_month(&self, month: u32, year: i32) -> bool {
        self.month == month && self.year == year
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_pending() -> PendingTransaction {
        PendingTransaction {
            id: "p-001".into(),
            hash: ContentHash::from_hex("abc123"),
            amount: 89.5,
            currency: CurrencyCode::Sar,
            merchant: "Mcdonald's".into(),
            category: Category::Food,
            direction: Direction::Debit,
            raw_text: "Al-Rajhi Bank: SAR 89.50 deducted".into(),
            sender: "ALRAJHI".into(),
            received_at: Utc.with_ymd_and_hms(2026, 2, 25, 9, 30, 0).unwrap(),
            month: 2,
            year: 2026,
        }
    }

    #[test]
    fn test_approve_keeps_fields() {
        let p = sample_pending();
        let approved_at = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let tx = p.clone().approve(approved_at);
        assert_eq!(tx.id, p.id);
        assert_eq!(tx.hash, p.hash);
        assert_eq!(tx.approved_at, approved_at);
        // bookkeeping month stays the month the SMS arrived
        assert!(tx.in_month(2, 2026));
        assert!(tx.is_debit());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Direction::Credit).unwrap(), "\"credit\"");
        assert_eq!(serde_json::to_string(&Category::Entertainment).unwrap(), "\"Entertainment\"");
        assert_eq!(
            serde_json::to_string(&ContentHash::from_hex("ff00")).unwrap(),
            "\"ff00\""
        );
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("food".parse::<Category>(), Ok(Category::Food));
        assert_eq!(" Entertainment ".parse::<Category>(), Ok(Category::Entertainment));
        assert_eq!(
            "Groceries".parse::<Category>(),
            Err(UnknownCategory("Groceries".into()))
        );
    }

    #[test]
    fn test_manual_hash() {
        let h = ContentHash::manual("abc");
        assert_eq!(h.as_str(), "manual_abc");
        assert!(h.is_manual());
        assert!(!ContentHash::from_hex("ff00").is_manual());
    }

    #[test]
    fn test_category_order() {
        assert_eq!(Category::ALL[0], Category::Food);
        assert_eq!(Category::ALL[7], Category::Misc);
        assert!(Category::Food < Category::Shopping);
    }
}
