//! Monthly spending limits per category and how approved debits measure up.
//!
//! Limits are expressed in the report currency; spending in other currencies
//! is converted through a [`RateTable`] before it is compared.

use serde::{Deserialize, Serialize};
use taqqafi_core::{Category, CurrencyCode, RateTable};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::inbox::Inbox;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub category: Category,
    pub monthly_limit: f64,
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub budget: Budget,
    pub spent: f64,
    /// Never below zero.
    pub remaining: f64,
    /// Share of the limit used, capped at 1.0.
    pub percent: f64,
    pub is_over_budget: bool,
}

impl BudgetSummary {
    pub fn new(budget: Budget, spent: f64) -> Self {
        let limit = budget.monthly_limit;
        Self {
            remaining: (limit - spent).max(0.0),
            percent: (spent / limit).min(1.0),
            is_over_budget: spent > limit,
            spent,
            budget,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BudgetError {
    #[error("monthly limit must be a positive number, got {0}")]
    InvalidLimit(f64),
    #[error("month must be 1-12, got {0}")]
    InvalidMonth(u32),
    #[error("a {category} budget already exists for {month:02}/{year}")]
    AlreadyExists {
        category: Category,
        month: u32,
        year: i32,
    },
    #[error("no budget with id {0}")]
    UnknownId(String),
}

/// All budgets, across months.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetBook {
    #[serde(default)]
    budgets: Vec<Budget>,
}

impl BudgetBook {
    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    fn validate(budget: &Budget) -> Result<(), BudgetError> {
        if !(budget.monthly_limit.is_finite() && budget.monthly_limit > 0.0) {
            return Err(BudgetError::InvalidLimit(budget.monthly_limit));
        }
        if !(1..=12).contains(&budget.month) {
            return Err(BudgetError::InvalidMonth(budget.month));
        }
        Ok(())
    }

    /// Create a budget. One budget per category per month.
    pub fn add(
        &mut self,
        category: Category,
        monthly_limit: f64,
        month: u32,
        year: i32,
    ) -> Result<Budget, BudgetError> {
        let budget = Budget {
            id: Uuid::new_v4().to_string(),
            category,
            monthly_limit,
            month,
            year,
        };
        Self::validate(&budget)?;
        if self
            .budgets
            .iter()
            .any(|b| b.category == category && b.month == month && b.year == year)
        {
            return Err(BudgetError::AlreadyExists {
                category,
                month,
                year,
            });
        }
        info!(id = %budget.id, %category, monthly_limit, month, year, "budget added");
        self.budgets.push(budget.clone());
        Ok(budget)
    }

    /// Replace an existing budget, matched by id.
    pub fn update(&mut self, budget: Budget) -> Result<(), BudgetError> {
        Self::validate(&budget)?;
        let slot = self
            .budgets
            .iter_mut()
            .find(|b| b.id == budget.id)
            .ok_or_else(|| BudgetError::UnknownId(budget.id.clone()))?;
        *slot = budget;
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<Budget, BudgetError> {
        let idx = self
            .budgets
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| BudgetError::UnknownId(id.to_string()))?;
        Ok(self.budgets.remove(idx))
    }

    pub fn monthly(&self, month: u32, year: i32) -> Vec<&Budget> {
        self.budgets
            .iter()
            .filter(|b| b.month == month && b.year == year)
            .collect()
    }

    /// One summary per budget of the month, counting approved debits of that
    /// month in the budget's category.
    pub fn summaries(
        &self,
        inbox: &Inbox,
        month: u32,
        year: i32,
        target: CurrencyCode,
        rates: &impl RateTable,
    ) -> Vec<BudgetSummary> {
        let spend = inbox.spend_by_category(month, year, target, rates);
        self.monthly(month, year)
            .into_iter()
            .map(|b| {
                let spent = spend.get(&b.category).copied().unwrap_or(0.0);
                BudgetSummary::new(b.clone(), spent)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbox::ManualEntry;
    use chrono::{TimeZone, Utc};
    use taqqafi_core::StaticRates;

    fn spend(inbox: &mut Inbox, category: Category, amount: f64, currency: CurrencyCode, month: u32) {
        inbox
            .add_manual(ManualEntry {
                amount,
                currency,
                merchant: "Somewhere".into(),
                category,
                date: Utc.with_ymd_and_hms(2026, month, 10, 12, 0, 0).unwrap(),
            })
            .unwrap();
    }

    fn summary_for(summaries: &[BudgetSummary], category: Category) -> &BudgetSummary {
        summaries
            .iter()
            .find(|s| s.budget.category == category)
            .unwrap()
    }

    #[test]
    fn test_under_budget() {
        let mut book = BudgetBook::default();
        book.add(Category::Food, 1000.0, 2, 2026).unwrap();
        let mut inbox = Inbox::default();
        spend(&mut inbox, Category::Food, 250.0, CurrencyCode::Sar, 2);

        let s = book.summaries(&inbox, 2, 2026, CurrencyCode::Sar, &StaticRates);
        let food = summary_for(&s, Category::Food);
        assert_eq!(food.spent, 250.0);
        assert_eq!(food.remaining, 750.0);
        assert_eq!(food.percent, 0.25);
        assert!(!food.is_over_budget);
    }

    #[test]
    fn test_over_budget_caps_percent_and_remaining() {
        let mut book = BudgetBook::default();
        book.add(Category::Shopping, 500.0, 2, 2026).unwrap();
        let mut inbox = Inbox::default();
        spend(&mut inbox, Category::Shopping, 400.0, CurrencyCode::Sar, 2);
        // 100 USD is 375 SAR
        spend(&mut inbox, Category::Shopping, 100.0, CurrencyCode::Usd, 2);

        let s = book.summaries(&inbox, 2, 2026, CurrencyCode::Sar, &StaticRates);
        let shopping = summary_for(&s, Category::Shopping);
        assert_eq!(shopping.spent, 775.0);
        assert_eq!(shopping.remaining, 0.0);
        assert_eq!(shopping.percent, 1.0);
        assert!(shopping.is_over_budget);
    }

    #[test]
    fn test_exactly_at_limit_is_not_over() {
        let summary = BudgetSummary::new(
            Budget {
                id: "b".into(),
                category: Category::Bills,
                monthly_limit: 300.0,
                month: 2,
                year: 2026,
            },
            300.0,
        );
        assert_eq!(summary.percent, 1.0);
        assert_eq!(summary.remaining, 0.0);
        assert!(!summary.is_over_budget);
    }

    #[test]
    fn test_zero_spend() {
        let mut book = BudgetBook::default();
        book.add(Category::Health, 200.0, 3, 2026).unwrap();
        let inbox = Inbox::default();

        let s = book.summaries(&inbox, 3, 2026, CurrencyCode::Sar, &StaticRates);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].spent, 0.0);
        assert_eq!(s[0].remaining, 200.0);
        assert_eq!(s[0].percent, 0.0);
        assert!(!s[0].is_over_budget);
    }

    #[test]
    fn test_other_months_do_not_count() {
        let mut book = BudgetBook::default();
        book.add(Category::Food, 100.0, 2, 2026).unwrap();
        book.add(Category::Food, 100.0, 3, 2026).unwrap();
        let mut inbox = Inbox::default();
        spend(&mut inbox, Category::Food, 90.0, CurrencyCode::Sar, 3);

        let feb = book.summaries(&inbox, 2, 2026, CurrencyCode::Sar, &StaticRates);
        assert_eq!(feb.len(), 1);
        assert_eq!(feb[0].spent, 0.0);
        assert_eq!(feb[0].budget.month, 2);

        let mar = book.summaries(&inbox, 3, 2026, CurrencyCode::Sar, &StaticRates);
        assert_eq!(mar[0].spent, 90.0);

        // no budgets at all for April
        assert!(book.summaries(&inbox, 4, 2026, CurrencyCode::Sar, &StaticRates).is_empty());
    }

    #[test]
    fn test_other_categories_do_not_count() {
        let mut book = BudgetBook::default();
        book.add(Category::Transport, 100.0, 2, 2026).unwrap();
        let mut inbox = Inbox::default();
        spend(&mut inbox, Category::Food, 90.0, CurrencyCode::Sar, 2);

        let s = book.summaries(&inbox, 2, 2026, CurrencyCode::Sar, &StaticRates);
        assert_eq!(s[0].spent, 0.0);
    }

    #[test]
    fn test_one_budget_per_category_and_month() {
        let mut book = BudgetBook::default();
        book.add(Category::Food, 100.0, 2, 2026).unwrap();
        assert_eq!(
            book.add(Category::Food, 200.0, 2, 2026),
            Err(BudgetError::AlreadyExists {
                category: Category::Food,
                month: 2,
                year: 2026
            })
        );
        assert!(book.add(Category::Food, 200.0, 2, 2027).is_ok());
        assert_eq!(book.budgets().len(), 2);
    }

    #[test]
    fn test_validation() {
        let mut book = BudgetBook::default();
        assert_eq!(
            book.add(Category::Food, 0.0, 2, 2026),
            Err(BudgetError::InvalidLimit(0.0))
        );
        assert_eq!(
            book.add(Category::Food, 10.0, 13, 2026),
            Err(BudgetError::InvalidMonth(13))
        );
        assert!(book.budgets().is_empty());
    }

    #[test]
    fn test_update_and_delete() {
        let mut book = BudgetBook::default();
        let mut b = book.add(Category::Food, 100.0, 2, 2026).unwrap();
        b.monthly_limit = 150.0;
        book.update(b.clone()).unwrap();
        assert_eq!(book.monthly(2, 2026)[0].monthly_limit, 150.0);

        let removed = book.delete(&b.id).unwrap();
        assert_eq!(removed.id, b.id);
        assert!(book.monthly(2, 2026).is_empty());
        assert_eq!(book.delete(&b.id), Err(BudgetError::UnknownId(b.id.clone())));
        assert_eq!(book.update(b.clone()), Err(BudgetError::UnknownId(b.id)));
    }

    #[test]
    fn test_book_round_trips() {
        let mut book = BudgetBook::default();
        book.add(Category::Education, 800.0, 9, 2026).unwrap();
        let json = serde_json::to_string(&book).unwrap();
        let back: BudgetBook = serde_json::from_str(&json).unwrap();
        assert_eq!(back.budgets(), book.budgets());
    }
}
