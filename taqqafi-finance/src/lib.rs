//! taqqafi-finance: category rules, the review inbox, budgets, and CSV export

pub mod budget;
pub mod category_rules;
pub mod export;
pub mod inbox;

pub use budget::{Budget, BudgetBook, BudgetError, BudgetSummary};
pub use category_rules::map_category;
pub use export::export_csv;
pub use inbox::{
    pending_from_parsed, process_batch, AcceptOutcome, Inbox, InboxConfig, InboxError,
    InboxOutcome, ManualEntry,
};
