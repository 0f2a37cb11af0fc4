//! Review inbox: parsed messages wait as pending records until the user
//! approves, edits, or dismisses them.
//!
//! A message is a duplicate when its content hash is already in the processed
//! ledger or sits in the pending list. Only approval marks a hash processed,
//! so a dismissed message can be captured again if it is redelivered.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use taqqafi_core::{
    Category, ContentHash, CurrencyCode, Direction, PendingTransaction, RateTable, Transaction,
};
use taqqafi_ingest::{is_processed, mark_processed, InboundSms, ParsedTransaction, SmsOutcome, SmsParser};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::category_rules::map_category;

pub const MANUAL_RAW_TEXT: &str = "Manual entry";
pub const MANUAL_SENDER: &str = "manual";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InboxConfig {
    /// Keep incoming money (salary, refunds) as pending records too.
    #[serde(default)]
    pub accept_credits: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// Stored as pending under this id.
    Accepted(String),
    Duplicate,
    IgnoredCredit,
}

/// Result of running one raw message through parser and inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "id", rename_all = "snake_case")]
pub enum InboxOutcome {
    NotFinancial,
    Unparseable,
    Accepted(String),
    Duplicate,
    IgnoredCredit,
}

impl From<AcceptOutcome> for InboxOutcome {
    fn from(outcome: AcceptOutcome) -> Self {
        match outcome {
            AcceptOutcome::Accepted(id) => InboxOutcome::Accepted(id),
            AcceptOutcome::Duplicate => InboxOutcome::Duplicate,
            AcceptOutcome::IgnoredCredit => InboxOutcome::IgnoredCredit,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InboxError {
    #[error("no pending transaction with id {0}")]
    UnknownId(String),
    #[error("no approved transaction with id {0}")]
    UnknownApprovedId(String),
    #[error("edited record {id} no longer matches its message hash")]
    HashMismatch { id: String },
    #[error("amount must be a positive number, got {0}")]
    InvalidAmount(String),
}

/// A hand-entered expense, e.g. a cash payment that never produced an SMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualEntry {
    pub amount: f64,
    pub currency: CurrencyCode,
    pub merchant: String,
    pub category: Category,
    pub date: DateTime<Utc>,
}

/// Build the pending record for a parsed message. Month and year come from `received_at`.
pub fn pending_from_parsed(
    parsed: ParsedTransaction,
    id: String,
    category: Category,
    sender: &str,
    received_at: DateTime<Utc>,
) -> PendingTransaction {
    PendingTransaction {
        id,
        hash: parsed.content_hash,
        amount: parsed.amount,
        currency: parsed.currency,
        merchant: parsed.merchant,
        category,
        direction: parsed.direction,
        raw_text: parsed.raw_text,
        sender: sender.to_string(),
        received_at,
        month: received_at.month(),
        year: received_at.year(),
    }
}

fn check_amount(amount: f64) -> Result<(), InboxError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(InboxError::InvalidAmount(amount.to_string()))
    }
}

/// Pending and approved records plus the processed-hash ledger.
/// Newest records come first in both lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inbox {
    #[serde(skip)]
    config: InboxConfig,
    #[serde(default)]
    pending: Vec<PendingTransaction>,
    #[serde(default)]
    approved: Vec<Transaction>,
    #[serde(default)]
    processed: HashSet<ContentHash>,
}

impl Inbox {
    pub fn new(config: InboxConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace the runtime config, e.g. after loading persisted state.
    pub fn with_config(mut self, config: InboxConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &InboxConfig {
        &self.config
    }

    pub fn pending(&self) -> &[PendingTransaction] {
        &self.pending
    }

    pub fn approved(&self) -> &[Transaction] {
        &self.approved
    }

    pub fn is_duplicate(&self, hash: &ContentHash) -> bool {
        is_processed(hash, &self.processed) || self.pending.iter().any(|p| &p.hash == hash)
    }

    /// Store a parsed message as pending, categorizing it on the way in.
    pub fn accept(
        &mut self,
        parsed: ParsedTransaction,
        sender: &str,
        now: DateTime<Utc>,
    ) -> AcceptOutcome {
        if self.is_duplicate(&parsed.content_hash) {
            debug!(hash = %parsed.content_hash, sender, "duplicate message");
            return AcceptOutcome::Duplicate;
        }
        if parsed.direction == Direction::Credit && !self.config.accept_credits {
            debug!(sender, amount = parsed.amount, "ignoring credit");
            return AcceptOutcome::IgnoredCredit;
        }

        let category = map_category(&parsed.merchant, &parsed.raw_text);
        let id = Uuid::new_v4().to_string();
        let pending = pending_from_parsed(parsed, id.clone(), category, sender, now);
        info!(%id, %category, amount = pending.amount, currency = %pending.currency, "pending transaction captured");
        self.pending.insert(0, pending);
        AcceptOutcome::Accepted(id)
    }

    /// Feed a parser outcome into the inbox.
    pub fn resolve(&mut self, outcome: SmsOutcome, sender: &str, now: DateTime<Utc>) -> InboxOutcome {
        match outcome {
            SmsOutcome::NotFinancial => InboxOutcome::NotFinancial,
            SmsOutcome::Unparseable => InboxOutcome::Unparseable,
            SmsOutcome::Parsed(tx) => self.accept(tx, sender, now).into(),
        }
    }

    /// Parse `body` and accept the result.
    pub fn process(
        &mut self,
        parser: &SmsParser,
        body: &str,
        sender: &str,
        now: DateTime<Utc>,
    ) -> InboxOutcome {
        let outcome = parser.parse(body, sender);
        self.resolve(outcome, sender, now)
    }

    fn pending_index(&self, id: &str) -> Result<usize, InboxError> {
        self.pending
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| InboxError::UnknownId(id.to_string()))
    }

    /// Move a pending record to the approved list and mark its hash processed.
    pub fn approve(&mut self, id: &str, now: DateTime<Utc>) -> Result<Transaction, InboxError> {
        let idx = self.pending_index(id)?;
        let pending = self.pending.remove(idx);
        self.processed = mark_processed(pending.hash.clone(), std::mem::take(&mut self.processed));
        let tx = pending.approve(now);
        self.approved.insert(0, tx.clone());
        Ok(tx)
    }

    /// Drop a pending record. Its hash is not marked processed.
    pub fn dismiss(&mut self, id: &str) -> Result<PendingTransaction, InboxError> {
        let idx = self.pending_index(id)?;
        Ok(self.pending.remove(idx))
    }

    /// Replace a pending record with the user's edit, then approve it.
    pub fn edit_and_approve(
        &mut self,
        edited: PendingTransaction,
        now: DateTime<Utc>,
    ) -> Result<Transaction, InboxError> {
        let idx = self.pending_index(&edited.id)?;
        if self.pending[idx].hash != edited.hash {
            return Err(InboxError::HashMismatch { id: edited.id });
        }
        let id = edited.id.clone();
        self.pending[idx] = edited;
        self.approve(&id, now)
    }

    /// Record an expense directly as approved. It gets a `manual_<id>` hash and
    /// never enters the processed ledger.
    pub fn add_manual(&mut self, entry: ManualEntry) -> Result<Transaction, InboxError> {
        check_amount(entry.amount)?;
        let id = Uuid::new_v4().to_string();
        let tx = Transaction {
            hash: ContentHash::manual(&id),
            id,
            amount: entry.amount,
            currency: entry.currency,
            merchant: entry.merchant,
            category: entry.category,
            direction: Direction::Debit,
            raw_text: MANUAL_RAW_TEXT.to_string(),
            sender: MANUAL_SENDER.to_string(),
            approved_at: entry.date,
            month: entry.date.month(),
            year: entry.date.year(),
        };
        info!(id = %tx.id, category = %tx.category, amount = tx.amount, "manual transaction added");
        self.approved.insert(0, tx.clone());
        Ok(tx)
    }

    fn approved_index(&self, id: &str) -> Result<usize, InboxError> {
        self.approved
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| InboxError::UnknownApprovedId(id.to_string()))
    }

    /// Replace an approved record with an edited copy. The hash must stay the same.
    pub fn update_approved(&mut self, edited: Transaction) -> Result<(), InboxError> {
        let idx = self.approved_index(&edited.id)?;
        if self.approved[idx].hash != edited.hash {
            return Err(InboxError::HashMismatch { id: edited.id });
        }
        check_amount(edited.amount)?;
        self.approved[idx] = edited;
        Ok(())
    }

    /// Remove an approved record. Its hash stays processed, so a redelivered
    /// copy of the SMS is still recognized as a duplicate.
    pub fn delete_approved(&mut self, id: &str) -> Result<Transaction, InboxError> {
        let idx = self.approved_index(id)?;
        Ok(self.approved.remove(idx))
    }

    /// Approved debits booked in the given month.
    pub fn monthly_transactions(&self, month: u32, year: i32) -> Vec<&Transaction> {
        self.approved
            .iter()
            .filter(|t| t.in_month(month, year) && t.is_debit())
            .collect()
    }

    /// Monthly debit totals per category, converted into `target`.
    pub fn spend_by_category(
        &self,
        month: u32,
        year: i32,
        target: CurrencyCode,
        rates: &impl RateTable,
    ) -> BTreeMap<Category, f64> {
        let mut totals = BTreeMap::new();
        for tx in self.monthly_transactions(month, year) {
            *totals.entry(tx.category).or_insert(0.0) += rates.convert(tx.amount, tx.currency, target);
        }
        totals
    }
}

/// Parse a batch concurrently and accept each result under the inbox lock.
///
/// Parsing happens on separate tasks without the lock. The duplicate check and
/// the insert happen together while holding it, so identical bodies in one
/// batch produce a single `Accepted`. Outcomes are returned in input order.
pub async fn process_batch(
    inbox: Arc<Mutex<Inbox>>,
    parser: SmsParser,
    messages: Vec<InboundSms>,
    now: DateTime<Utc>,
) -> anyhow::Result<Vec<InboxOutcome>> {
    let handles: Vec<_> = messages
        .into_iter()
        .map(|sms| {
            let inbox = Arc::clone(&inbox);
            tokio::spawn(async move {
                let outcome = parser.parse(&sms.body, &sms.sender);
                let mut guard = inbox.lock().await;
                guard.resolve(outcome, &sms.sender, now)
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(handle.await?);
    }
    Ok(outcomes)
}
