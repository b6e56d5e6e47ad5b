use crate::core::account::AccountId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of transactions accepted in a single analysis batch.
pub const MAX_BATCH_SIZE: usize = 10_000;

/// A single money transfer between two accounts.
///
/// This is the atomic input of the detection pipeline. Transactions are
/// immutable once validated into a [`TransactionBatch`].
///
/// # Examples
///
/// ```
/// use fraud_engine::core::account::AccountId;
/// use fraud_engine::core::transaction::Transaction;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal_macros::dec;
///
/// let tx = Transaction::new(
///     "TX-000001",
///     AccountId::new("ACC-A"),
///     AccountId::new("ACC-B"),
///     dec!(1000),
///     Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(),
/// );
///
/// assert_eq!(tx.amount(), dec!(1000));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for this transaction.
    id: String,
    /// The account that sent the amount.
    sender: AccountId,
    /// The account that received the amount.
    receiver: AccountId,
    /// The transferred amount. Must be positive.
    amount: Decimal,
    /// When the transfer happened.
    timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction record.
    ///
    /// Positivity of the amount is enforced when the record enters a
    /// [`TransactionBatch`], not here.
    pub fn new(
        id: impl Into<String>,
        sender: AccountId,
        receiver: AccountId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            sender,
            receiver,
            amount,
            timestamp,
        }
    }

    // --- Accessors ---

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sender(&self) -> &AccountId {
        &self.sender
    }

    pub fn receiver(&self) -> &AccountId {
        &self.receiver
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// True when sender and receiver are the same account.
    pub fn is_self_transfer(&self) -> bool {
        self.sender == self.receiver
    }
}

/// Errors raised while assembling a batch from raw records.
///
/// These are the only errors the engine surfaces to callers; once a batch
/// is validated, every downstream operation is total.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("batch holds {count} transactions, limit is {MAX_BATCH_SIZE}")]
    TooManyTransactions { count: usize },
    #[error("transaction {tx_id} has non-positive amount {amount}")]
    NonPositiveAmount { tx_id: String, amount: Decimal },
}

/// A validated, timestamp-ordered batch of transactions.
///
/// Construction is the validation boundary of the engine: size cap,
/// amount positivity and chronological ordering are established here and
/// relied upon by every detector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionBatch {
    transactions: Vec<Transaction>,
}

impl TransactionBatch {
    /// Validate raw records into a batch, sorting by timestamp ascending.
    pub fn new(mut transactions: Vec<Transaction>) -> Result<Self, BatchError> {
        if transactions.len() > MAX_BATCH_SIZE {
            return Err(BatchError::TooManyTransactions {
                count: transactions.len(),
            });
        }
        for tx in &transactions {
            if tx.amount <= Decimal::ZERO {
                return Err(BatchError::NonPositiveAmount {
                    tx_id: tx.id.clone(),
                    amount: tx.amount,
                });
            }
        }
        transactions.sort_by_key(|tx| tx.timestamp);
        Ok(Self { transactions })
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Total transferred value across the batch.
    pub fn gross_total(&self) -> Decimal {
        self.transactions.iter().map(|tx| tx.amount()).sum()
    }

    /// All unique accounts referenced in this batch, sorted by id.
    pub fn accounts(&self) -> Vec<AccountId> {
        let mut accounts: Vec<AccountId> = self
            .transactions
            .iter()
            .flat_map(|tx| vec![tx.sender().clone(), tx.receiver().clone()])
            .collect();
        accounts.sort();
        accounts.dedup();
        accounts
    }

    /// Number of unique accounts referenced in this batch.
    pub fn account_count(&self) -> usize {
        self.accounts().len()
    }
}
