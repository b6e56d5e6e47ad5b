//! Random batch generation for benchmarks and load testing.
//!
//! Produces uniformly random transaction traffic; detector hit rates on
//! this traffic are low by construction, which is exactly what the
//! benchmarks want.

use crate::core::account::AccountId;
use crate::core::transaction::{Transaction, TransactionBatch, MAX_BATCH_SIZE};
use chrono::{Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random transaction batch.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of accounts in the network.
    pub account_count: usize,
    /// Average number of transactions sent per account.
    pub avg_transactions_per_account: usize,
    /// Minimum transaction amount.
    pub min_amount: Decimal,
    /// Maximum transaction amount.
    pub max_amount: Decimal,
    /// All timestamps fall within this many hours before now.
    pub span_hours: i64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            account_count: 10,
            avg_transactions_per_account: 3,
            min_amount: Decimal::from(10),
            max_amount: Decimal::from(10_000),
            span_hours: 7 * 24,
        }
    }
}

/// Generate a random transaction batch for testing.
///
/// The total transaction count is capped at the batch limit, so the
/// result always validates.
pub fn generate_random_batch(config: &BatchConfig) -> TransactionBatch {
    let mut rng = rand::thread_rng();

    let accounts: Vec<AccountId> = (0..config.account_count.max(2))
        .map(|i| AccountId::new(format!("ACC-{:04}", i)))
        .collect();

    let total = (config.account_count * config.avg_transactions_per_account)
        .min(MAX_BATCH_SIZE);
    let span_seconds = Duration::hours(config.span_hours.max(1))
        .num_seconds();
    let start = Utc::now() - Duration::seconds(span_seconds);

    let min_f64: f64 = config.min_amount.to_string().parse().unwrap_or(10.0);
    let max_f64: f64 = config.max_amount.to_string().parse().unwrap_or(10_000.0);

    let mut transactions = Vec::with_capacity(total);
    for i in 0..total {
        let sender_idx = rng.gen_range(0..accounts.len());
        let mut receiver_idx = rng.gen_range(0..accounts.len());
        while receiver_idx == sender_idx {
            receiver_idx = rng.gen_range(0..accounts.len());
        }

        let amount_f64 = rng.gen_range(min_f64..max_f64);
        let amount = Decimal::from_f64_retain(amount_f64)
            .unwrap_or(Decimal::ONE)
            .round_dp(2)
            .max(Decimal::ONE);

        let offset = rng.gen_range(0..span_seconds.max(1));
        transactions.push(Transaction::new(
            format!("TX-{:06}", i),
            accounts[sender_idx].clone(),
            accounts[receiver_idx].clone(),
            amount,
            start + Duration::seconds(offset),
        ));
    }

    TransactionBatch::new(transactions).expect("generated batch respects validation limits")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DetectionConfig;
    use crate::pipeline::DetectionEngine;

    #[test]
    fn test_generation_respects_limits() {
        let config = BatchConfig {
            account_count: 5,
            avg_transactions_per_account: 4,
            ..Default::default()
        };
        let batch = generate_random_batch(&config);
        assert_eq!(batch.len(), 20);
        assert!(batch.account_count() <= 5);
        for tx in batch.transactions() {
            assert!(tx.amount() > Decimal::ZERO);
            assert!(!tx.is_self_transfer());
        }
    }

    #[test]
    fn test_generated_batch_analyzes() {
        let config = BatchConfig {
            account_count: 20,
            avg_transactions_per_account: 5,
            ..Default::default()
        };
        let batch = generate_random_batch(&config);
        let result = DetectionEngine::analyze(&batch, &DetectionConfig::default());
        assert_eq!(result.total_transactions, 100);
        for node in &result.suspicious_nodes {
            assert!(node.risk_score > 0.0);
            assert!(node.risk_score <= 100.0);
        }
    }
}
