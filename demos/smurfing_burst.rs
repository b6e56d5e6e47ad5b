//! Walk-through: twelve structured deposits into one mule account.
//!
//! Run with: `cargo run --example smurfing_burst`

use chrono::{Duration, TimeZone, Utc};
use fraud_engine::prelude::*;
use rust_decimal_macros::dec;

fn main() {
    let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    // Twelve distinct senders, one transfer each, five minutes apart —
    // the classic structuring pattern to stay under reporting limits.
    let transactions: Vec<Transaction> = (0..12)
        .map(|i| {
            Transaction::new(
                format!("TX-{i:02}"),
                AccountId::new(format!("SENDER-{i:02}")),
                AccountId::new("COLLECTOR"),
                dec!(100),
                start + Duration::minutes(i * 5),
            )
        })
        .collect();

    let batch = TransactionBatch::new(transactions).expect("demo batch is valid");
    let result = DetectionEngine::analyze(&batch, &DetectionConfig::default());

    println!("Suspicious accounts:");
    for node in &result.suspicious_nodes {
        println!(
            "  {:<12} score {:>5.1}  smurfing={} role={:?} degree={}",
            node.id.to_string(),
            node.risk_score,
            node.details.smurfing,
            node.details.role,
            node.details.degree
        );
    }

    println!("\nCluster classes:");
    println!("  mules:     {}", result.clusters.mule_accounts.len());
    println!("  suspected: {}", result.clusters.suspected_distribution.len());
    println!("  websites:  {}", result.clusters.websites.len());
    println!("\nFlagged amount: {}", result.summary.flagged_amount);
}
