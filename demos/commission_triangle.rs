//! Walk-through: a three-account laundering ring skimming 2% per hop.
//!
//! Run with: `cargo run --example commission_triangle`

use chrono::{Duration, TimeZone, Utc};
use fraud_engine::prelude::*;
use rust_decimal_macros::dec;

fn main() {
    let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    // A sends 1000, each hop keeps a 2% commission, and the remainder
    // returns to A two hours later.
    let batch = TransactionBatch::new(vec![
        Transaction::new(
            "TX-1",
            AccountId::new("ALPHA"),
            AccountId::new("BRAVO"),
            dec!(1000),
            start,
        ),
        Transaction::new(
            "TX-2",
            AccountId::new("BRAVO"),
            AccountId::new("CHARLIE"),
            dec!(980),
            start + Duration::hours(1),
        ),
        Transaction::new(
            "TX-3",
            AccountId::new("CHARLIE"),
            AccountId::new("ALPHA"),
            dec!(960.4),
            start + Duration::hours(2),
        ),
    ])
    .expect("demo batch is valid");

    let result = DetectionEngine::analyze(&batch, &DetectionConfig::default());

    println!("Rings detected: {}", result.rings.len());
    for ring in &result.rings {
        let nodes: Vec<String> = ring.nodes.iter().map(|n| n.to_string()).collect();
        println!(
            "  {}  risk {:.0}  volume {}  {}",
            ring.ring_id,
            ring.risk_score,
            ring.total_volume,
            nodes.join(" → ")
        );
    }

    println!("\nSuspicious accounts:");
    for node in &result.suspicious_nodes {
        println!(
            "  {:<10} score {:>5.1}  cycle={} role={:?}",
            node.id.to_string(),
            node.risk_score,
            node.details.cycles,
            node.details.role
        );
    }
}
