//! # fraud-engine
//!
//! Transaction-graph fraud ring detection and risk scoring engine.
//!
//! Given a batch of transaction records, this engine materializes a
//! directed multi-edge temporal graph and flags suspicious accounts and
//! laundering rings: chronologically ordered cycles with commission-style
//! value retention, high fan-in/fan-out bursts, and long low-activity
//! shell chains, fused into a bounded per-account risk score.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: accounts, transactions, rule config
//! - **graph** — Temporal transaction graph and connected components
//! - **detection** — Cycle, commission, fan and shell detectors
//! - **analysis** — Quantile-based heuristic clustering
//! - **scoring** — Per-account risk fusion and ring aggregation
//! - **pipeline** — Batch orchestration and downstream export
//! - **simulation** — Random batch generation for testing

pub mod analysis;
pub mod core;
pub mod detection;
pub mod graph;
pub mod pipeline;
pub mod scoring;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::account::AccountId;
    pub use crate::core::config::DetectionConfig;
    pub use crate::core::transaction::{Transaction, TransactionBatch};
    pub use crate::graph::transaction_graph::TransactionGraph;
    pub use crate::pipeline::{DetectionEngine, DetectionResult};
    pub use crate::scoring::node_score::NodeScore;
    pub use crate::scoring::rings::Ring;
}
