//! Batch orchestration: one call from validated batch to result envelope.

pub mod export;

use crate::analysis::clustering::{analyze_clusters, ClusterReport};
use crate::core::account::AccountId;
use crate::core::config::DetectionConfig;
use crate::core::transaction::TransactionBatch;
use crate::detection::commission::commission_suspects;
use crate::detection::cycles::find_temporal_cycles;
use crate::detection::fan::{detect_fan_in, detect_fan_out};
use crate::detection::shells::detect_shell_chains;
use crate::graph::components::component_sizes;
use crate::graph::transaction_graph::TransactionGraph;
use crate::scoring::node_score::{score_accounts, DetectorFindings, NodeScore};
use crate::scoring::rings::{aggregate_rings, Ring};
use chrono::{DateTime, Utc};
use log::{debug, info};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

/// Number of suspicious accounts retained in the envelope.
const TOP_SUSPECTS: usize = 50;

/// Substitute denominator for the fan ratio when an account never sends.
const FAN_RATIO_EPSILON: f64 = 0.1;

/// Aggregate figures for the batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total_transactions: usize,
    pub mule_count: usize,
    pub suspected_count: usize,
    pub flagged_amount: Decimal,
}

/// The full result envelope handed to the persistence collaborator.
///
/// Field names are stable; downstream consumers parse them directly.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionResult {
    pub batch_id: String,
    pub processed_at: DateTime<Utc>,
    pub total_transactions: usize,
    /// Top suspects, sorted by risk descending, at most [`TOP_SUSPECTS`].
    pub suspicious_nodes: Vec<NodeScore>,
    pub rings: Vec<Ring>,
    pub clusters: ClusterReport,
    pub summary: BatchSummary,
    /// Unique accounts seen in the batch; feeds the export summary.
    #[serde(skip)]
    pub analyzed_accounts: usize,
    /// Wall-clock pipeline duration; feeds the export summary.
    #[serde(skip)]
    pub processing_seconds: f64,
}

/// The detection engine: sequences graph construction, the detectors,
/// the clusterer, scoring and ring aggregation over one batch.
///
/// The engine holds no state; each analysis owns a disjoint graph, so
/// concurrent batches at the caller layer need no locking.
pub struct DetectionEngine;

impl DetectionEngine {
    /// Analyze one validated batch and produce the result envelope.
    ///
    /// Never fails on a validated batch: an empty input yields an empty
    /// envelope, and detector-level anomalies only reduce recall.
    pub fn analyze(batch: &TransactionBatch, config: &DetectionConfig) -> DetectionResult {
        let started = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        info!(
            "analyzing batch {} ({} transactions)",
            batch_id,
            batch.len()
        );

        let graph = TransactionGraph::from_batch(batch);
        debug!(
            "graph built: {} accounts, {} edges",
            graph.account_count(),
            graph.edge_count()
        );

        let cycles = find_temporal_cycles(&graph, config);
        let commission = commission_suspects(&graph, &cycles);
        let fan_out = detect_fan_out(&graph, config);
        let fan_in = detect_fan_in(&graph, config);
        let shells = detect_shell_chains(&graph, config);
        debug!(
            "detectors: {} cycles, {} commission suspects, {} fan-out, {} fan-in, {} shell chains",
            cycles.len(),
            commission.len(),
            fan_out.len(),
            fan_in.len(),
            shells.len()
        );

        let mut clusters = analyze_clusters(batch);
        let cluster_mules = clusters.mule_ids();

        // Enrich cluster records with detection flags and graph ratios.
        for record in clusters.accounts_mut() {
            record.is_commission = commission.contains(&record.id);
            record.fan_in_out_ratio = if graph.contains_account(&record.id) {
                let in_deg = graph.in_degree(&record.id) as f64;
                let out_deg = graph.out_degree(&record.id) as f64;
                in_deg / if out_deg > 0.0 { out_deg } else { FAN_RATIO_EPSILON }
            } else {
                0.0
            };
        }

        let findings = DetectorFindings::new(cycles, commission, fan_out, fan_in, shells);

        let accounts = graph.accounts();
        let degrees: HashMap<AccountId, usize> = accounts
            .iter()
            .map(|a| (a.clone(), graph.degree(a)))
            .collect();
        let sizes = component_sizes(&graph);

        let mut suspicious_nodes = score_accounts(
            &accounts,
            &findings,
            &cluster_mules,
            &degrees,
            &sizes,
            config,
        );
        suspicious_nodes.truncate(TOP_SUSPECTS);

        let rings = aggregate_rings(&findings.cycles, &graph);

        let summary = BatchSummary {
            total_transactions: batch.len(),
            mule_count: clusters.mule_accounts.len(),
            suspected_count: clusters.suspected_distribution.len(),
            flagged_amount: clusters.flagged_amount(),
        };

        let processing_seconds = started.elapsed().as_secs_f64();
        info!(
            "batch {} done in {:.3}s: {} suspects, {} rings",
            batch_id,
            processing_seconds,
            suspicious_nodes.len(),
            rings.len()
        );

        DetectionResult {
            batch_id,
            processed_at: Utc::now(),
            total_transactions: batch.len(),
            suspicious_nodes,
            rings,
            clusters,
            summary,
            analyzed_accounts: batch.account_count(),
            processing_seconds,
        }
    }
}
