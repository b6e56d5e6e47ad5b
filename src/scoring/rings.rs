use crate::core::account::AccountId;
use crate::detection::cycles::TemporalCycle;
use crate::graph::transaction_graph::TransactionGraph;
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Shape classification of a detected ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PatternType {
    Circular,
    Chain,
}

/// User-facing packaging of a detected cycle.
#[derive(Debug, Clone, Serialize)]
pub struct Ring {
    /// Synthetic id in the form `R-<YYYY>-<NNN>` with NNN >= 100.
    pub ring_id: String,
    /// Closed node sequence, the closing repeat included.
    pub nodes: Vec<AccountId>,
    pub risk_score: f64,
    pub pattern_type: PatternType,
    /// Sum of the aggregated totals on the ring's edges.
    pub total_volume: Decimal,
}

/// Package cycles into ring records, sorted by risk descending.
///
/// The index inside the ring id reflects the cycle's position in the
/// detector's output order, which is stable for a given batch; ids
/// therefore survive re-analysis of the same input unchanged.
pub fn aggregate_rings(cycles: &[TemporalCycle], graph: &TransactionGraph) -> Vec<Ring> {
    let year = Utc::now().year();
    let mut rings: Vec<Ring> = cycles
        .iter()
        .enumerate()
        .map(|(idx, cycle)| build_ring(cycle, graph, year, idx))
        .collect();

    // Stable sort: equal risks keep detector output order.
    rings.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rings
}

fn build_ring(cycle: &TemporalCycle, graph: &TransactionGraph, year: i32, idx: usize) -> Ring {
    let len = cycle.len();
    let members = cycle.members();

    let risk_score = (50.0 + 10.0 * len as f64).min(100.0);
    let pattern_type = if len < 5 {
        PatternType::Circular
    } else {
        PatternType::Chain
    };

    let mut total_volume = Decimal::ZERO;
    for i in 0..len {
        let from = &members[i];
        let to = &members[(i + 1) % len];
        total_volume += graph.edge_total(from, to);
    }

    Ring {
        ring_id: format!("R-{}-{}", year, 100 + idx),
        nodes: cycle.nodes.clone(),
        risk_score,
        pattern_type,
        total_volume,
    }
}
