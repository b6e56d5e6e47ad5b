use crate::core::account::AccountId;
use crate::core::config::DetectionConfig;
use crate::graph::transaction_graph::TransactionGraph;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// A chronologically valid simple cycle of money movement.
///
/// `nodes` is the closed walk `[n0, n1, ..., nk, n0]`: the first account
/// is repeated at the end. Interior nodes are distinct, and there exists
/// a choice of one transfer per hop whose timestamps strictly increase
/// around the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalCycle {
    /// Closed node sequence; first == last.
    pub nodes: Vec<AccountId>,
}

impl TemporalCycle {
    /// Number of distinct accounts on the cycle (closing repeat excluded).
    pub fn len(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The distinct accounts, without the closing repeat.
    pub fn members(&self) -> &[AccountId] {
        &self.nodes[..self.len()]
    }

    pub fn contains(&self, account: &AccountId) -> bool {
        self.members().contains(account)
    }
}

/// Enumerate all chronologically valid simple cycles of length
/// `min_cycle_length..=max_cycle_length`, deduplicated under rotation.
///
/// # Algorithm
///
/// Depth-first search with a temporal cursor. Each search is seeded with
/// one outgoing edge and one of its timestamps; from a path ending at `c`
/// with cursor `t`, the cycle closes if an edge back to the start carries
/// any timestamp after `t`, and extends along an edge `(c, n)` if that
/// edge carries a timestamp after `t` — taking the *earliest* such
/// timestamp as the new cursor. The earliest valid choice maximizes the
/// set of future closures, which makes the search complete for the
/// "some increasing selection exists" predicate.
///
/// Worst-case cost is exponential in `max_cycle_length`; the small depth
/// cap and the upstream batch limit keep it tractable.
pub fn find_temporal_cycles(graph: &TransactionGraph, config: &DetectionConfig) -> Vec<TemporalCycle> {
    let mut cycles = Vec::new();

    for start in graph.accounts() {
        for next in graph.successors(&start) {
            let Some(edge) = graph.edge(&start, &next) else {
                continue;
            };
            for &seed_ts in &edge.timestamps {
                let mut path = vec![start.clone(), next.clone()];
                extend_path(graph, config, &mut path, seed_ts, &mut cycles);
            }
        }
    }

    deduplicate_cycles(&mut cycles);
    cycles
}

fn extend_path(
    graph: &TransactionGraph,
    config: &DetectionConfig,
    path: &mut Vec<AccountId>,
    cursor: DateTime<Utc>,
    cycles: &mut Vec<TemporalCycle>,
) {
    if path.len() > config.max_cycle_length {
        return;
    }

    let current = path.last().expect("path is never empty").clone();

    // Close back to the start if the final hop can happen after the cursor.
    if path.len() >= config.min_cycle_length {
        let start = &path[0];
        if let Some(edge) = graph.edge(&current, start) {
            if edge.has_timestamp_after(cursor) {
                let mut nodes = path.clone();
                nodes.push(start.clone());
                cycles.push(TemporalCycle { nodes });
            }
        }
    }

    for neighbor in graph.successors(&current) {
        if path.contains(&neighbor) {
            continue;
        }
        let Some(edge) = graph.edge(&current, &neighbor) else {
            continue;
        };
        if let Some(next_cursor) = edge.earliest_timestamp_after(cursor) {
            path.push(neighbor);
            extend_path(graph, config, path, next_cursor, cycles);
            path.pop();
        }
    }
}

/// Remove cycles that are rotations of an earlier one.
fn deduplicate_cycles(cycles: &mut Vec<TemporalCycle>) {
    let mut seen: HashSet<Vec<AccountId>> = HashSet::new();
    cycles.retain(|cycle| seen.insert(canonical_form(cycle.members())));
}

/// Normalize a cycle's member list to its smallest rotation.
///
/// Direction is preserved: `A→B→C` and `A→C→B` stay distinct.
fn canonical_form(members: &[AccountId]) -> Vec<AccountId> {
    if members.is_empty() {
        return Vec::new();
    }
    let n = members.len();
    let mut best = members.to_vec();
    for i in 1..n {
        let rotated: Vec<AccountId> = members[i..]
            .iter()
            .chain(members[..i].iter())
            .cloned()
            .collect();
        if rotated < best {
            best = rotated;
        }
    }
    best
}
