use crate::core::account::AccountId;
use crate::core::config::DetectionConfig;
use crate::graph::transaction_graph::TransactionGraph;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

/// Report for one account exceeding the fan threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct FanActivity {
    /// Maximum number of transfers inside any sliding window.
    pub burst_count: usize,
    /// The threshold that was in force, kept for explainability.
    pub threshold_used: f64,
    /// Counterparty accounts (targets for fan-out, sources for fan-in).
    pub counterparties: Vec<AccountId>,
}

/// Accounts dispersing funds to many counterparties in a tight burst.
///
/// The threshold adapts to the graph: `max(absolute_min, mean + sigma *
/// std-dev)` over all out-degrees. Fixed thresholds misclassify either
/// small graphs (too many alerts) or dense ones (too few); the floor
/// protects small graphs while the statistical term scales with density.
pub fn detect_fan_out(
    graph: &TransactionGraph,
    config: &DetectionConfig,
) -> BTreeMap<AccountId, FanActivity> {
    let accounts = graph.accounts();
    let degrees: Vec<usize> = accounts.iter().map(|a| graph.out_degree(a)).collect();
    let threshold = dynamic_threshold(&degrees, config.fan_out_threshold, config.degree_outlier_sigma);

    let mut suspects = BTreeMap::new();
    for account in &accounts {
        let counterparties = graph.successors(account);
        let mut timestamps = edge_timestamps(graph, account, &counterparties, true);
        let burst_count = max_window_count(&mut timestamps, config.temporal_window_hours);
        if burst_count as f64 >= threshold {
            suspects.insert(
                account.clone(),
                FanActivity {
                    burst_count,
                    threshold_used: round2(threshold),
                    counterparties,
                },
            );
        }
    }
    suspects
}

/// Accounts collecting funds from many counterparties in a tight burst.
///
/// Mirror image of [`detect_fan_out`] over incoming edges.
pub fn detect_fan_in(
    graph: &TransactionGraph,
    config: &DetectionConfig,
) -> BTreeMap<AccountId, FanActivity> {
    let accounts = graph.accounts();
    let degrees: Vec<usize> = accounts.iter().map(|a| graph.in_degree(a)).collect();
    let threshold = dynamic_threshold(&degrees, config.fan_in_threshold, config.degree_outlier_sigma);

    let mut suspects = BTreeMap::new();
    for account in &accounts {
        let counterparties = graph.predecessors(account);
        let mut timestamps = edge_timestamps(graph, account, &counterparties, false);
        let burst_count = max_window_count(&mut timestamps, config.temporal_window_hours);
        if burst_count as f64 >= threshold {
            suspects.insert(
                account.clone(),
                FanActivity {
                    burst_count,
                    threshold_used: round2(threshold),
                    counterparties,
                },
            );
        }
    }
    suspects
}

/// Threshold from the degree distribution: `max(absolute_min, mean + sigma * std)`.
///
/// An empty distribution yields the floor; a zero std-dev degenerates to
/// `max(absolute_min, mean)`.
fn dynamic_threshold(degrees: &[usize], absolute_min: usize, sigma: f64) -> f64 {
    if degrees.is_empty() {
        return absolute_min as f64;
    }
    let n = degrees.len() as f64;
    let mean = degrees.iter().map(|&d| d as f64).sum::<f64>() / n;
    let variance = degrees
        .iter()
        .map(|&d| {
            let diff = d as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    let statistical_limit = mean + variance.sqrt() * sigma;
    (absolute_min as f64).max(statistical_limit)
}

/// Every timestamp on the account's outgoing (or incoming) edges.
fn edge_timestamps(
    graph: &TransactionGraph,
    account: &AccountId,
    counterparties: &[AccountId],
    outgoing: bool,
) -> Vec<DateTime<Utc>> {
    let mut timestamps = Vec::new();
    for other in counterparties {
        let edge = if outgoing {
            graph.edge(account, other)
        } else {
            graph.edge(other, account)
        };
        if let Some(edge) = edge {
            timestamps.extend_from_slice(&edge.timestamps);
        }
    }
    timestamps
}

/// Maximum number of timestamps inside any sliding window of the given
/// width. Two-pointer sweep over the sorted list; bucketed counters are
/// deliberately avoided since they miss bursts straddling a bucket edge.
fn max_window_count(timestamps: &mut Vec<DateTime<Utc>>, window_hours: i64) -> usize {
    if timestamps.is_empty() {
        return 0;
    }
    timestamps.sort_unstable();
    let window = Duration::hours(window_hours);

    let mut max_count = 0;
    let mut left = 0;
    for right in 0..timestamps.len() {
        while timestamps[right] - timestamps[left] > window {
            left += 1;
        }
        max_count = max_count.max(right - left + 1);
    }
    max_count
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
