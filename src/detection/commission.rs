use crate::core::account::AccountId;
use crate::detection::cycles::TemporalCycle;
use crate::graph::transaction_graph::TransactionGraph;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;

/// Lower bound of the per-hop retention band (1%).
pub const RETENTION_MIN: Decimal = dec!(0.01);
/// Upper bound of the per-hop retention band (5%).
pub const RETENTION_MAX: Decimal = dec!(0.05);

/// Tolerance applied to the inclusive band edges, absorbing accumulated
/// division error on inputs with a few decimal places.
const RETENTION_EPSILON: Decimal = dec!(0.000000001);

/// Accounts participating in at least one cycle whose every measurable
/// hop retains 1–5% of the forwarded value.
///
/// Laundering rings typically skim a small commission at each hop; a
/// cycle that conserves value exactly (or loses a lot of it) is far more
/// likely to be legitimate settlement traffic or noise.
///
/// The check compares *aggregated* edge totals, not the individual
/// transfers selected during cycle search; when an edge carries several
/// transfers of different amounts the retention metric is approximate.
/// This matches the deployed behavior and is kept for compatibility.
pub fn commission_suspects(
    graph: &TransactionGraph,
    cycles: &[TemporalCycle],
) -> HashSet<AccountId> {
    let mut suspects = HashSet::new();
    for cycle in cycles {
        if cycle_retains_commission(graph, cycle) {
            for node in cycle.members() {
                suspects.insert(node.clone());
            }
        }
    }
    suspects
}

/// True when every measurable hop of the cycle retains within the band.
///
/// A missing edge or a zero denominator rejects the cycle.
pub fn cycle_retains_commission(graph: &TransactionGraph, cycle: &TemporalCycle) -> bool {
    let nodes = &cycle.nodes;
    if nodes.len() < 3 {
        return false;
    }

    for i in 0..nodes.len() - 1 {
        if graph.edge(&nodes[i], &nodes[i + 1]).is_none() {
            return false;
        }
        // The last hop has no successor edge to compare against.
        if i + 2 >= nodes.len() {
            continue;
        }
        let inflow = graph.edge_total(&nodes[i], &nodes[i + 1]);
        let outflow = match graph.edge(&nodes[i + 1], &nodes[i + 2]) {
            Some(edge) => edge.total_amount,
            None => return false,
        };
        if inflow <= Decimal::ZERO {
            return false;
        }
        let retention = (inflow - outflow) / inflow;
        if retention < RETENTION_MIN - RETENTION_EPSILON
            || retention > RETENTION_MAX + RETENTION_EPSILON
        {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DetectionConfig;
    use crate::core::transaction::Transaction;
    use crate::detection::cycles::find_temporal_cycles;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    fn tx(id: &str, from: &str, to: &str, amount: Decimal, hour: u32) -> Transaction {
        Transaction::new(id, AccountId::new(from), AccountId::new(to), amount, ts(hour))
    }

    fn triangle(amounts: [Decimal; 3]) -> (TransactionGraph, Vec<TemporalCycle>) {
        let mut graph = TransactionGraph::new();
        graph.add_transaction(&tx("TX-1", "A", "B", amounts[0], 9));
        graph.add_transaction(&tx("TX-2", "B", "C", amounts[1], 10));
        graph.add_transaction(&tx("TX-3", "C", "A", amounts[2], 11));
        let cycles = find_temporal_cycles(&graph, &DetectionConfig::default());
        (graph, cycles)
    }

    #[test]
    fn test_two_percent_skim_qualifies() {
        let (graph, cycles) = triangle([dec!(1000), dec!(980), dec!(960.4)]);
        assert_eq!(cycles.len(), 1);

        let suspects = commission_suspects(&graph, &cycles);
        assert_eq!(suspects.len(), 3);
        assert!(suspects.contains(&AccountId::new("A")));
    }

    #[test]
    fn test_heavy_loss_rejected() {
        // 10% per hop is outside the commission band.
        let (graph, cycles) = triangle([dec!(1000), dec!(900), dec!(810)]);
        assert_eq!(cycles.len(), 1);
        assert!(commission_suspects(&graph, &cycles).is_empty());
    }

    #[test]
    fn test_no_loss_rejected() {
        let (graph, cycles) = triangle([dec!(1000), dec!(1000), dec!(1000)]);
        assert!(commission_suspects(&graph, &cycles).is_empty());
    }

    #[test]
    fn test_band_edges_inclusive() {
        // Exactly 1% then exactly 5%.
        let (graph, cycles) = triangle([dec!(1000), dec!(990), dec!(940.5)]);
        assert!(cycle_retains_commission(&graph, &cycles[0]));
    }

    #[test]
    fn test_just_outside_band_rejected() {
        // 0.99% on the first hop.
        let (graph, cycles) = triangle([dec!(10000), dec!(9901), dec!(9703)]);
        assert!(!cycle_retains_commission(&graph, &cycles[0]));

        // 5.01% on the first hop.
        let (graph, cycles) = triangle([dec!(10000), dec!(9499), dec!(9309)]);
        assert!(!cycle_retains_commission(&graph, &cycles[0]));
    }

    #[test]
    fn test_missing_edge_rejected() {
        let (graph, _) = triangle([dec!(1000), dec!(980), dec!(960.4)]);
        let bogus = TemporalCycle {
            nodes: vec![
                AccountId::new("A"),
                AccountId::new("B"),
                AccountId::new("Z"),
                AccountId::new("A"),
            ],
        };
        assert!(!cycle_retains_commission(&graph, &bogus));
    }
}
