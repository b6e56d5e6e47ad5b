use crate::core::account::AccountId;
use crate::core::transaction::{Transaction, TransactionBatch};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// All underlying transfers between one ordered account pair.
///
/// The three lists are parallel and preserve input order; the fan
/// detectors scan `timestamps` with a sliding window, so the order in
/// which records entered the batch must survive aggregation.
#[derive(Debug, Clone, Default)]
pub struct EdgeAggregate {
    /// Transferred amounts, in input order.
    pub amounts: Vec<Decimal>,
    /// Timestamps parallel to `amounts`.
    pub timestamps: Vec<DateTime<Utc>>,
    /// Source transaction ids parallel to `amounts`.
    pub tx_ids: Vec<String>,
    /// Running sum of `amounts`.
    pub total_amount: Decimal,
    /// Number of underlying transactions.
    pub count: usize,
}

impl EdgeAggregate {
    fn append(&mut self, amount: Decimal, timestamp: DateTime<Utc>, tx_id: &str) {
        self.amounts.push(amount);
        self.timestamps.push(timestamp);
        self.tx_ids.push(tx_id.to_string());
        self.total_amount += amount;
        self.count += 1;
    }

    /// True when any timestamp on this edge is strictly after `after`.
    pub fn has_timestamp_after(&self, after: DateTime<Utc>) -> bool {
        self.timestamps.iter().any(|ts| *ts > after)
    }

    /// Earliest timestamp on this edge strictly after `after`, if any.
    pub fn earliest_timestamp_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.timestamps.iter().copied().filter(|ts| *ts > after).min()
    }
}

/// A directed temporal multigraph of money movement between accounts.
///
/// Materialized as a simple digraph whose edges carry the full list of
/// underlying transfers (see [`EdgeAggregate`]); this avoids a
/// parallel-edge explosion during cycle search while keeping every
/// timestamp available for temporal constraints.
///
/// Self-transfers are dropped at construction. Account and successor
/// iteration is id-sorted so detector output is reproducible.
///
/// # Examples
///
/// ```
/// use fraud_engine::core::account::AccountId;
/// use fraud_engine::core::transaction::Transaction;
/// use fraud_engine::graph::transaction_graph::TransactionGraph;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal_macros::dec;
///
/// let mut graph = TransactionGraph::new();
/// graph.add_transaction(&Transaction::new(
///     "TX-1",
///     AccountId::new("A"),
///     AccountId::new("B"),
///     dec!(100),
///     Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(),
/// ));
///
/// assert_eq!(graph.account_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionGraph {
    /// Aggregated edges: (sender, receiver) -> underlying transfers.
    edges: HashMap<(AccountId, AccountId), EdgeAggregate>,
    /// Distinct successors per account, in first-seen order.
    out_adj: HashMap<AccountId, Vec<AccountId>>,
    /// Distinct predecessors per account, in first-seen order.
    in_adj: HashMap<AccountId, Vec<AccountId>>,
    /// All known accounts.
    accounts: HashSet<AccountId>,
    /// Number of transactions folded in (self-transfers excluded).
    transaction_count: usize,
}

impl TransactionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a single transaction into the graph.
    ///
    /// Self-transfers are discarded silently.
    pub fn add_transaction(&mut self, tx: &Transaction) {
        if tx.is_self_transfer() {
            return;
        }
        let sender = tx.sender().clone();
        let receiver = tx.receiver().clone();

        let key = (sender.clone(), receiver.clone());
        if !self.edges.contains_key(&key) {
            self.out_adj
                .entry(sender.clone())
                .or_default()
                .push(receiver.clone());
            self.in_adj
                .entry(receiver.clone())
                .or_default()
                .push(sender.clone());
        }
        self.edges
            .entry(key)
            .or_default()
            .append(tx.amount(), tx.timestamp(), tx.id());

        self.accounts.insert(sender);
        self.accounts.insert(receiver);
        self.transaction_count += 1;
    }

    /// Build a graph from a validated batch. Pure function of its input.
    pub fn from_batch(batch: &TransactionBatch) -> Self {
        let mut graph = Self::new();
        for tx in batch.transactions() {
            graph.add_transaction(tx);
        }
        graph
    }

    /// Number of unique accounts in the graph.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Number of aggregated directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of transactions folded in (self-transfers excluded).
    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }

    pub fn contains_account(&self, account: &AccountId) -> bool {
        self.accounts.contains(account)
    }

    /// All accounts, sorted by id for deterministic iteration.
    pub fn accounts(&self) -> Vec<AccountId> {
        let mut accounts: Vec<AccountId> = self.accounts.iter().cloned().collect();
        accounts.sort();
        accounts
    }

    /// The aggregate for a directed pair, if any transfer exists.
    pub fn edge(&self, sender: &AccountId, receiver: &AccountId) -> Option<&EdgeAggregate> {
        self.edges.get(&(sender.clone(), receiver.clone()))
    }

    /// Aggregated amount moved from `sender` to `receiver` (zero if no edge).
    pub fn edge_total(&self, sender: &AccountId, receiver: &AccountId) -> Decimal {
        self.edge(sender, receiver)
            .map(|e| e.total_amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// All edges as (sender, receiver, aggregate).
    pub fn edges(&self) -> impl Iterator<Item = (&AccountId, &AccountId, &EdgeAggregate)> {
        self.edges.iter().map(|((s, r), agg)| (s, r, agg))
    }

    /// Distinct successors of an account, sorted by id.
    pub fn successors(&self, account: &AccountId) -> Vec<AccountId> {
        let mut next = self.out_adj.get(account).cloned().unwrap_or_default();
        next.sort();
        next
    }

    /// Distinct predecessors of an account, sorted by id.
    pub fn predecessors(&self, account: &AccountId) -> Vec<AccountId> {
        let mut prev = self.in_adj.get(account).cloned().unwrap_or_default();
        prev.sort();
        prev
    }

    /// Number of distinct outgoing edges.
    pub fn out_degree(&self, account: &AccountId) -> usize {
        self.out_adj.get(account).map(Vec::len).unwrap_or(0)
    }

    /// Number of distinct incoming edges.
    pub fn in_degree(&self, account: &AccountId) -> usize {
        self.in_adj.get(account).map(Vec::len).unwrap_or(0)
    }

    /// Total degree: incoming plus outgoing edges.
    pub fn degree(&self, account: &AccountId) -> usize {
        self.in_degree(account) + self.out_degree(account)
    }

    /// Distinct neighbors on the undirected view, sorted by id.
    pub fn undirected_neighbors(&self, account: &AccountId) -> Vec<AccountId> {
        let mut neighbors = self.successors(account);
        neighbors.extend(self.predecessors(account));
        neighbors.sort();
        neighbors.dedup();
        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    fn tx(id: &str, from: &str, to: &str, amount: Decimal, hour: u32) -> Transaction {
        Transaction::new(id, AccountId::new(from), AccountId::new(to), amount, ts(hour))
    }

    #[test]
    fn test_graph_basic() {
        let mut graph = TransactionGraph::new();
        graph.add_transaction(&tx("TX-1", "A", "B", dec!(100), 9));
        graph.add_transaction(&tx("TX-2", "B", "C", dec!(200), 10));

        assert_eq!(graph.account_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.transaction_count(), 2);
        assert_eq!(graph.edge_total(&AccountId::new("A"), &AccountId::new("B")), dec!(100));
    }

    #[test]
    fn test_edge_aggregation_preserves_order() {
        let mut graph = TransactionGraph::new();
        graph.add_transaction(&tx("TX-1", "A", "B", dec!(100), 9));
        graph.add_transaction(&tx("TX-2", "A", "B", dec!(50), 11));

        let edge = graph.edge(&AccountId::new("A"), &AccountId::new("B")).unwrap();
        assert_eq!(edge.count, 2);
        assert_eq!(edge.amounts, vec![dec!(100), dec!(50)]);
        assert_eq!(edge.timestamps, vec![ts(9), ts(11)]);
        assert_eq!(edge.tx_ids, vec!["TX-1", "TX-2"]);
        assert_eq!(edge.total_amount, dec!(150));
    }

    #[test]
    fn test_self_transfer_dropped() {
        let mut graph = TransactionGraph::new();
        graph.add_transaction(&tx("TX-1", "A", "A", dec!(100), 9));

        assert_eq!(graph.account_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.transaction_count(), 0);
    }

    #[test]
    fn test_degrees() {
        let mut graph = TransactionGraph::new();
        graph.add_transaction(&tx("TX-1", "A", "B", dec!(100), 9));
        graph.add_transaction(&tx("TX-2", "C", "B", dec!(100), 10));
        graph.add_transaction(&tx("TX-3", "B", "D", dec!(100), 11));
        // Repeat transfer on an existing pair must not grow the degree.
        graph.add_transaction(&tx("TX-4", "A", "B", dec!(70), 12));

        let b = AccountId::new("B");
        assert_eq!(graph.in_degree(&b), 2);
        assert_eq!(graph.out_degree(&b), 1);
        assert_eq!(graph.degree(&b), 3);
        assert_eq!(graph.successors(&b), vec![AccountId::new("D")]);
        assert_eq!(
            graph.predecessors(&b),
            vec![AccountId::new("A"), AccountId::new("C")]
        );
    }

    #[test]
    fn test_earliest_timestamp_after() {
        let mut graph = TransactionGraph::new();
        graph.add_transaction(&tx("TX-1", "A", "B", dec!(100), 12));
        graph.add_transaction(&tx("TX-2", "A", "B", dec!(100), 9));

        let edge = graph.edge(&AccountId::new("A"), &AccountId::new("B")).unwrap();
        assert_eq!(edge.earliest_timestamp_after(ts(8)), Some(ts(9)));
        assert_eq!(edge.earliest_timestamp_after(ts(9)), Some(ts(12)));
        assert_eq!(edge.earliest_timestamp_after(ts(12)), None);
        assert!(edge.has_timestamp_after(ts(11)));
        assert!(!edge.has_timestamp_after(ts(12)));
    }

    #[test]
    fn test_accounts_sorted() {
        let mut graph = TransactionGraph::new();
        graph.add_transaction(&tx("TX-1", "C", "A", dec!(10), 9));
        graph.add_transaction(&tx("TX-2", "B", "C", dec!(10), 10));

        let accounts = graph.accounts();
        let ids: Vec<&str> = accounts.iter().map(|a| a.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }
}
