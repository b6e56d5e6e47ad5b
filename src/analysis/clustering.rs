use crate::core::account::AccountId;
use crate::core::transaction::TransactionBatch;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Maximum number of sender accounts reported in the `websites` class.
const MAX_WEBSITES: usize = 20;

/// One classified account with the tabular stats that put it there.
///
/// Field names are contractual for downstream consumers.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterAccount {
    pub id: AccountId,
    #[serde(rename = "txCount")]
    pub tx_count: usize,
    #[serde(rename = "totalAmount")]
    pub total_amount: Decimal,
    #[serde(rename = "uniqueSenders", skip_serializing_if = "Option::is_none")]
    pub unique_senders: Option<usize>,
    #[serde(rename = "uniqueReceivers", skip_serializing_if = "Option::is_none")]
    pub unique_receivers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Filled by the orchestrator's enrichment pass.
    pub is_commission: bool,
    /// Display-only heuristic; never consulted by scoring.
    pub fan_in_out_ratio: f64,
}

/// Heuristic classification of the raw batch into account clusters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusterReport {
    pub websites: Vec<ClusterAccount>,
    pub mule_accounts: Vec<ClusterAccount>,
    pub suspected_distribution: Vec<ClusterAccount>,
}

impl ClusterReport {
    /// Ids of accounts classified as mules.
    pub fn mule_ids(&self) -> HashSet<AccountId> {
        self.mule_accounts.iter().map(|m| m.id.clone()).collect()
    }

    /// Total received value across all mule accounts.
    pub fn flagged_amount(&self) -> Decimal {
        self.mule_accounts.iter().map(|m| m.total_amount).sum()
    }

    /// Mutable iterator over every record in every class.
    pub fn accounts_mut(&mut self) -> impl Iterator<Item = &mut ClusterAccount> {
        self.mule_accounts
            .iter_mut()
            .chain(self.suspected_distribution.iter_mut())
            .chain(self.websites.iter_mut())
    }
}

#[derive(Debug, Default)]
struct AccountStats {
    tx_count: usize,
    total_amount: Decimal,
    counterparties: HashSet<AccountId>,
}

/// Quantile-based mule / suspected / website classification.
///
/// A coarse tabular pass, independent of the graph: receivers collecting
/// many transfers from many distinct senders are mules; receivers of
/// outsized value that escaped the mule net are suspected distribution
/// points; the busiest remaining senders are likely websites (payout
/// origins). The scorer consults the mule class to promote accounts the
/// graph detectors missed.
pub fn analyze_clusters(batch: &TransactionBatch) -> ClusterReport {
    let mut recv_stats: BTreeMap<AccountId, AccountStats> = BTreeMap::new();
    let mut send_stats: BTreeMap<AccountId, AccountStats> = BTreeMap::new();

    for tx in batch.transactions() {
        let recv = recv_stats.entry(tx.receiver().clone()).or_default();
        recv.tx_count += 1;
        recv.total_amount += tx.amount();
        recv.counterparties.insert(tx.sender().clone());

        let send = send_stats.entry(tx.sender().clone()).or_default();
        send.tx_count += 1;
        send.total_amount += tx.amount();
        send.counterparties.insert(tx.receiver().clone());
    }

    if recv_stats.is_empty() {
        return ClusterReport::default();
    }

    let mut tx_counts: Vec<usize> = recv_stats.values().map(|s| s.tx_count).collect();
    tx_counts.sort_unstable();
    let mut amounts: Vec<Decimal> = recv_stats.values().map(|s| s.total_amount).collect();
    amounts.sort_unstable();
    let mut sender_counts: Vec<usize> =
        recv_stats.values().map(|s| s.counterparties.len()).collect();
    sender_counts.sort_unstable();

    let recv_tx_threshold = quantile_counts(&tx_counts, 0.80).max(3.0);
    let recv_amount_threshold = quantile_amounts(&amounts, 0.85);
    let sender_threshold = quantile_counts(&sender_counts, 0.75).max(2.0);

    let mut report = ClusterReport::default();
    let mut flagged: HashSet<AccountId> = HashSet::new();

    for (id, stats) in &recv_stats {
        let is_mule = stats.tx_count as f64 >= recv_tx_threshold
            && stats.counterparties.len() as f64 >= sender_threshold;
        if is_mule {
            flagged.insert(id.clone());
            report.mule_accounts.push(ClusterAccount {
                id: id.clone(),
                tx_count: stats.tx_count,
                total_amount: stats.total_amount,
                unique_senders: Some(stats.counterparties.len()),
                unique_receivers: None,
                role: Some("Mule".to_string()),
                is_commission: false,
                fan_in_out_ratio: 0.0,
            });
        } else if stats.total_amount >= recv_amount_threshold {
            flagged.insert(id.clone());
            report.suspected_distribution.push(ClusterAccount {
                id: id.clone(),
                tx_count: stats.tx_count,
                total_amount: stats.total_amount,
                unique_senders: Some(stats.counterparties.len()),
                unique_receivers: None,
                role: None,
                is_commission: false,
                fan_in_out_ratio: 0.0,
            });
        }
    }

    // Busiest senders that were not already flagged as receivers.
    let mut senders: Vec<(&AccountId, &AccountStats)> = send_stats
        .iter()
        .filter(|(id, _)| !flagged.contains(*id))
        .collect();
    senders.sort_by(|a, b| b.1.tx_count.cmp(&a.1.tx_count).then_with(|| a.0.cmp(b.0)));
    for (id, stats) in senders.into_iter().take(MAX_WEBSITES) {
        report.websites.push(ClusterAccount {
            id: id.clone(),
            tx_count: stats.tx_count,
            total_amount: stats.total_amount,
            unique_senders: None,
            unique_receivers: Some(stats.counterparties.len()),
            role: None,
            is_commission: false,
            fan_in_out_ratio: 0.0,
        });
    }

    report
}

/// Linearly interpolated quantile of a sorted count list.
fn quantile_counts(sorted: &[usize], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] as f64 + (sorted[hi] as f64 - sorted[lo] as f64) * frac
}

/// Linearly interpolated quantile of a sorted amount list.
fn quantile_amounts(sorted: &[Decimal], q: f64) -> Decimal {
    if sorted.is_empty() {
        return Decimal::ZERO;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = Decimal::from_f64_retain(pos - lo as f64).unwrap_or(Decimal::ZERO);
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
