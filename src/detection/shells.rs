use crate::core::account::AccountId;
use crate::core::config::DetectionConfig;
use crate::graph::transaction_graph::TransactionGraph;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use std::collections::HashMap;

/// Long chains of low-activity pass-through accounts.
///
/// Genuine laundering shells show two signatures: minimal activity (the
/// account exists only to forward money) and a long chain. Restricting
/// the graph to accounts whose total degree is at most
/// `shell_max_intermediate_tx` cheaply isolates the candidate substrate;
/// the longest directed path of each weakly connected component then
/// recovers the chain.
///
/// Components that are not DAGs are skipped — a cycle inside a
/// low-activity cluster is the cycle detector's territory.
pub fn detect_shell_chains(
    graph: &TransactionGraph,
    config: &DetectionConfig,
) -> Vec<Vec<AccountId>> {
    let candidates: Vec<AccountId> = graph
        .accounts()
        .into_iter()
        .filter(|a| graph.degree(a) <= config.shell_max_intermediate_tx)
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }

    // Induced subgraph over the candidates.
    let mut sub: DiGraph<AccountId, ()> = DiGraph::new();
    let mut index: HashMap<AccountId, NodeIndex> = HashMap::new();
    for account in &candidates {
        index.insert(account.clone(), sub.add_node(account.clone()));
    }
    for account in &candidates {
        for next in graph.successors(account) {
            if let Some(&target) = index.get(&next) {
                sub.add_edge(index[account], target, ());
            }
        }
    }

    // Weakly connected components of the induced subgraph.
    let mut uf = UnionFind::<usize>::new(sub.node_count());
    for edge in sub.edge_indices() {
        let (a, b) = sub.edge_endpoints(edge).expect("edge exists");
        uf.union(a.index(), b.index());
    }
    let mut components: HashMap<usize, Vec<NodeIndex>> = HashMap::new();
    for node in sub.node_indices() {
        components.entry(uf.find(node.index())).or_default().push(node);
    }
    let mut roots: Vec<usize> = components.keys().copied().collect();
    roots.sort();

    let mut chains = Vec::new();
    for root in roots {
        let component = &components[&root];
        if component.len() < config.shell_min_hops.saturating_sub(1) {
            continue;
        }
        if let Some(path) = longest_directed_path(&sub, component) {
            if path.len() >= config.shell_min_hops {
                chains.push(path);
            }
        }
    }
    chains
}

/// Longest directed path within one component of the subgraph, or `None`
/// when the component contains a directed cycle.
fn longest_directed_path(
    sub: &DiGraph<AccountId, ()>,
    component: &[NodeIndex],
) -> Option<Vec<AccountId>> {
    // Re-project the component into its own graph so a cycle elsewhere
    // cannot poison the topological sort.
    let mut local: DiGraph<AccountId, ()> = DiGraph::new();
    let mut to_local: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    for &node in component {
        to_local.insert(node, local.add_node(sub[node].clone()));
    }
    for &node in component {
        for next in sub.neighbors(node) {
            if let Some(&target) = to_local.get(&next) {
                local.add_edge(to_local[&node], target, ());
            }
        }
    }

    let order = toposort(&local, None).ok()?;

    // Longest-path DP over the topological order, measured in edges.
    let mut dist: HashMap<NodeIndex, usize> = HashMap::new();
    let mut pred: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    for &node in &order {
        let here = *dist.entry(node).or_insert(0);
        for next in local.neighbors(node) {
            if here + 1 > *dist.get(&next).unwrap_or(&0) {
                dist.insert(next, here + 1);
                pred.insert(next, node);
            }
        }
    }

    let mut end = *order.first()?;
    let mut best = 0;
    for &node in &order {
        let d = *dist.get(&node).unwrap_or(&0);
        if d > best {
            best = d;
            end = node;
        }
    }

    let mut path = vec![local[end].clone()];
    let mut cursor = end;
    while let Some(&prev) = pred.get(&cursor) {
        path.push(local[prev].clone());
        cursor = prev;
    }
    path.reverse();
    Some(path)
}
