use crate::core::account::AccountId;
use crate::graph::transaction_graph::TransactionGraph;
use petgraph::unionfind::UnionFind;
use std::collections::HashMap;

/// Weakly connected components of the graph's undirected view.
///
/// Components are returned with their members sorted by id, ordered by
/// their smallest member. Scoring attaches each node's component size to
/// its detail record; investigators use it to gauge how much of the
/// network a suspect touches.
pub fn connected_components(graph: &TransactionGraph) -> Vec<Vec<AccountId>> {
    let accounts = graph.accounts();
    let index: HashMap<&AccountId, usize> = accounts
        .iter()
        .enumerate()
        .map(|(i, a)| (a, i))
        .collect();

    let mut uf = UnionFind::<usize>::new(accounts.len());
    for (sender, receiver, _) in graph.edges() {
        uf.union(index[sender], index[receiver]);
    }

    let mut by_root: HashMap<usize, Vec<AccountId>> = HashMap::new();
    for (i, account) in accounts.iter().enumerate() {
        by_root.entry(uf.find(i)).or_default().push(account.clone());
    }

    let mut components: Vec<Vec<AccountId>> = by_root.into_values().collect();
    // Members are pushed in sorted account order already; sort the
    // components themselves by their smallest member.
    components.sort_by(|a, b| a[0].cmp(&b[0]));
    components
}

/// Size of the containing component for every account.
pub fn component_sizes(graph: &TransactionGraph) -> HashMap<AccountId, usize> {
    let mut sizes = HashMap::new();
    for component in connected_components(graph) {
        let size = component.len();
        for account in component {
            sizes.insert(account, size);
        }
    }
    sizes
}
