use crate::core::account::AccountId;
use crate::core::config::DetectionConfig;
use crate::detection::cycles::TemporalCycle;
use crate::detection::fan::FanActivity;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Behavioral role assigned to a scored account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Mule,
    Originator,
    Participant,
}

/// Flags and context attached to a scored account.
#[derive(Debug, Clone, Serialize)]
pub struct NodeDetails {
    pub cycles: u8,
    pub smurfing: u8,
    pub shells: u8,
    pub role: Role,
    pub degree: usize,
    pub cluster_size: usize,
}

/// A suspicious account with its bounded risk score.
#[derive(Debug, Clone, Serialize)]
pub struct NodeScore {
    pub id: AccountId,
    pub risk_score: f64,
    pub details: NodeDetails,
}

/// Frozen detector outputs consumed by the scorer.
///
/// Membership sets are precomputed once so per-node scoring stays O(1).
#[derive(Debug, Default)]
pub struct DetectorFindings {
    pub cycles: Vec<TemporalCycle>,
    pub cycle_members: HashSet<AccountId>,
    pub commission_members: HashSet<AccountId>,
    pub fan_out: BTreeMap<AccountId, FanActivity>,
    pub fan_in: BTreeMap<AccountId, FanActivity>,
    pub shells: Vec<Vec<AccountId>>,
    pub shell_members: HashSet<AccountId>,
}

impl DetectorFindings {
    pub fn new(
        cycles: Vec<TemporalCycle>,
        commission_members: HashSet<AccountId>,
        fan_out: BTreeMap<AccountId, FanActivity>,
        fan_in: BTreeMap<AccountId, FanActivity>,
        shells: Vec<Vec<AccountId>>,
    ) -> Self {
        let cycle_members = cycles
            .iter()
            .flat_map(|c| c.members().iter().cloned())
            .collect();
        let shell_members = shells.iter().flatten().cloned().collect();
        Self {
            cycles,
            cycle_members,
            commission_members,
            fan_out,
            fan_in,
            shells,
            shell_members,
        }
    }
}

/// Weighted fusion of the detector hits into a bounded risk score.
///
/// Each hit contributes `base_score * weight`; a likely merchant — pure
/// fan-in with no redistribution and no cycle — takes a deduction before
/// the final clamp to [0, 100].
pub fn risk_score(
    account: &AccountId,
    findings: &DetectorFindings,
    config: &DetectionConfig,
) -> f64 {
    let in_cycle = findings.cycle_members.contains(account);
    let in_commission = findings.commission_members.contains(account);
    let has_fan_in = findings.fan_in.contains_key(account);
    let has_fan_out = findings.fan_out.contains_key(account);
    let is_smurfing = has_fan_in || has_fan_out;
    let in_shell = findings.shell_members.contains(account);

    let mut raw = 0.0;
    if in_cycle {
        raw += config.score_cycle_detected * config.weight_cycle;
    }
    if in_commission {
        raw += config.score_commission_retention * config.weight_commission;
    }
    if is_smurfing {
        raw += config.score_smurf_detected * config.weight_smurfing;
    }
    if in_shell {
        raw += config.score_shell_detected * config.weight_shell;
    }

    let is_merchant = has_fan_in && !has_fan_out && !in_cycle;
    if is_merchant {
        raw -= config.merchant_deduction;
    }

    raw.clamp(0.0, 100.0)
}

/// Risk score promoted to at least 50 for accounts the clusterer flagged
/// as mules but the graph detectors missed entirely.
pub const MULE_PROMOTION_SCORE: f64 = 50.0;

/// Score every account of the graph, keeping only positive scores.
///
/// Clusterer mules with a zero graph score are promoted to
/// [`MULE_PROMOTION_SCORE`] to preserve recall. The result is sorted by
/// score descending (ties by account id, keeping output reproducible).
pub fn score_accounts(
    accounts: &[AccountId],
    findings: &DetectorFindings,
    cluster_mules: &HashSet<AccountId>,
    degrees: &HashMap<AccountId, usize>,
    component_sizes: &HashMap<AccountId, usize>,
    config: &DetectionConfig,
) -> Vec<NodeScore> {
    let mut scores = Vec::new();

    for account in accounts {
        let mut score = risk_score(account, findings, config);

        let is_cluster_mule = cluster_mules.contains(account);
        if is_cluster_mule && score == 0.0 {
            score = MULE_PROMOTION_SCORE;
        }
        if score <= 0.0 {
            continue;
        }

        let is_mule = findings.fan_in.contains_key(account) || is_cluster_mule;
        let is_originator = findings.fan_out.contains_key(account);
        let role = if is_mule {
            Role::Mule
        } else if is_originator {
            Role::Originator
        } else {
            Role::Participant
        };

        scores.push(NodeScore {
            id: account.clone(),
            risk_score: score,
            details: NodeDetails {
                cycles: findings.cycle_members.contains(account) as u8,
                smurfing: (is_originator || is_mule) as u8,
                shells: findings.shell_members.contains(account) as u8,
                role,
                degree: degrees.get(account).copied().unwrap_or(0),
                cluster_size: component_sizes.get(account).copied().unwrap_or(0),
            },
        });
    }

    scores.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str) -> AccountId {
        AccountId::new(id)
    }

    fn fan_hit() -> FanActivity {
        FanActivity {
            burst_count: 12,
            threshold_used: 10.0,
            counterparties: vec![],
        }
    }

    fn findings_with(
        cycle: Option<&[&str]>,
        commission: &[&str],
        fan_in: &[&str],
        fan_out: &[&str],
        shell: &[&str],
    ) -> DetectorFindings {
        let cycles = cycle
            .map(|nodes| {
                let mut closed: Vec<AccountId> = nodes.iter().map(|n| account(n)).collect();
                closed.push(account(nodes[0]));
                vec![TemporalCycle { nodes: closed }]
            })
            .unwrap_or_default();
        DetectorFindings::new(
            cycles,
            commission.iter().map(|n| account(n)).collect(),
            fan_out.iter().map(|n| (account(n), fan_hit())).collect(),
            fan_in.iter().map(|n| (account(n), fan_hit())).collect(),
            if shell.is_empty() {
                vec![]
            } else {
                vec![shell.iter().map(|n| account(n)).collect()]
            },
        )
    }

    #[test]
    fn test_cycle_plus_commission_score() {
        let findings = findings_with(Some(&["A", "B", "C"][..]), &["A", "B", "C"], &[], &[], &[]);
        let config = DetectionConfig::default();
        let score = risk_score(&account("A"), &findings, &config);
        assert!((score - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_cycle_only_score() {
        let findings = findings_with(Some(&["A", "B", "C"][..]), &[], &[], &[], &[]);
        let score = risk_score(&account("A"), &findings, &DetectionConfig::default());
        assert!((score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_merchant_deduction_clamps_to_zero() {
        // Fan-in only, no fan-out, no cycle: 15 - 50 clamps at 0.
        let findings = findings_with(None, &[], &["M"], &[], &[]);
        let score = risk_score(&account("M"), &findings, &DetectionConfig::default());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_fan_out_escapes_merchant_deduction() {
        let findings = findings_with(None, &[], &["M"], &["M"], &[]);
        let score = risk_score(&account("M"), &findings, &DetectionConfig::default());
        assert!((score - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_hits_bounded() {
        let findings = findings_with(
            Some(&["A", "B", "C"]),
            &["A"],
            &["A"],
            &["A"],
            &["A", "B", "C"],
        );
        let score = risk_score(&account("A"), &findings, &DetectionConfig::default());
        assert!(score <= 100.0);
        assert!((score - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_mule_promotion() {
        let findings = findings_with(None, &[], &[], &[], &[]);
        let cluster_mules: HashSet<AccountId> = [account("Q")].into_iter().collect();
        let accounts = vec![account("Q"), account("R")];
        let scores = score_accounts(
            &accounts,
            &findings,
            &cluster_mules,
            &HashMap::new(),
            &HashMap::new(),
            &DetectionConfig::default(),
        );
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].id, account("Q"));
        assert_eq!(scores[0].risk_score, MULE_PROMOTION_SCORE);
        assert_eq!(scores[0].details.role, Role::Mule);
        assert_eq!(scores[0].details.smurfing, 1);
    }

    #[test]
    fn test_roles() {
        // IN sits on a cycle so the merchant deduction stays out of the way.
        let findings = findings_with(Some(&["IN", "X", "Y"][..]), &[], &["IN"], &["OUT"], &["IN", "OUT", "MID"]);
        let accounts = vec![account("IN"), account("MID"), account("OUT")];
        let scores = score_accounts(
            &accounts,
            &findings,
            &HashSet::new(),
            &HashMap::new(),
            &HashMap::new(),
            &DetectionConfig::default(),
        );
        let by_id: HashMap<&str, &NodeScore> =
            scores.iter().map(|s| (s.id.as_str(), s)).collect();
        assert_eq!(by_id["IN"].details.role, Role::Mule);
        assert_eq!(by_id["OUT"].details.role, Role::Originator);
        assert_eq!(by_id["MID"].details.role, Role::Participant);
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let findings = findings_with(Some(&["A", "B", "C"][..]), &[], &[], &[], &[]);
        let accounts = vec![account("C"), account("B"), account("A")];
        let scores = score_accounts(
            &accounts,
            &findings,
            &HashSet::new(),
            &HashMap::new(),
            &HashMap::new(),
            &DetectionConfig::default(),
        );
        let ids: Vec<&str> = scores.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }
}
