use crate::core::account::AccountId;
use crate::pipeline::DetectionResult;
use crate::scoring::node_score::Role;
use crate::scoring::rings::PatternType;
use serde::Serialize;
use std::collections::HashMap;

/// Pattern labels used by downstream case-management tooling.
const PATTERN_CYCLE: &str = "cycle_involved";
const PATTERN_SMURFING: &str = "high_velocity_smurfing";
const PATTERN_SHELL: &str = "layered_shell";
const PATTERN_MULE: &str = "mule_account";

/// Ring label for suspects outside every detected ring.
const NO_RING: &str = "INDIVIDUAL_SUSPECT";

/// One flagged account in the downstream export layout.
#[derive(Debug, Clone, Serialize)]
pub struct SuspiciousAccount {
    pub account_id: AccountId,
    pub suspicion_score: f64,
    pub detected_patterns: Vec<String>,
    pub ring_id: String,
}

/// One fraud ring in the downstream export layout.
#[derive(Debug, Clone, Serialize)]
pub struct FraudRing {
    pub ring_id: String,
    pub member_accounts: Vec<AccountId>,
    pub pattern_type: PatternType,
    pub risk_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub total_accounts_analyzed: usize,
    pub suspicious_accounts_flagged: usize,
    pub fraud_rings_detected: usize,
    pub processing_time_seconds: f64,
}

/// The export envelope consumed by downstream forensic tooling.
#[derive(Debug, Clone, Serialize)]
pub struct ForensicExport {
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    pub fraud_rings: Vec<FraudRing>,
    pub summary: ExportSummary,
}

/// Transform a result envelope into the downstream export layout.
///
/// Rings arrive sorted by risk descending, so each account is assigned
/// the id of its first (highest-risk) containing ring.
pub fn to_forensic_export(result: &DetectionResult) -> ForensicExport {
    let mut node_to_ring: HashMap<&AccountId, &str> = HashMap::new();
    for ring in &result.rings {
        for node in &ring.nodes {
            node_to_ring.entry(node).or_insert(&ring.ring_id);
        }
    }

    let suspicious_accounts = result
        .suspicious_nodes
        .iter()
        .map(|node| {
            let mut detected_patterns = Vec::new();
            if node.details.cycles == 1 {
                detected_patterns.push(PATTERN_CYCLE.to_string());
            }
            if node.details.smurfing == 1 {
                detected_patterns.push(PATTERN_SMURFING.to_string());
            }
            if node.details.shells == 1 {
                detected_patterns.push(PATTERN_SHELL.to_string());
            }
            if node.details.role == Role::Mule {
                detected_patterns.push(PATTERN_MULE.to_string());
            }

            SuspiciousAccount {
                account_id: node.id.clone(),
                suspicion_score: node.risk_score,
                detected_patterns,
                ring_id: node_to_ring
                    .get(&node.id)
                    .copied()
                    .unwrap_or(NO_RING)
                    .to_string(),
            }
        })
        .collect();

    let fraud_rings = result
        .rings
        .iter()
        .map(|ring| FraudRing {
            ring_id: ring.ring_id.clone(),
            member_accounts: ring.nodes.clone(),
            pattern_type: ring.pattern_type,
            risk_score: ring.risk_score,
        })
        .collect();

    ForensicExport {
        suspicious_accounts,
        fraud_rings,
        summary: ExportSummary {
            total_accounts_analyzed: result.analyzed_accounts,
            suspicious_accounts_flagged: result.suspicious_nodes.len(),
            fraud_rings_detected: result.rings.len(),
            processing_time_seconds: result.processing_seconds,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DetectionConfig;
    use crate::core::transaction::{Transaction, TransactionBatch};
    use crate::pipeline::DetectionEngine;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn tx(id: &str, from: &str, to: &str, amount: Decimal, hour: u32) -> Transaction {
        Transaction::new(
            id,
            AccountId::new(from),
            AccountId::new(to),
            amount,
            Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap(),
        )
    }

    fn triangle_result() -> DetectionResult {
        let batch = TransactionBatch::new(vec![
            tx("TX-1", "A", "B", dec!(1000), 9),
            tx("TX-2", "B", "C", dec!(980), 10),
            tx("TX-3", "C", "A", dec!(960.4), 11),
        ])
        .unwrap();
        DetectionEngine::analyze(&batch, &DetectionConfig::default())
    }

    #[test]
    fn test_ring_assignment() {
        let result = triangle_result();
        let export = to_forensic_export(&result);

        assert_eq!(export.fraud_rings.len(), 1);
        let ring_id = &export.fraud_rings[0].ring_id;
        for account in &export.suspicious_accounts {
            assert_eq!(&account.ring_id, ring_id);
            assert!(account
                .detected_patterns
                .contains(&PATTERN_CYCLE.to_string()));
        }
    }

    #[test]
    fn test_summary_counts() {
        let result = triangle_result();
        let export = to_forensic_export(&result);

        assert_eq!(export.summary.total_accounts_analyzed, 3);
        assert_eq!(export.summary.suspicious_accounts_flagged, 3);
        assert_eq!(export.summary.fraud_rings_detected, 1);
        assert!(export.summary.processing_time_seconds >= 0.0);
    }

    #[test]
    fn test_unringed_suspect_labeled_individual() {
        // A fan-in mule with no cycle gets the placeholder ring label.
        let mut txs = Vec::new();
        for i in 0..12 {
            txs.push(tx(
                &format!("TX-{i}"),
                &format!("S{i:02}"),
                "MULE",
                dec!(100),
                9,
            ));
        }
        let batch = TransactionBatch::new(txs).unwrap();
        let result = DetectionEngine::analyze(&batch, &DetectionConfig::default());
        let export = to_forensic_export(&result);

        let mule = export
            .suspicious_accounts
            .iter()
            .find(|a| a.account_id == AccountId::new("MULE"))
            .expect("mule exported");
        assert_eq!(mule.ring_id, NO_RING);
        assert!(mule.detected_patterns.contains(&PATTERN_MULE.to_string()));
    }
}
