use serde::{Deserialize, Serialize};

/// Rule thresholds and scoring weights for a detection run.
///
/// The configuration is injected by value at the orchestrator and passed
/// down to each detector as an explicit argument; nothing in the engine
/// reads a hidden singleton or the environment.
///
/// Defaults reproduce the production rule set: the four weights sum to
/// 0.95 so a node flagged by every detector lands at 95 before the
/// [0, 100] clamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Absolute minimum burst count before a node can be reported for fan-out.
    pub fan_out_threshold: usize,
    /// Absolute minimum burst count before a node can be reported for fan-in.
    pub fan_in_threshold: usize,
    /// Statistical threshold multiplier: mean + sigma * std-dev of degrees.
    pub degree_outlier_sigma: f64,

    /// Minimum cycle length in distinct nodes.
    pub min_cycle_length: usize,
    /// Maximum cycle length in distinct nodes.
    pub max_cycle_length: usize,

    /// Width of the sliding window used by the fan detectors.
    pub temporal_window_hours: i64,

    /// Minimum number of hops for a laundering chain.
    pub shell_min_hops: usize,
    /// Maximum total degree for an account to count as a shell candidate.
    pub shell_max_intermediate_tx: usize,

    /// Scoring weights.
    pub weight_cycle: f64,
    pub weight_commission: f64,
    pub weight_smurfing: f64,
    pub weight_shell: f64,

    /// Base scores applied when a detector hits.
    pub score_cycle_detected: f64,
    pub score_commission_retention: f64,
    pub score_smurf_detected: f64,
    pub score_shell_detected: f64,

    /// Deduction applied to likely merchants (high fan-in, no fan-out, no cycle).
    pub merchant_deduction: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            fan_out_threshold: 10,
            fan_in_threshold: 10,
            degree_outlier_sigma: 2.0,

            min_cycle_length: 3,
            max_cycle_length: 5,

            temporal_window_hours: 72,

            shell_min_hops: 3,
            shell_max_intermediate_tx: 3,

            weight_cycle: 0.50,
            weight_commission: 0.15,
            weight_smurfing: 0.15,
            weight_shell: 0.15,

            score_cycle_detected: 100.0,
            score_commission_retention: 100.0,
            score_smurf_detected: 100.0,
            score_shell_detected: 100.0,

            merchant_deduction: 50.0,
        }
    }
}
