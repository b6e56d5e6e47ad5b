//! Risk scoring and ring packaging.

pub mod node_score;
pub mod rings;
