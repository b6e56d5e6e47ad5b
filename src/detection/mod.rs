//! Pattern detectors over the transaction graph.
//!
//! Each detector is a pure function of the graph and the rule
//! configuration; failures are local and silent (they reduce recall,
//! never abort the batch).

pub mod commission;
pub mod cycles;
pub mod fan;
pub mod shells;
