use serde::{Deserialize, Serialize};

/// One hop whose scored message failed its threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disagreement {
    /// Index of the message in the trace.
    pub hop: usize,
    pub reason: String,
}

/// Whether a run's answer and intermediate reasoning are jointly acceptable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub accepted: bool,
    pub disagreements: Vec<Disagreement>,
}
