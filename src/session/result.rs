use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pool::{Direction, UnitId};

/// Receives per-trial outcome events for external persistence.
///
/// For each checked trial the session emits one `record_unit_outcome` per word unit,
/// then `record_answer_time` (correct trials only), then `record_score_delta`.
pub trait StatsSink {
    fn record_unit_outcome(&mut self, unit: &UnitId, correct: bool);
    fn record_answer_time(&mut self, secs: f64);
    fn record_score_delta(&mut self, delta: i64);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl StatsSink for NullSink {
    fn record_unit_outcome(&mut self, _unit: &UnitId, _correct: bool) {}
    fn record_answer_time(&mut self, _secs: f64) {}
    fn record_score_delta(&mut self, _delta: i64) {}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub correct: bool,
    pub direction: Direction,
    pub units: Vec<UnitId>,
    pub placed: Vec<String>,
    pub answer: Vec<String>,
    pub score_delta: i64,
    pub score: u32,
    /// Present on correct trials only.
    #[serde(default)]
    pub elapsed_secs: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl TrialResult {
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}
