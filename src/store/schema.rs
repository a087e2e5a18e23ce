use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pool::UnitId;
use crate::session::result::StatsSink;

const SCHEMA_VERSION: u32 = 1;
const MAX_ANSWER_TIMES: usize = 100;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCounts {
    pub correct: u32,
    pub wrong: u32,
}

/// Everything the stats sink accumulates across sessions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatsData {
    pub schema_version: u32,
    pub total_score: i64,
    pub trials: u32,
    #[serde(default)]
    pub unit_stats: BTreeMap<UnitId, UnitCounts>,
    /// Most recent correct-answer times in seconds, oldest first.
    #[serde(default)]
    pub answer_times: Vec<f64>,
    #[serde(default)]
    pub last_practice: Option<DateTime<Utc>>,
}

impl Default for StatsData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            total_score: 0,
            trials: 0,
            unit_stats: BTreeMap::new(),
            answer_times: Vec::new(),
            last_practice: None,
        }
    }
}

impl StatsData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn counts(&self, unit: &UnitId) -> Option<&UnitCounts> {
        self.unit_stats.get(unit)
    }

    pub fn mean_answer_secs(&self) -> Option<f64> {
        if self.answer_times.is_empty() {
            return None;
        }
        Some(self.answer_times.iter().sum::<f64>() / self.answer_times.len() as f64)
    }
}

impl StatsSink for StatsData {
    fn record_unit_outcome(&mut self, unit: &UnitId, correct: bool) {
        let counts = self.unit_stats.entry(unit.clone()).or_default();
        if correct {
            counts.correct += 1;
        } else {
            counts.wrong += 1;
        }
    }

    fn record_answer_time(&mut self, secs: f64) {
        self.answer_times.push(secs);
        if self.answer_times.len() > MAX_ANSWER_TIMES {
            self.answer_times.remove(0);
        }
    }

    fn record_score_delta(&mut self, delta: i64) {
        self.total_score = (self.total_score + delta).max(0);
        self.trials += 1;
        self.last_practice = Some(Utc::now());
    }
}
