use serde::{Deserialize, Serialize};

/// Running score for a session. Never negative.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub score: u32,
    pub wrong_streak: u32,
    pub correct_trials: u32,
    pub wrong_trials: u32,
}

impl ScoreBoard {
    /// One point per unit in the word. Returns the applied delta.
    pub fn apply_correct(&mut self, unit_count: usize) -> i64 {
        let gained = u32::try_from(unit_count).unwrap_or(u32::MAX);
        self.score = self.score.saturating_add(gained);
        self.wrong_streak = 0;
        self.correct_trials += 1;
        i64::from(gained)
    }

    /// Loses at most one point, floored at zero. Returns the applied delta.
    pub fn apply_wrong(&mut self) -> i64 {
        let delta = if self.score > 0 { -1 } else { 0 };
        self.score = self.score.saturating_sub(1);
        self.wrong_streak += 1;
        self.wrong_trials += 1;
        delta
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.correct_trials + self.wrong_trials;
        if total == 0 {
            return 100.0;
        }
        f64::from(self.correct_trials) / f64::from(total) * 100.0
    }
}
