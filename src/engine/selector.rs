use std::collections::HashMap;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::pool::UnitId;

const EMA_ALPHA: f64 = 0.3;
const UNSEEN_WEIGHT: f64 = 2.0;
const MIN_WEIGHT: f64 = 0.25;
const MAX_WEIGHT: f64 = 4.0;

/// Stateful weighting over unit ids, shared by every trial of a session.
pub trait AdaptiveSelector {
    /// Weighted pick among `candidates`. `None` only when there is nothing to pick.
    fn select_weighted(&mut self, candidates: &[UnitId]) -> Option<UnitId>;
    fn mark_seen(&mut self, id: &UnitId);
    fn update_weight(&mut self, id: &UnitId, success: bool);
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UnitWeight {
    /// EMA of outcomes, 0.0 (always wrong) to 1.0 (always right).
    pub familiarity: f64,
    pub seen: u32,
    pub correct: u32,
    pub wrong: u32,
}

impl UnitWeight {
    pub fn selection_weight(&self) -> f64 {
        if self.seen == 0 {
            return UNSEEN_WEIGHT;
        }
        MIN_WEIGHT + (1.0 - self.familiarity).clamp(0.0, 1.0) * (MAX_WEIGHT - MIN_WEIGHT)
    }
}

/// Default selector: units answered badly (or never seen) come up more often.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeightedSelector {
    pub weights: HashMap<UnitId, UnitWeight>,
    #[serde(skip, default = "SmallRng::from_entropy")]
    rng: SmallRng,
}

impl Default for WeightedSelector {
    fn default() -> Self {
        Self::new(SmallRng::from_entropy())
    }
}

impl WeightedSelector {
    pub fn new(rng: SmallRng) -> Self {
        Self {
            weights: HashMap::new(),
            rng,
        }
    }

    pub fn weight_of(&self, id: &UnitId) -> f64 {
        self.weights
            .get(id)
            .map(UnitWeight::selection_weight)
            .unwrap_or(UNSEEN_WEIGHT)
    }

    pub fn get(&self, id: &UnitId) -> Option<&UnitWeight> {
        self.weights.get(id)
    }
}

impl AdaptiveSelector for WeightedSelector {
    fn select_weighted(&mut self, candidates: &[UnitId]) -> Option<UnitId> {
        let last = candidates.last()?;
        let total: f64 = candidates.iter().map(|id| self.weight_of(id)).sum();
        if total <= 0.0 {
            return Some(last.clone());
        }

        let mut roll = self.rng.gen_range(0.0..total);
        for id in candidates {
            roll -= self.weight_of(id);
            if roll <= 0.0 {
                return Some(id.clone());
            }
        }
        Some(last.clone())
    }

    fn mark_seen(&mut self, id: &UnitId) {
        self.weights.entry(id.clone()).or_default().seen += 1;
    }

    fn update_weight(&mut self, id: &UnitId, success: bool) {
        let weight = self.weights.entry(id.clone()).or_default();
        let sample = if success { 1.0 } else { 0.0 };
        if weight.correct + weight.wrong == 0 {
            weight.familiarity = sample;
        } else {
            weight.familiarity = EMA_ALPHA * sample + (1.0 - EMA_ALPHA) * weight.familiarity;
        }
        if success {
            weight.correct += 1;
        } else {
            weight.wrong += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<UnitId> {
        names.iter().map(|&n| UnitId::from(n)).collect()
    }

    #[test]
    fn test_empty_candidates_yield_none() {
        let mut selector = WeightedSelector::new(SmallRng::seed_from_u64(1));
        assert!(selector.select_weighted(&[]).is_none());
    }

    #[test]
    fn test_pick_is_always_a_candidate() {
        let mut selector = WeightedSelector::new(SmallRng::seed_from_u64(7));
        let candidates = ids(&["a", "b", "c"]);
        for _ in 0..200 {
            let pick = selector.select_weighted(&candidates).unwrap();
            assert!(candidates.contains(&pick));
        }
    }

    #[test]
    fn test_unseen_outweighs_mastered() {
        let mut selector = WeightedSelector::new(SmallRng::seed_from_u64(3));
        let mastered = UnitId::from("a");
        selector.mark_seen(&mastered);
        for _ in 0..20 {
            selector.update_weight(&mastered, true);
        }
        assert!(selector.weight_of(&mastered) < selector.weight_of(&UnitId::from("b")));
    }

    #[test]
    fn test_failures_raise_weight() {
        let mut selector = WeightedSelector::new(SmallRng::seed_from_u64(3));
        let id = UnitId::from("a");
        selector.mark_seen(&id);
        selector.update_weight(&id, true);
        let before = selector.weight_of(&id);
        selector.update_weight(&id, false);
        assert!(selector.weight_of(&id) > before);
        let stat = selector.get(&id).unwrap();
        assert_eq!((stat.seen, stat.correct, stat.wrong), (1, 1, 1));
    }

    #[test]
    fn test_struggling_unit_is_picked_more_often() {
        let mut selector = WeightedSelector::new(SmallRng::seed_from_u64(11));
        let candidates = ids(&["easy", "hard"]);
        for id in &candidates {
            selector.mark_seen(id);
        }
        for _ in 0..10 {
            selector.update_weight(&candidates[0], true);
            selector.update_weight(&candidates[1], false);
        }
        let hard_picks = (0..1000)
            .filter(|_| selector.select_weighted(&candidates).unwrap() == candidates[1])
            .count();
        assert!(hard_picks > 700, "hard unit picked only {hard_picks} times");
    }
}
