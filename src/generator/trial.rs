use std::collections::HashSet;

use log::debug;
use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::engine::selector::AdaptiveSelector;
use crate::pool::{Direction, Pool, Unit, UnitId};

pub const DEFAULT_MAX_DISTRACTORS: usize = 3;

/// How a generated trial compares with what was asked for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub requested_length: usize,
    /// Picks the pool could not resolve; each one shortens the word by one.
    pub unresolved_picks: usize,
    pub requested_distractors: usize,
}

/// One generated question: prompt word, correct tile order and the shuffled tile bag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    pub direction: Direction,
    pub word_units: Vec<UnitId>,
    pub displayed_tokens: Vec<String>,
    pub answer_tokens: Vec<String>,
    pub distractors: Vec<String>,
    pub tile_bag: Vec<String>,
    pub report: GenerationReport,
}

impl Trial {
    fn empty(direction: Direction, report: GenerationReport) -> Self {
        Self {
            direction,
            report,
            ..Self::default()
        }
    }

    /// An empty word means there was nothing to ask; such a trial must not be shown.
    pub fn is_presentable(&self) -> bool {
        !self.word_units.is_empty()
    }

    pub fn len(&self) -> usize {
        self.word_units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_units.is_empty()
    }

    pub fn is_short(&self) -> bool {
        self.len() < self.report.requested_length
    }

    pub fn contains_tile(&self, token: &str) -> bool {
        self.tile_bag.iter().any(|t| t == token)
    }

    /// Hints per displayed token. Only forward labels carry hints.
    pub fn hints<'a>(&self, pool: &'a Pool) -> Vec<&'a [String]> {
        self.word_units
            .iter()
            .map(|id| match (self.direction, pool.get(id)) {
                (Direction::Forward, Some(unit)) => unit.hints.as_slice(),
                _ => &[],
            })
            .collect()
    }
}

pub struct TrialGenerator {
    rng: SmallRng,
    max_distractors: usize,
}

impl TrialGenerator {
    pub fn new(rng: SmallRng) -> Self {
        Self {
            rng,
            max_distractors: DEFAULT_MAX_DISTRACTORS,
        }
    }

    pub fn with_max_distractors(mut self, max_distractors: usize) -> Self {
        self.max_distractors = max_distractors;
        self
    }

    pub fn generate(
        &mut self,
        pool: &Pool,
        direction: Direction,
        word_length: usize,
        selector: &mut dyn AdaptiveSelector,
    ) -> Trial {
        let mut report = GenerationReport {
            requested_length: word_length,
            ..GenerationReport::default()
        };

        if pool.len() < word_length {
            debug!(
                "pool of {} units cannot fill a {word_length}-unit word",
                pool.len()
            );
            return Trial::empty(direction, report);
        }

        let mut word_units = Vec::with_capacity(word_length);
        let mut displayed_tokens = Vec::with_capacity(word_length);
        let mut answer_tokens = Vec::with_capacity(word_length);
        let mut used_prompts: HashSet<&str> = HashSet::new();
        let mut used_answers: HashSet<&str> = HashSet::new();

        for _ in 0..word_length {
            let candidates = candidate_ids(pool, direction, &used_prompts, &used_answers);
            if candidates.is_empty() {
                debug!("ran out of candidates after {} units", word_units.len());
                break;
            }

            let Some(unit) = selector
                .select_weighted(&candidates)
                .and_then(|id| pool.get(&id))
            else {
                report.unresolved_picks += 1;
                debug!("selector returned an id outside the pool; skipping slot");
                continue;
            };

            let prompt = direction.prompt_label(unit);
            let answer = direction.answer_label(unit);
            used_prompts.insert(prompt);
            used_answers.insert(answer);
            displayed_tokens.push(prompt.to_string());
            answer_tokens.push(answer.to_string());
            word_units.push(unit.id.clone());
            selector.mark_seen(&unit.id);
        }

        let wanted = self
            .max_distractors
            .min(pool.len().saturating_sub(word_length));
        report.requested_distractors = wanted;
        let distractors = self.draw_distractors(pool, direction, &used_answers, wanted);

        let mut tile_bag: Vec<String> = answer_tokens
            .iter()
            .chain(distractors.iter())
            .cloned()
            .collect();
        tile_bag.shuffle(&mut self.rng);

        Trial {
            direction,
            word_units,
            displayed_tokens,
            answer_tokens,
            distractors,
            tile_bag,
            report,
        }
    }

    fn draw_distractors(
        &mut self,
        pool: &Pool,
        direction: Direction,
        answers: &HashSet<&str>,
        wanted: usize,
    ) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut candidates: Vec<&str> = pool
            .labels(direction.flipped())
            .into_iter()
            .filter(|label| !answers.contains(label) && seen.insert(*label))
            .collect();

        let mut drawn = Vec::with_capacity(wanted);
        while drawn.len() < wanted {
            if candidates.is_empty() {
                debug!("only {} of {wanted} distractors available", drawn.len());
                break;
            }
            let idx = self.rng.gen_range(0..candidates.len());
            drawn.push(candidates.swap_remove(idx).to_string());
        }
        drawn
    }
}

/// Distinct unit ids still eligible for the next slot of the word.
///
/// Forward prompts come straight from the pool. Reverse prompts resolve through the
/// reverse-label index, so a shared reverse label offers only its first unit.
fn candidate_ids(
    pool: &Pool,
    direction: Direction,
    used_prompts: &HashSet<&str>,
    used_answers: &HashSet<&str>,
) -> Vec<UnitId> {
    let units: Vec<&Unit> = match direction {
        Direction::Forward => pool.units().iter().collect(),
        Direction::Reverse => pool
            .labels(Direction::Reverse)
            .into_iter()
            .filter_map(|label| pool.by_label(Direction::Reverse, label))
            .collect(),
    };

    let mut offered = HashSet::new();
    units
        .into_iter()
        .filter(|unit| {
            !used_prompts.contains(direction.prompt_label(unit))
                && !used_answers.contains(direction.answer_label(unit))
        })
        .filter(|unit| offered.insert(unit.id.clone()))
        .map(|unit| unit.id.clone())
        .collect()
}
