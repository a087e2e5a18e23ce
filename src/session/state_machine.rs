use chrono::Utc;
use log::{info, warn};

use crate::engine::evaluator;
use crate::engine::reverse_mode::DirectionSource;
use crate::engine::scoring::ScoreBoard;
use crate::engine::selector::AdaptiveSelector;
use crate::generator::trial::{Trial, TrialGenerator};
use crate::pool::{Direction, Pool};
use crate::session::result::{StatsSink, TrialResult};
use crate::session::timer::TrialTimer;
use crate::session::{Collaborators, OutcomeCallback, SessionOptions};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BottomBarState {
    /// Editable, waiting for the learner to submit.
    #[default]
    Check,
    Correct,
    /// Same trial kept for review and retry.
    Wrong,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    Submitted(TrialResult),
    Advanced,
    Retried,
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileView<'a> {
    pub token: &'a str,
    pub placed: bool,
}

pub struct TrialStateMachine {
    pool: Pool,
    word_length: usize,
    generator: TrialGenerator,
    selector: Box<dyn AdaptiveSelector>,
    direction: DirectionSource,
    sink: Box<dyn StatsSink>,
    on_correct: Option<OutcomeCallback>,
    on_wrong: Option<OutcomeCallback>,
    trial: Option<Trial>,
    placed: Vec<String>,
    state: BottomBarState,
    /// Held from the start of a check until its sink events and callback have run. With the
    /// synchronous evaluator nothing can observe it set; an asynchronous evaluator would
    /// rely on it to refuse taps, clears and resubmits mid-check.
    evaluating: bool,
    celebrating: bool,
    score: ScoreBoard,
    timer: TrialTimer,
    hidden: bool,
    resume_on_show: bool,
}

impl TrialStateMachine {
    pub fn new(
        pool: Pool,
        word_length: usize,
        generator: TrialGenerator,
        options: SessionOptions,
        collaborators: Collaborators,
    ) -> Self {
        let SessionOptions {
            direction_override,
            on_correct,
            on_wrong,
        } = options;
        let Collaborators {
            selector,
            reverse_mode,
            sink,
        } = collaborators;

        let mut machine = Self {
            pool,
            word_length,
            generator,
            selector,
            direction: DirectionSource::resolve(direction_override, reverse_mode),
            sink,
            on_correct,
            on_wrong,
            trial: None,
            placed: Vec::new(),
            state: BottomBarState::Check,
            evaluating: false,
            celebrating: false,
            score: ScoreBoard::default(),
            timer: TrialTimer::default(),
            hidden: false,
            resume_on_show: false,
        };
        machine.regenerate();
        machine
    }

    // --- queries ---

    /// The current trial, or `None` when the pool cannot supply one.
    pub fn trial(&self) -> Option<&Trial> {
        self.trial.as_ref()
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn placed(&self) -> &[String] {
        &self.placed
    }

    pub fn state(&self) -> BottomBarState {
        self.state
    }

    pub fn score(&self) -> &ScoreBoard {
        &self.score
    }

    pub fn word_length(&self) -> usize {
        self.word_length
    }

    pub fn is_evaluating(&self) -> bool {
        self.evaluating
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebrating
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.timer.elapsed_secs()
    }

    /// Direction of the trial on screen, or of the next one if none is shown.
    pub fn direction(&self) -> Direction {
        self.trial
            .as_ref()
            .map_or_else(|| self.direction.current(), |t| t.direction)
    }

    pub fn is_direction_controlled(&self) -> bool {
        self.direction.is_controlled()
    }

    pub fn is_placed(&self, token: &str) -> bool {
        self.placed.iter().any(|t| t == token)
    }

    /// The tile bag in display order with each tile's placed flag.
    pub fn tiles(&self) -> Vec<TileView<'_>> {
        self.trial
            .iter()
            .flat_map(|t| t.tile_bag.iter())
            .map(|token| TileView {
                token: token.as_str(),
                placed: self.is_placed(token),
            })
            .collect()
    }

    /// Answer positions the learner got wrong, for review in the Wrong state.
    pub fn mismatches(&self) -> Vec<usize> {
        match (&self.trial, self.state) {
            (Some(trial), BottomBarState::Wrong) => {
                evaluator::mismatched_positions(&self.placed, trial)
            }
            _ => Vec::new(),
        }
    }

    // --- actions ---

    /// Submit, continue or retry depending on the bottom-bar state.
    pub fn primary_action(&mut self) -> ActionOutcome {
        let outcome = match self.state {
            BottomBarState::Check => {
                return self
                    .submit()
                    .map_or(ActionOutcome::Ignored, ActionOutcome::Submitted);
            }
            BottomBarState::Correct => self.advance().then_some(ActionOutcome::Advanced),
            BottomBarState::Wrong => self.retry().then_some(ActionOutcome::Retried),
        };
        outcome.unwrap_or(ActionOutcome::Ignored)
    }

    /// Toggle a tile. In the Wrong state any tap also unlocks editing.
    pub fn tap_tile(&mut self, token: &str) -> bool {
        let Some(trial) = &self.trial else {
            return false;
        };
        if !trial.contains_tile(token) {
            return false;
        }

        match self.state {
            BottomBarState::Correct => return false,
            BottomBarState::Wrong => {
                self.state = BottomBarState::Check;
                self.restart_timer();
                info!("editing unlocked after wrong answer");
            }
            BottomBarState::Check if self.evaluating => return false,
            BottomBarState::Check => {}
        }

        if let Some(pos) = self.placed.iter().position(|t| t == token) {
            self.placed.remove(pos);
        } else {
            self.placed.push(token.to_string());
        }
        true
    }

    pub fn clear_placed(&mut self) -> bool {
        if self.state != BottomBarState::Check || self.evaluating || self.trial.is_none() {
            return false;
        }
        self.placed.clear();
        true
    }

    /// Check the placed tiles. Returns `None` when the action does not apply.
    pub fn submit(&mut self) -> Option<TrialResult> {
        if self.state != BottomBarState::Check || self.evaluating || self.placed.is_empty() {
            return None;
        }
        let trial = self.trial.as_ref()?;

        self.evaluating = true;
        let correct = evaluator::is_correct(&self.placed, trial);
        let direction = trial.direction;
        let units = trial.word_units.clone();
        let answer = trial.answer_tokens.clone();

        for id in &units {
            self.selector.update_weight(id, correct);
            self.sink.record_unit_outcome(id, correct);
        }

        let (score_delta, elapsed_secs) = if correct {
            let elapsed = self.timer.elapsed_secs();
            self.sink.record_answer_time(elapsed);
            self.timer.reset();
            self.resume_on_show = false;
            let delta = self.score.apply_correct(units.len());
            self.direction.on_correct();
            self.state = BottomBarState::Correct;
            self.celebrating = true;
            (delta, Some(elapsed))
        } else {
            let delta = self.score.apply_wrong();
            self.direction.on_wrong();
            self.state = BottomBarState::Wrong;
            (delta, None)
        };
        self.sink.record_score_delta(score_delta);

        let result = TrialResult {
            correct,
            direction,
            units,
            placed: self.placed.clone(),
            answer,
            score_delta,
            score: self.score.score,
            elapsed_secs,
            timestamp: Utc::now(),
        };
        info!(
            "trial checked: correct={correct} delta={score_delta} score={}",
            self.score.score
        );

        let callback = if correct {
            self.on_correct.as_mut()
        } else {
            self.on_wrong.as_mut()
        };
        if let Some(callback) = callback {
            callback(&result);
        }

        self.evaluating = false;
        Some(result)
    }

    /// Wrong -> Check with the same trial and an empty placement.
    pub fn retry(&mut self) -> bool {
        if self.state != BottomBarState::Wrong {
            return false;
        }
        self.placed.clear();
        self.state = BottomBarState::Check;
        self.restart_timer();
        true
    }

    /// Correct -> a freshly generated trial.
    pub fn advance(&mut self) -> bool {
        if self.state != BottomBarState::Correct {
            return false;
        }
        self.regenerate();
        true
    }

    /// Pause the timer while hidden; resume it when visible again.
    pub fn set_hidden(&mut self, hidden: bool) {
        if hidden == self.hidden {
            return;
        }
        self.hidden = hidden;
        if hidden {
            self.resume_on_show |= self.timer.is_running();
            self.timer.pause();
        } else if self.resume_on_show {
            self.resume_on_show = false;
            self.timer.start();
        }
    }

    /// Discards the in-flight trial.
    pub fn set_word_length(&mut self, word_length: usize) {
        self.word_length = word_length;
        self.regenerate();
    }

    /// Only sessions started with a fixed direction can be switched; returns whether it applied.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        match &mut self.direction {
            DirectionSource::Fixed(current) => {
                *current = direction;
                self.regenerate();
                true
            }
            DirectionSource::Controlled(_) => {
                warn!("direction is controlled adaptively in this session; ignoring {direction}");
                false
            }
        }
    }

    /// Throw away the current trial and generate a new one.
    pub fn regenerate(&mut self) {
        let direction = self.direction.current();
        let trial = self.generator.generate(
            &self.pool,
            direction,
            self.word_length,
            self.selector.as_mut(),
        );

        self.placed.clear();
        self.state = BottomBarState::Check;
        self.evaluating = false;
        self.celebrating = false;
        self.timer.reset();
        self.resume_on_show = false;

        if trial.is_presentable() {
            info!(
                "new {direction} trial: {} units, {} tiles",
                trial.len(),
                trial.tile_bag.len()
            );
            self.trial = Some(trial);
            self.restart_timer();
        } else {
            info!(
                "no trial: pool of {} cannot fill {} units",
                self.pool.len(),
                self.word_length
            );
            self.trial = None;
        }
    }

    fn restart_timer(&mut self) {
        self.timer.reset();
        if self.hidden {
            self.resume_on_show = true;
        } else {
            self.timer.start();
        }
    }
}
