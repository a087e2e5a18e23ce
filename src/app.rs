use std::fmt::Write;

use log::warn;
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::config::Config;
use crate::engine::reverse_mode::StreakReverseMode;
use crate::engine::selector::WeightedSelector;
use crate::event::AppEvent;
use crate::generator::trial::TrialGenerator;
use crate::pool::Pool;
use crate::session::result::{NullSink, StatsSink, TrialResult};
use crate::session::state_machine::{ActionOutcome, BottomBarState, TrialStateMachine};
use crate::session::{Collaborators, SessionOptions};
use crate::store::json_store::{JsonStore, StoredStatsSink};

const HELP: &str = "type a tile to place/remove it, Enter to check/continue/retry, \
`clear` to empty the answer, `hide`/`show` to pause the timer, `quit` to exit";

pub struct App {
    pub config: Config,
    pub machine: TrialStateMachine,
    pub last_result: Option<TrialResult>,
    pub message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, pool: Pool, seed: Option<u64>) -> Self {
        let mut master = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let sink: Box<dyn StatsSink> = if config.stats_enabled {
            match JsonStore::new() {
                Ok(store) => Box::new(StoredStatsSink::open(store)),
                Err(e) => {
                    warn!("stats disabled, data dir unavailable: {e}");
                    Box::new(NullSink)
                }
            }
        } else {
            Box::new(NullSink)
        };

        let collaborators = Collaborators {
            selector: Box::new(WeightedSelector::new(SmallRng::seed_from_u64(
                master.next_u64(),
            ))),
            reverse_mode: Box::new(StreakReverseMode::new(config.reverse_streak)),
            sink,
        };
        let options = SessionOptions {
            direction_override: config.direction_override(),
            ..SessionOptions::default()
        };
        let generator = TrialGenerator::new(SmallRng::seed_from_u64(master.next_u64()))
            .with_max_distractors(config.max_distractors);

        let machine =
            TrialStateMachine::new(pool, config.word_length, generator, options, collaborators);

        Self {
            config,
            machine,
            last_result: None,
            message: None,
            should_quit: false,
        }
    }

    /// False when the pool cannot fill a trial of the configured length.
    pub fn has_trial(&self) -> bool {
        self.machine.trial().is_some()
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        self.message = None;
        match event {
            AppEvent::Tap(token) => {
                if !self.machine.tap_tile(&token) {
                    self.message = Some(format!("no tile {token:?} to move right now"));
                }
            }
            AppEvent::Primary => match self.machine.primary_action() {
                ActionOutcome::Submitted(result) => self.last_result = Some(result),
                ActionOutcome::Advanced | ActionOutcome::Retried => self.last_result = None,
                ActionOutcome::Ignored => {
                    self.message = Some("place some tiles first".to_string());
                }
            },
            AppEvent::Retry => {
                if self.machine.retry() {
                    self.last_result = None;
                }
            }
            AppEvent::Continue => {
                if self.machine.advance() {
                    self.last_result = None;
                }
            }
            AppEvent::Clear => {
                self.machine.clear_placed();
            }
            AppEvent::Visibility { hidden } => self.machine.set_hidden(hidden),
            AppEvent::Help => self.message = Some(HELP.to_string()),
            AppEvent::Quit => self.should_quit = true,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let Some(trial) = self.machine.trial() else {
            let _ = writeln!(
                out,
                "Not enough units in the pool for a {}-unit word.",
                self.machine.word_length()
            );
            return out;
        };

        let hints = trial.hints(self.machine.pool());
        let prompt: Vec<String> = trial
            .displayed_tokens
            .iter()
            .zip(&hints)
            .map(|(token, hint)| match hint.first() {
                Some(hint) => format!("{token} ({hint})"),
                None => token.clone(),
            })
            .collect();
        let _ = writeln!(out, "[{}] {}", trial.direction, prompt.join("  "));

        let tiles: Vec<String> = self
            .machine
            .tiles()
            .iter()
            .map(|tile| {
                if tile.placed {
                    format!("[{}]", tile.token)
                } else {
                    tile.token.to_string()
                }
            })
            .collect();
        let _ = writeln!(out, "tiles:  {}", tiles.join("  "));
        let _ = writeln!(out, "answer: {}", self.machine.placed().join(" "));

        match self.machine.state() {
            BottomBarState::Check => {
                let _ = writeln!(out, "-- check (Enter) --");
            }
            BottomBarState::Correct => {
                let secs = self
                    .last_result
                    .as_ref()
                    .and_then(|r| r.elapsed_secs)
                    .unwrap_or_default();
                let _ = writeln!(out, "-- correct in {secs:.1}s! continue (Enter) --");
            }
            BottomBarState::Wrong => {
                let _ = writeln!(
                    out,
                    "-- wrong: expected {} -- retry (Enter) or tap a tile",
                    trial.answer_tokens.join(" ")
                );
            }
        }

        let score = self.machine.score();
        let _ = writeln!(
            out,
            "score {}  accuracy {:.0}%",
            score.score,
            score.accuracy()
        );
        if let Some(message) = &self.message {
            let _ = writeln!(out, "{message}");
        }
        out
    }
}
