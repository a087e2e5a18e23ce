pub mod result;
pub mod state_machine;
pub mod timer;

use std::fmt;

use crate::engine::reverse_mode::ReverseModeController;
use crate::engine::selector::AdaptiveSelector;
use crate::pool::Direction;
use crate::session::result::{StatsSink, TrialResult};

pub type OutcomeCallback = Box<dyn FnMut(&TrialResult)>;

/// Per-session integration settings, resolved once when the session is built.
#[derive(Default)]
pub struct SessionOptions {
    /// Fixes the direction for the whole session; the reverse-mode controller is then never consulted.
    pub direction_override: Option<Direction>,
    pub on_correct: Option<OutcomeCallback>,
    pub on_wrong: Option<OutcomeCallback>,
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("direction_override", &self.direction_override)
            .field("on_correct", &self.on_correct.is_some())
            .field("on_wrong", &self.on_wrong.is_some())
            .finish()
    }
}

/// The host-owned services a session drives.
pub struct Collaborators {
    pub selector: Box<dyn AdaptiveSelector>,
    pub reverse_mode: Box<dyn ReverseModeController>,
    pub sink: Box<dyn StatsSink>,
}
