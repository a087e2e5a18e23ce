use std::fmt;

use crate::pool::Direction;

pub const DEFAULT_REVERSE_STREAK: u32 = 3;

/// Decides the direction of the next trial from recent outcomes.
pub trait ReverseModeController {
    fn is_reverse(&self) -> bool;
    /// Called once after each confirmed-correct trial.
    fn decide_next_mode(&mut self);
    /// Called once after each confirmed-wrong trial.
    fn record_wrong_answer(&mut self);
}

/// Flips direction after `threshold` correct trials in a row; a miss drops back to forward.
#[derive(Clone, Debug)]
pub struct StreakReverseMode {
    reverse: bool,
    streak: u32,
    threshold: u32,
}

impl StreakReverseMode {
    pub fn new(threshold: u32) -> Self {
        Self {
            reverse: false,
            streak: 0,
            threshold: threshold.max(1),
        }
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }
}

impl Default for StreakReverseMode {
    fn default() -> Self {
        Self::new(DEFAULT_REVERSE_STREAK)
    }
}

impl ReverseModeController for StreakReverseMode {
    fn is_reverse(&self) -> bool {
        self.reverse
    }

    fn decide_next_mode(&mut self) {
        self.streak += 1;
        if self.streak >= self.threshold {
            self.reverse = !self.reverse;
            self.streak = 0;
        }
    }

    fn record_wrong_answer(&mut self) {
        self.streak = 0;
        self.reverse = false;
    }
}

/// Where a session's direction comes from. Resolved once per session, so an
/// override and the controller never both drive the same session.
pub enum DirectionSource {
    Fixed(Direction),
    Controlled(Box<dyn ReverseModeController>),
}

impl DirectionSource {
    pub fn resolve(
        direction_override: Option<Direction>,
        controller: Box<dyn ReverseModeController>,
    ) -> Self {
        match direction_override {
            Some(direction) => DirectionSource::Fixed(direction),
            None => DirectionSource::Controlled(controller),
        }
    }

    pub fn current(&self) -> Direction {
        match self {
            DirectionSource::Fixed(direction) => *direction,
            DirectionSource::Controlled(controller) if controller.is_reverse() => Direction::Reverse,
            DirectionSource::Controlled(_) => Direction::Forward,
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, DirectionSource::Controlled(_))
    }

    pub fn on_correct(&mut self) {
        if let DirectionSource::Controlled(controller) = self {
            controller.decide_next_mode();
        }
    }

    pub fn on_wrong(&mut self) {
        if let DirectionSource::Controlled(controller) = self {
            controller.record_wrong_answer();
        }
    }
}

impl fmt::Debug for DirectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionSource::Fixed(direction) => f.debug_tuple("Fixed").field(direction).finish(),
            DirectionSource::Controlled(controller) => f
                .debug_struct("Controlled")
                .field("is_reverse", &controller.is_reverse())
                .finish(),
        }
    }
}
