pub mod loader;
pub mod unit;

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use log::warn;
use thiserror::Error;

pub use unit::{Direction, Unit, UnitId};

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("duplicate unit id: {0}")]
    DuplicateId(String),
    #[error("unit {id} has an empty {side} label")]
    EmptyLabel { id: String, side: Direction },
    #[error("unknown built-in pool: {0}")]
    UnknownBuiltin(String),
    #[error("failed to read pool file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed pool data: {0}")]
    Json(#[from] serde_json::Error),
}

/// The ordered set of units available to a session, with label lookups.
#[derive(Clone, Debug, Default)]
pub struct Pool {
    units: Vec<Unit>,
    by_id: HashMap<UnitId, usize>,
    by_forward: HashMap<String, usize>,
    by_reverse: HashMap<String, usize>,
}

impl Pool {
    pub fn new(units: Vec<Unit>) -> Result<Self, PoolError> {
        let mut by_id = HashMap::with_capacity(units.len());
        let mut by_forward = HashMap::with_capacity(units.len());
        let mut by_reverse = HashMap::with_capacity(units.len());

        for (idx, unit) in units.iter().enumerate() {
            for side in [Direction::Forward, Direction::Reverse] {
                if unit.label(side).is_empty() {
                    return Err(PoolError::EmptyLabel {
                        id: unit.id.to_string(),
                        side,
                    });
                }
            }
            if by_id.insert(unit.id.clone(), idx).is_some() {
                return Err(PoolError::DuplicateId(unit.id.to_string()));
            }
            // Label collisions resolve to the first unit in pool order.
            if let Entry::Vacant(slot) = by_forward.entry(unit.forward.clone()) {
                slot.insert(idx);
            } else {
                warn!("forward label {:?} is shared; {} is unreachable by label", unit.forward, unit.id);
            }
            if let Entry::Vacant(slot) = by_reverse.entry(unit.reverse.clone()) {
                slot.insert(idx);
            } else {
                warn!("reverse label {:?} is shared; {} is unreachable by label", unit.reverse, unit.id);
            }
        }

        Ok(Self {
            units,
            by_id,
            by_forward,
            by_reverse,
        })
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn get(&self, id: &UnitId) -> Option<&Unit> {
        self.by_id.get(id).map(|&idx| &self.units[idx])
    }

    /// Resolve a label shown on the given side back to its unit.
    pub fn by_label(&self, side: Direction, label: &str) -> Option<&Unit> {
        let index = match side {
            Direction::Forward => &self.by_forward,
            Direction::Reverse => &self.by_reverse,
        };
        index.get(label).map(|&idx| &self.units[idx])
    }

    /// Labels of every unit on the given side, in pool order.
    pub fn labels(&self, side: Direction) -> Vec<&str> {
        self.units.iter().map(|u| u.label(side)).collect()
    }
}
