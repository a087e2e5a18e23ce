use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One learnable item with its two label representations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub forward: String,
    pub reverse: String,
    /// Synonyms after the first; never used as tiles.
    #[serde(default)]
    pub alternates: Vec<String>,
    /// Pronunciation aids, shown only next to forward labels.
    #[serde(default)]
    pub hints: Vec<String>,
}

impl Unit {
    pub fn new(id: impl Into<String>, forward: impl Into<String>, reverse: impl Into<String>) -> Self {
        Self {
            id: UnitId::new(id),
            forward: forward.into(),
            reverse: reverse.into(),
            alternates: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn with_hints(mut self, hints: &[&str]) -> Self {
        self.hints = hints.iter().map(|h| h.to_string()).collect();
        self
    }

    pub fn label(&self, side: Direction) -> &str {
        match side {
            Direction::Forward => &self.forward,
            Direction::Reverse => &self.reverse,
        }
    }
}

/// Which label of a unit is the prompt and which is the answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    pub fn prompt_label(self, unit: &Unit) -> &str {
        unit.label(self)
    }

    pub fn answer_label(self, unit: &Unit) -> &str {
        unit.label(self.flipped())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "forward" => Some(Direction::Forward),
            "reverse" => Some(Direction::Reverse),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_inverts_prompt_and_answer() {
        let unit = Unit::new("山", "山", "mountain");
        assert_eq!(Direction::Forward.prompt_label(&unit), "山");
        assert_eq!(Direction::Forward.answer_label(&unit), "mountain");
        assert_eq!(Direction::Reverse.prompt_label(&unit), "mountain");
        assert_eq!(Direction::Reverse.answer_label(&unit), "山");
    }

    #[test]
    fn test_direction_names() {
        assert_eq!(Direction::from_name("reverse"), Some(Direction::Reverse));
        assert_eq!(Direction::from_name("adaptive"), None);
        assert_eq!(Direction::Forward.flipped().as_str(), "reverse");
    }
}
