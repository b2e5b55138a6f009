use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the user wants done with the deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeckAction {
    #[default]
    Shuffle,
    PickRandom,
    PickSpecific,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown deck action `{0}` (expected shuffle, pick-random or pick-specific)")]
pub struct ParseActionError(pub String);

impl DeckAction {
    /// Options in the order the selector lists them
    pub const ALL: [DeckAction; 3] = [
        DeckAction::Shuffle,
        DeckAction::PickRandom,
        DeckAction::PickSpecific,
    ];

    /// Value submitted for this option
    pub fn value(self) -> &'static str {
        match self {
            DeckAction::Shuffle => "shuffle",
            DeckAction::PickRandom => "pick-random",
            DeckAction::PickSpecific => "pick-specific",
        }
    }

    /// Human-readable menu label
    pub fn label(self) -> &'static str {
        match self {
            DeckAction::Shuffle => "Shuffle the deck",
            DeckAction::PickRandom => "Pick a random card",
            DeckAction::PickSpecific => "Pick a card",
        }
    }

    pub fn index(self) -> usize {
        match self {
            DeckAction::Shuffle => 0,
            DeckAction::PickRandom => 1,
            DeckAction::PickSpecific => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for DeckAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for DeckAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.value().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseActionError(needle.to_string()))
    }
}
