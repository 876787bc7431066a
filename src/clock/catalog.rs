use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ClockError;

/// Identifier of the time control a fresh clock starts with.
pub const DEFAULT_TIME_CONTROL: &str = "3+2";

/// Moves assumed per game when estimating its length for categorisation.
const ESTIMATED_MOVES: u64 = 40;

const STANDARD: [(&str, u64, u64, Category); 11] = [
    ("1+0", 60, 0, Category::Bullet),
    ("2+1", 120, 1, Category::Bullet),
    ("3+0", 180, 0, Category::Blitz),
    ("3+2", 180, 2, Category::Blitz),
    ("5+0", 300, 0, Category::Blitz),
    ("5+3", 300, 3, Category::Blitz),
    ("10+0", 600, 0, Category::Rapid),
    ("10+5", 600, 5, Category::Rapid),
    ("15+10", 900, 10, Category::Rapid),
    ("30+0", 1800, 0, Category::Classical),
    ("30+20", 1800, 20, Category::Classical),
];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Bullet,
    Blitz,
    Rapid,
    Classical,
}

impl Category {
    /// Classify by estimated game length: base time plus forty increments.
    pub fn for_duration(initial_seconds: u64, increment_seconds: u64) -> Category {
        let estimate = ESTIMATED_MOVES
            .saturating_mul(increment_seconds)
            .saturating_add(initial_seconds);
        if estimate < 180 {
            Category::Bullet
        } else if estimate < 480 {
            Category::Blitz
        } else if estimate < 1500 {
            Category::Rapid
        } else {
            Category::Classical
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Category::Bullet => "Bullet",
            Category::Blitz => "Blitz",
            Category::Rapid => "Rapid",
            Category::Classical => "Classical",
        };
        write!(f, "{}", name)
    }
}

/// Base parameters of a time control. Never mutated after construction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeControl {
    pub initial_seconds: u64,
    pub increment_seconds: u64,
    pub category: Category,
}

impl TimeControl {
    pub fn new(initial_seconds: u64, increment_seconds: u64) -> Self {
        TimeControl {
            initial_seconds,
            increment_seconds,
            category: Category::for_duration(initial_seconds, increment_seconds),
        }
    }

    /// Parses a `minutes+seconds` label such as `"10+5"`.
    pub fn from_label(label: &str) -> Result<Self, ClockError> {
        let invalid = || ClockError::InvalidLabel(label.to_string());
        let (minutes, increment) = label.trim().split_once('+').ok_or_else(invalid)?;
        let minutes: u64 = minutes.trim().parse().map_err(|_| invalid())?;
        let increment: u64 = increment.trim().parse().map_err(|_| invalid())?;
        let initial = minutes.checked_mul(60).ok_or_else(invalid)?;
        // the whole game, with every increment credited, must fit in a u64
        ESTIMATED_MOVES
            .checked_mul(increment)
            .and_then(|credited| credited.checked_add(initial))
            .ok_or_else(invalid)?;
        Ok(TimeControl::new(initial, increment))
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<(String, TimeControl)>,
}

impl Catalog {
    /// Builds a catalog from ordered entries. Identifiers must be unique.
    pub fn new<I>(entries: I) -> Result<Self, ClockError>
    where
        I: IntoIterator<Item = (String, TimeControl)>,
    {
        let mut catalog = Catalog { entries: Vec::new() };
        for (id, control) in entries {
            catalog.push(id, control)?;
        }
        Ok(catalog)
    }

    /// The eleven presets from one-minute bullet to thirty-twenty classical.
    pub fn standard() -> Self {
        Catalog {
            entries: STANDARD
                .iter()
                .map(|&(id, initial_seconds, increment_seconds, category)| {
                    (
                        id.to_string(),
                        TimeControl {
                            initial_seconds,
                            increment_seconds,
                            category,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Standard presets followed by custom labels, in the given order.
    pub fn with_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self, ClockError> {
        let mut catalog = Catalog::standard();
        for label in labels {
            let label = label.as_ref().trim();
            let control = TimeControl::from_label(label)?;
            catalog.push(label.to_string(), control)?;
        }
        Ok(catalog)
    }

    fn push(&mut self, id: String, control: TimeControl) -> Result<(), ClockError> {
        if self.contains(&id) {
            return Err(ClockError::DuplicateTimeControl(id));
        }
        self.entries.push((id, control));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<TimeControl, ClockError> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, control)| *control)
            .ok_or_else(|| ClockError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|(entry_id, _)| entry_id == id)
    }

    pub fn list(&self) -> impl Iterator<Item = (&str, &TimeControl)> {
        self.entries.iter().map(|(id, control)| (id.as_str(), control))
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = (&str, &TimeControl)> {
        self.list().filter(move |(_, control)| control.category == category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::standard()
    }
}
