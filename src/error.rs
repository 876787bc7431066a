use std::error::Error;
use std::fmt;

/// Why the engine refused a transition. State is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A clock reached zero; only a reset or a time-control switch restarts play.
    GameOver,
    /// The opponent is already running past their first move.
    OpponentMidTurn,
    /// Tick requested for a clock that is not running.
    NotRunning,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rejection::GameOver => write!(f, "game is over"),
            Rejection::OpponentMidTurn => write!(f, "opponent is already on the move"),
            Rejection::NotRunning => write!(f, "clock is not running"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    NotFound(String),
    InvalidTransition(Rejection),
    InvalidLabel(String),
    DuplicateTimeControl(String),
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClockError::NotFound(id) => write!(f, "unknown time control: {}", id),
            ClockError::InvalidTransition(reason) => write!(f, "invalid transition: {}", reason),
            ClockError::InvalidLabel(label) => {
                write!(f, "invalid time control label {:?}, expected minutes+seconds", label)
            }
            ClockError::DuplicateTimeControl(id) => write!(f, "duplicate time control: {}", id),
        }
    }
}

impl Error for ClockError {}

impl From<Rejection> for ClockError {
    fn from(reason: Rejection) -> Self {
        ClockError::InvalidTransition(reason)
    }
}
