use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::catalog::{Catalog, TimeControl};
use crate::error::{ClockError, Rejection};

/// One of the two clock faces. Peers, not a hierarchy.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Top,
    Bottom,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::Top => Player::Bottom,
            Player::Bottom => Player::Top,
        }
    }

    pub fn parse(name: &str) -> Option<Player> {
        match name.to_lowercase().as_str() {
            "top" | "a" => Some(Player::Top),
            "bottom" | "b" => Some(Player::Bottom),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Player::Top => write!(f, "top"),
            Player::Bottom => write!(f, "bottom"),
        }
    }
}

/// What a renderer needs to know about a single clock face.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClockState {
    Idle,
    Running,
    Paused,
    Expired,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerClock {
    pub remaining_seconds: u64,
    pub move_count: u32,
    pub running: bool,
}

impl PlayerClock {
    fn new(initial_seconds: u64) -> Self {
        PlayerClock {
            remaining_seconds: initial_seconds,
            move_count: 0,
            running: false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }

    pub fn state(&self) -> ClockState {
        if self.is_expired() {
            ClockState::Expired
        } else if self.running {
            ClockState::Running
        } else if self.move_count == 0 {
            ClockState::Idle
        } else {
            ClockState::Paused
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub active_time_control_id: String,
    pub top: PlayerClock,
    pub bottom: PlayerClock,
    pub over: bool,
}

impl GameSession {
    fn new(id: &str, control: &TimeControl) -> Self {
        GameSession {
            active_time_control_id: id.to_string(),
            top: PlayerClock::new(control.initial_seconds),
            bottom: PlayerClock::new(control.initial_seconds),
            // a zero-second control is lost before it starts
            over: control.initial_seconds == 0,
        }
    }

    pub fn clock(&self, player: Player) -> &PlayerClock {
        match player {
            Player::Top => &self.top,
            Player::Bottom => &self.bottom,
        }
    }

    fn clock_mut(&mut self, player: Player) -> &mut PlayerClock {
        match player {
            Player::Top => &mut self.top,
            Player::Bottom => &mut self.bottom,
        }
    }

    pub fn running_player(&self) -> Option<Player> {
        if self.top.running {
            Some(Player::Top)
        } else if self.bottom.running {
            Some(Player::Bottom)
        } else {
            None
        }
    }

    /// The player whose clock ran out, if the game ended on time.
    pub fn flagged_player(&self) -> Option<Player> {
        if self.top.is_expired() {
            Some(Player::Top)
        } else if self.bottom.is_expired() {
            Some(Player::Bottom)
        } else {
            None
        }
    }
}

/// Live state of the two clocks and the active time control.
///
/// The engine is purely reactive: it never sleeps or schedules. A caller
/// delivers one [`ClockEngine::tick`] per second to the running clock and
/// stops once [`GameSession::running_player`] is `None`.
#[derive(Debug, Clone)]
pub struct ClockEngine {
    catalog: Catalog,
    control: TimeControl,
    session: GameSession,
}

impl ClockEngine {
    pub fn new(catalog: Catalog, time_control_id: &str) -> Result<Self, ClockError> {
        let control = catalog.get(time_control_id)?;
        info!("Clock initialised with time control {}", time_control_id);
        Ok(ClockEngine {
            session: GameSession::new(time_control_id, &control),
            catalog,
            control,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn time_control(&self) -> &TimeControl {
        &self.control
    }

    pub fn snapshot(&self) -> &GameSession {
        &self.session
    }

    /// Replaces the session with a fresh one under the active time control.
    pub fn reset(&mut self) {
        self.session = GameSession::new(&self.session.active_time_control_id, &self.control);
        info!("Clock reset to {}", self.session.active_time_control_id);
    }

    /// Returns `Ok(true)` when the control changed and the game was discarded,
    /// `Ok(false)` when `id` is already active.
    pub fn switch_time_control(&mut self, id: &str) -> Result<bool, ClockError> {
        if id == self.session.active_time_control_id {
            debug!("Time control {} already active", id);
            return Ok(false);
        }
        let control = self.catalog.get(id)?;
        self.control = control;
        self.session = GameSession::new(id, &control);
        info!("Switched time control to {}", id);
        Ok(true)
    }

    /// `player` has finished a move: pause and credit their clock, start the opponent's.
    pub fn start_turn(&mut self, player: Player) -> Result<(), ClockError> {
        if self.session.over {
            return Err(Rejection::GameOver.into());
        }
        let opponent = self.session.clock(player.opponent());
        if opponent.running && opponent.move_count > 0 {
            return Err(Rejection::OpponentMidTurn.into());
        }

        let increment = self.control.increment_seconds;
        let clock = self.session.clock_mut(player);
        clock.running = false;
        if clock.move_count > 0 {
            clock.remaining_seconds = clock.remaining_seconds.saturating_add(increment);
        }
        clock.move_count += 1;
        let (remaining, moves) = (clock.remaining_seconds, clock.move_count);

        self.session.clock_mut(player.opponent()).running = true;
        debug!(
            "{} finished move {} with {}s left, {} to move",
            player,
            moves,
            remaining,
            player.opponent()
        );
        Ok(())
    }

    /// Takes one second off `player`'s running clock and returns what is left.
    pub fn tick(&mut self, player: Player) -> Result<u64, ClockError> {
        if self.session.over {
            return Err(Rejection::GameOver.into());
        }
        let clock = self.session.clock_mut(player);
        if !clock.running || clock.is_expired() {
            return Err(Rejection::NotRunning.into());
        }

        clock.remaining_seconds -= 1;
        let remaining = clock.remaining_seconds;
        if remaining == 0 {
            clock.running = false;
            self.session.clock_mut(player.opponent()).running = false;
            self.session.over = true;
            info!("{} flagged, game over", player);
        }
        Ok(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(id: &str) -> ClockEngine {
        ClockEngine::new(Catalog::standard(), id).unwrap()
    }

    fn ticks(engine: &mut ClockEngine, player: Player, n: u64) {
        for _ in 0..n {
            engine.tick(player).unwrap();
        }
    }

    fn assert_invariants(session: &GameSession) {
        assert!(!(session.top.running && session.bottom.running));
        assert_eq!(
            session.over,
            session.top.remaining_seconds == 0 || session.bottom.remaining_seconds == 0
        );
        if session.over {
            assert_eq!(session.running_player(), None);
        }
    }

    #[test]
    fn initial_state() {
        let engine = engine("3+2");
        let session = engine.snapshot();
        assert_eq!(session.active_time_control_id, "3+2");
        for player in [Player::Top, Player::Bottom] {
            let clock = session.clock(player);
            assert_eq!(clock.remaining_seconds, 180);
            assert_eq!(clock.move_count, 0);
            assert!(!clock.running);
            assert_eq!(clock.state(), ClockState::Idle);
        }
        assert!(!session.over);
    }

    #[test]
    fn unknown_initial_control() {
        assert!(matches!(
            ClockEngine::new(Catalog::standard(), "9+9"),
            Err(ClockError::NotFound(_))
        ));
    }

    #[test]
    fn first_turn_starts_opponent_without_increment() {
        let mut engine = engine("3+2");
        engine.start_turn(Player::Top).unwrap();

        let session = engine.snapshot();
        assert!(session.bottom.running);
        assert!(!session.top.running);
        assert_eq!(session.top.move_count, 1);
        assert_eq!(session.top.remaining_seconds, 180);
        assert_eq!(session.bottom.move_count, 0);
        assert_eq!(session.running_player(), Some(Player::Bottom));
        assert_invariants(session);

        ticks(&mut engine, Player::Bottom, 10);
        assert_eq!(engine.snapshot().bottom.remaining_seconds, 170);

        engine.start_turn(Player::Bottom).unwrap();
        let session = engine.snapshot();
        assert!(session.top.running);
        assert!(!session.bottom.running);
        assert_eq!(session.bottom.move_count, 1);
        assert_eq!(session.bottom.remaining_seconds, 170);
        assert_eq!(session.top.remaining_seconds, 180);
        assert_eq!(session.bottom.state(), ClockState::Paused);
        assert_eq!(session.top.state(), ClockState::Running);
        assert_invariants(session);
    }

    #[test]
    fn increment_credited_after_first_move() {
        let mut engine = engine("3+2");
        engine.start_turn(Player::Top).unwrap();
        ticks(&mut engine, Player::Bottom, 10);
        engine.start_turn(Player::Bottom).unwrap();
        ticks(&mut engine, Player::Top, 5);
        assert_eq!(engine.snapshot().top.remaining_seconds, 175);

        engine.start_turn(Player::Top).unwrap();
        let session = engine.snapshot();
        assert_eq!(session.top.remaining_seconds, 177);
        assert_eq!(session.top.move_count, 2);
        assert!(session.bottom.running);

        ticks(&mut engine, Player::Bottom, 3);
        engine.start_turn(Player::Bottom).unwrap();
        assert_eq!(engine.snapshot().bottom.remaining_seconds, 169);
        assert_eq!(engine.snapshot().bottom.move_count, 2);
    }

    #[test]
    fn no_increment_without_increment_control() {
        let mut engine = engine("5+0");
        engine.start_turn(Player::Top).unwrap();
        engine.start_turn(Player::Bottom).unwrap();
        ticks(&mut engine, Player::Top, 4);
        engine.start_turn(Player::Top).unwrap();
        assert_eq!(engine.snapshot().top.remaining_seconds, 296);
    }

    #[test]
    fn cannot_hand_turn_to_opponent_mid_turn() {
        let mut engine = engine("3+2");
        engine.start_turn(Player::Top).unwrap();
        engine.start_turn(Player::Bottom).unwrap();
        let before = engine.snapshot().clone();

        // top is running with one move behind it
        assert_eq!(
            engine.start_turn(Player::Bottom),
            Err(ClockError::InvalidTransition(Rejection::OpponentMidTurn))
        );
        assert_eq!(engine.snapshot(), &before);
    }

    #[test]
    fn opponent_on_first_move_does_not_block() {
        let mut engine = engine("3+2");
        engine.start_turn(Player::Top).unwrap();
        // bottom runs but has no completed move yet
        engine.start_turn(Player::Top).unwrap();
        let session = engine.snapshot();
        assert_eq!(session.top.move_count, 2);
        assert_eq!(session.top.remaining_seconds, 182);
        assert!(session.bottom.running);
    }

    #[test]
    fn tick_requires_running_clock() {
        let mut engine = engine("1+0");
        assert_eq!(
            engine.tick(Player::Top),
            Err(ClockError::InvalidTransition(Rejection::NotRunning))
        );
        engine.start_turn(Player::Top).unwrap();
        assert_eq!(
            engine.tick(Player::Top),
            Err(ClockError::InvalidTransition(Rejection::NotRunning))
        );
        assert_eq!(engine.tick(Player::Bottom), Ok(59));
        assert_eq!(engine.snapshot().top.remaining_seconds, 60);
    }

    #[test]
    fn flag_ends_game() {
        let mut engine = engine("1+0");
        engine.start_turn(Player::Top).unwrap();
        ticks(&mut engine, Player::Bottom, 59);
        assert!(!engine.snapshot().over);
        assert_eq!(engine.tick(Player::Bottom), Ok(0));

        let session = engine.snapshot().clone();
        assert!(session.over);
        assert!(!session.bottom.running);
        assert_eq!(session.bottom.state(), ClockState::Expired);
        assert_eq!(session.flagged_player(), Some(Player::Bottom));
        assert_invariants(&session);

        for player in [Player::Top, Player::Bottom] {
            assert_eq!(
                engine.start_turn(player),
                Err(ClockError::InvalidTransition(Rejection::GameOver))
            );
            assert_eq!(
                engine.tick(player),
                Err(ClockError::InvalidTransition(Rejection::GameOver))
            );
        }
        assert_eq!(engine.snapshot(), &session);
    }

    #[test]
    fn reset_restores_active_control() {
        let mut engine = engine("1+0");
        engine.start_turn(Player::Top).unwrap();
        ticks(&mut engine, Player::Bottom, 60);
        assert!(engine.snapshot().over);

        engine.reset();
        let session = engine.snapshot();
        assert!(!session.over);
        assert_eq!(session.active_time_control_id, "1+0");
        assert_eq!(session.top, PlayerClock::new(60));
        assert_eq!(session.bottom, PlayerClock::new(60));
        engine.start_turn(Player::Bottom).unwrap();
    }

    #[test]
    fn switch_to_same_control_keeps_game() {
        let mut engine = engine("3+2");
        engine.start_turn(Player::Top).unwrap();
        ticks(&mut engine, Player::Bottom, 7);
        let before = engine.snapshot().clone();

        assert_eq!(engine.switch_time_control("3+2"), Ok(false));
        assert_eq!(engine.snapshot(), &before);
    }

    #[test]
    fn switch_discards_game() {
        let mut engine = engine("3+2");
        engine.start_turn(Player::Top).unwrap();
        ticks(&mut engine, Player::Bottom, 90);
        engine.start_turn(Player::Bottom).unwrap();
        assert_eq!(engine.snapshot().bottom.remaining_seconds, 90);

        assert_eq!(engine.switch_time_control("5+0"), Ok(true));
        let session = engine.snapshot();
        assert_eq!(session.active_time_control_id, "5+0");
        assert_eq!(session.top, PlayerClock::new(300));
        assert_eq!(session.bottom, PlayerClock::new(300));
        assert!(!session.over);
        assert_eq!(engine.time_control().increment_seconds, 0);
    }

    #[test]
    fn switch_after_game_over() {
        let mut engine = engine("1+0");
        engine.start_turn(Player::Bottom).unwrap();
        ticks(&mut engine, Player::Top, 60);
        assert!(engine.snapshot().over);

        engine.switch_time_control("2+1").unwrap();
        assert!(!engine.snapshot().over);
        engine.start_turn(Player::Top).unwrap();
    }

    #[test]
    fn switch_to_unknown_control_keeps_game() {
        let mut engine = engine("3+2");
        engine.start_turn(Player::Top).unwrap();
        let before = engine.snapshot().clone();
        assert_eq!(
            engine.switch_time_control("4+4"),
            Err(ClockError::NotFound("4+4".to_string()))
        );
        assert_eq!(engine.snapshot(), &before);
        assert_eq!(engine.time_control().increment_seconds, 2);
    }

    #[test]
    fn zero_time_control_is_over_immediately() {
        let catalog = Catalog::new(vec![("0+0".to_string(), TimeControl::new(0, 0))]).unwrap();
        let mut engine = ClockEngine::new(catalog, "0+0").unwrap();
        assert!(engine.snapshot().over);
        assert_eq!(
            engine.start_turn(Player::Top),
            Err(ClockError::InvalidTransition(Rejection::GameOver))
        );
    }

    #[test]
    fn increment_saturates() {
        let catalog = Catalog::new(vec![("huge".to_string(), TimeControl::new(u64::MAX - 1, 5))]).unwrap();
        let mut engine = ClockEngine::new(catalog, "huge").unwrap();
        engine.start_turn(Player::Top).unwrap();
        engine.start_turn(Player::Top).unwrap();
        let session = engine.snapshot();
        assert_eq!(session.top.remaining_seconds, u64::MAX);
        assert_eq!(session.top.move_count, 2);
        assert!(!session.over);
    }

    // alternate presses in a long game and check the invariants after every step
    #[test]
    fn long_game_keeps_invariants() {
        let mut engine = engine("2+1");
        let mut mover = Player::Top;
        engine.start_turn(mover).unwrap();
        loop {
            let runner = mover.opponent();
            for _ in 0..7 {
                if engine.tick(runner).is_err() {
                    break;
                }
                assert_invariants(engine.snapshot());
            }
            if engine.snapshot().over {
                break;
            }
            engine.start_turn(runner).unwrap();
            assert_invariants(engine.snapshot());
            mover = runner;
        }
        assert!(engine.snapshot().flagged_player().is_some());
        assert_invariants(engine.snapshot());
    }

    #[test]
    fn player_names() {
        assert_eq!(Player::parse("TOP"), Some(Player::Top));
        assert_eq!(Player::parse("b"), Some(Player::Bottom));
        assert_eq!(Player::parse("left"), None);
        assert_eq!(Player::Top.opponent(), Player::Bottom);
        assert_eq!(serde_json::to_string(&Player::Bottom).unwrap(), "\"bottom\"");
    }
}
