use serde::{Deserialize, Serialize};

use crate::clock::{format_clock, Category, ClockEngine, ClockState, Player, PlayerClock};

/// Render-ready view of one clock face
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClockView {
    pub remaining_seconds: u64,
    pub display: String,
    pub move_count: u32,
    pub running: bool,
    pub state: ClockState,
}

impl From<&PlayerClock> for ClockView {
    fn from(clock: &PlayerClock) -> Self {
        ClockView {
            remaining_seconds: clock.remaining_seconds,
            display: format_clock(clock.remaining_seconds),
            move_count: clock.move_count,
            running: clock.running,
            state: clock.state(),
        }
    }
}

/// Everything a client needs to draw the clock
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SnapshotView {
    pub time_control: String,
    pub increment_seconds: u64,
    pub over: bool,
    pub running: Option<Player>,
    pub flagged: Option<Player>,
    pub top: ClockView,
    pub bottom: ClockView,
}

impl SnapshotView {
    pub fn of(engine: &ClockEngine) -> Self {
        let session = engine.snapshot();
        SnapshotView {
            time_control: session.active_time_control_id.clone(),
            increment_seconds: engine.time_control().increment_seconds,
            over: session.over,
            running: session.running_player(),
            flagged: session.flagged_player(),
            top: ClockView::from(&session.top),
            bottom: ClockView::from(&session.bottom),
        }
    }

    pub fn clock(&self, player: Player) -> &ClockView {
        match player {
            Player::Top => &self.top,
            Player::Bottom => &self.bottom,
        }
    }
}

/// Catalog entry as listed in the settings panel
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TimeControlView {
    pub id: String,
    pub category: Category,
    pub initial_seconds: u64,
    pub increment_seconds: u64,
    pub active: bool,
}

pub fn list_time_controls(engine: &ClockEngine) -> Vec<TimeControlView> {
    let active = &engine.snapshot().active_time_control_id;
    engine
        .catalog()
        .list()
        .map(|(id, control)| TimeControlView {
            id: id.to_string(),
            category: control.category,
            initial_seconds: control.initial_seconds,
            increment_seconds: control.increment_seconds,
            active: id == active.as_str(),
        })
        .collect()
}
