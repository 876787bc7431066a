use actix::prelude::*;
use actix_web::web;
use log::{debug, info};
use std::time::Duration;

use crate::models::{AppState, SnapshotView};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One scheduler beat
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "Option<SnapshotView>")]
pub struct Tick;

/// Drives the shared clock once per second.
///
/// The engine never schedules itself; this actor is the external timer.
/// A beat with no running clock does nothing.
pub struct ClockTicker {
    app_state: web::Data<AppState>,
    interval: Option<Duration>,
}

impl ClockTicker {
    pub fn new(app_state: web::Data<AppState>) -> Self {
        ClockTicker {
            app_state,
            interval: Some(TICK_INTERVAL),
        }
    }

    /// A ticker that only beats on an explicit [`Tick`].
    pub fn manual(app_state: web::Data<AppState>) -> Self {
        ClockTicker {
            app_state,
            interval: None,
        }
    }
}

impl Actor for ClockTicker {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        if let Some(interval) = self.interval {
            info!("Clock ticker started, beating every {:?}", interval);
            ctx.run_interval(interval, |_, ctx| ctx.notify(Tick));
        }
    }
}

impl Handler<Tick> for ClockTicker {
    type Result = Option<SnapshotView>;

    fn handle(&mut self, _: Tick, _: &mut Self::Context) -> Self::Result {
        let snapshot = self.app_state.tick()?;
        if snapshot.over {
            info!("Game over, {:?} flagged", snapshot.flagged);
        } else if let Some(player) = snapshot.running {
            debug!("{} has {}", player, snapshot.clock(player).display);
        }
        Some(snapshot)
    }
}
