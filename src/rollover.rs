use crate::counter::Rollover;
use crate::dates::today_in_tz;
use crate::state::AppState;
use std::time::Duration;
use tokio::{
    task::{JoinHandle, block_in_place},
    time::MissedTickBehavior,
};
use tracing::debug;

/// Polls the clock and advances the active day once the date in São Paulo
/// changes. The day moves at most one `poll` period late.
///
/// Needs the multi-threaded runtime: the store write on rollover runs in
/// `block_in_place`.
pub fn spawn_rollover_watcher(state: AppState, poll: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let mut counter = state.counter.lock().await;
            let outcome = block_in_place(|| counter.roll_over(today_in_tz()));
            if outcome == Rollover::Unchanged {
                debug!(today = %counter.today(), "no day change");
            }
        }
    })
}
