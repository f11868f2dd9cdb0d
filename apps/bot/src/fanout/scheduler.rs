//! Cycle scheduling. At most one cycle runs at a time in this process: the
//! periodic timer and the manual HTTP trigger share one gate.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::fanout::dispatcher::{CycleReport, Dispatcher};
use crate::store::StoreError;

pub struct CycleRunner {
    dispatcher: Arc<Dispatcher>,
    gate: Mutex<()>,
}

impl CycleRunner {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            gate: Mutex::new(()),
        }
    }

    /// Runs a cycle unless one is already in progress, in which case `None`.
    pub async fn try_run(&self) -> Option<Result<CycleReport, StoreError>> {
        let _guard = self.gate.try_lock().ok()?;
        Some(self.dispatcher.run_cycle().await)
    }

    /// Runs a cycle on every tick, starting immediately. Never returns.
    pub async fn run_every(&self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Scheduling a cycle every {period:?}");

        loop {
            interval.tick().await;
            match self.try_run().await {
                Some(Ok(report)) if report.failed() > 0 => {
                    warn!("Cycle finished with {} failed subscribers", report.failed())
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => error!("Cycle aborted, could not load subscribers: {e}"),
                None => warn!("Previous cycle still running; skipping this tick"),
            }
        }
    }
}
