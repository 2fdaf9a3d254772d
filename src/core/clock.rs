//! Cancellable wall-clock ticker used to move the wheel marker
use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// How often the wheel marker is refreshed.
pub const MARKER_REFRESH: Duration = Duration::from_secs(15);

/// Handle to a running ticker
pub struct Ticker {
    /// Receiver for tick timestamps
    pub ticks: mpsc::Receiver<DateTime<Local>>,
    /// Cancels the ticker task
    pub cancel: CancellationToken,
}

impl Ticker {
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawns a task that sends the current time every `period`, starting
/// immediately. The task ends when cancelled or when the receiver is dropped.
pub fn spawn_ticker(period: Duration) -> Ticker {
    let (tx, rx) = mpsc::channel(1);
    let cancel = CancellationToken::new();
    let cancel_task = cancel.clone();

    tokio::spawn(async move {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = cancel_task.cancelled() => break,
                _ = interval.tick() => {}
            }

            let now = Local::now();
            trace!("Tick at {}", now);
            tokio::select! {
                biased;
                _ = cancel_task.cancelled() => break,
                sent = tx.send(now) => {
                    if sent.is_err() {
                        debug!("Tick receiver dropped, stopping ticker");
                        break;
                    }
                }
            }
        }
        debug!("Ticker stopped");
    });

    Ticker { ticks: rx, cancel }
}
