// lib/src/admission/poller.rs

use std::future::Future;
use std::time::Duration;

use log::debug;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollControl {
    Continue,
    Stop,
}

/// A running poll loop. Cancelled by `cancel`, by the tick returning
/// `PollControl::Stop`, or by dropping the handle.
#[derive(Debug)]
pub struct PollHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Calls `tick` every `period`, first after one full period.
pub fn spawn_poller<F, Fut>(period: Duration, mut tick: F) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = PollControl> + Send + 'static,
{
    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = &mut cancel_rx => {
                    debug!("Poller cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if tick().await == PollControl::Stop {
                        debug!("Poller reached a stop condition");
                        break;
                    }
                }
            }
        }
    });
    PollHandle { cancel: Some(cancel_tx), task: Some(task) }
}
