use crate::events::AppEvent;
use async_channel::Sender;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// A pending one-shot event. Dropping the handle does not cancel it.
#[derive(Debug)]
pub struct TimerHandle(AbortHandle);

impl TimerHandle {
    pub fn cancel(&self) {
        self.0.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

pub fn schedule_event(
    handle: &Handle,
    delay: Duration,
    tx: Sender<AppEvent>,
    event: AppEvent,
) -> TimerHandle {
    let task = handle.spawn(async move {
        tokio::time::sleep(delay).await;
        if tx.send(event).await.is_err() {
            log::debug!("Timer fired after the event loop closed");
        }
    });
    TimerHandle(task.abort_handle())
}
