use crate::events::AppEvent;
use crate::sys::session::Session;
use async_channel::{Receiver, Sender};
use std::ops::ControlFlow;
use std::path::PathBuf;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Spawns the long-lived helpers (config watcher) onto the given runtime.
pub fn start_background_services(
    handle: &Handle,
    config_path: Option<PathBuf>,
    tx: Sender<AppEvent>,
) -> JoinHandle<()> {
    handle.spawn(async move {
        crate::config::run_async_watcher(config_path, tx).await;
    })
}

/// Drives a session until `Quit` or until every sender is gone. Events already queued are
/// handled together and followed by at most one repaint.
pub async fn run_event_loop(session: &mut Session, rx: &Receiver<AppEvent>) {
    while let Ok(event) = rx.recv().await {
        if dispatch(session, event).is_break() {
            return;
        }
        while let Ok(event) = rx.try_recv() {
            if dispatch(session, event).is_break() {
                return;
            }
        }
        session.flush();
    }
    log::debug!("Event channel closed");
    session.shutdown();
}

fn dispatch(session: &mut Session, event: AppEvent) -> ControlFlow<()> {
    log::trace!("Handling {:?}", event);
    session.handle_event(event)
}
