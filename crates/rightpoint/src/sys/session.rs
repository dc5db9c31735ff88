use crate::config;
use crate::events::AppEvent;
use crate::game::view::{self, BoardView};
use crate::game::{GameController, Redraw};
use crate::sys::timer::{self, TimerHandle};
use async_channel::Sender;
use ringkit::{Canvas, Scene, Viewport};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Handle;

/// Everything one running game owns. Events mutate it one at a time; `flush` paints whatever
/// they requested in a single pass.
pub struct Session {
    game: GameController,
    scene: Scene,
    view: BoardView,
    frame: Redraw,
    pending_resume: Option<TimerHandle>,
    config_path: Option<PathBuf>,
    handle: Handle,
    tx: Sender<AppEvent>,
}

impl Session {
    pub fn new(
        mut game: GameController,
        viewport: Viewport,
        handle: Handle,
        tx: Sender<AppEvent>,
    ) -> Self {
        let (scene, view) = view::new_scene(&mut game, viewport);
        Self {
            game,
            scene,
            view,
            frame: Redraw::None,
            pending_resume: None,
            config_path: None,
            handle,
            tx,
        }
    }

    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn handle_event(&mut self, event: AppEvent) -> ControlFlow<()> {
        match event {
            AppEvent::PointerMove(raw) => {
                match self.game.pointer_moved(raw, self.scene.viewport()) {
                    Ok(action) => {
                        self.request(action.redraw);
                        if let Some(delay) = action.resume_after {
                            self.schedule_resume(delay);
                        }
                    }
                    Err(e) => log::error!("Pointer update failed: {}", e),
                }
            }
            AppEvent::Resize(viewport) => {
                self.scene.set_viewport(viewport);
                let redraw = self.game.resize(viewport);
                self.request(redraw);
            }
            AppEvent::ResumeLevel => {
                self.pending_resume = None;
                match self.game.start_next_level() {
                    Ok(redraw) => self.request(redraw),
                    Err(e) => log::error!("Failed to start next level: {}", e),
                }
            }
            AppEvent::ConfigReload => self.reload_config(),
            AppEvent::Quit => {
                self.shutdown();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn request(&mut self, redraw: Redraw) {
        self.frame = self.frame.merge(redraw);
    }

    fn schedule_resume(&mut self, delay: Duration) {
        if let Some(stale) = self.pending_resume.take() {
            stale.cancel();
        }
        self.pending_resume = Some(timer::schedule_event(
            &self.handle,
            delay,
            self.tx.clone(),
            AppEvent::ResumeLevel,
        ));
    }

    fn reload_config(&mut self) {
        match config::load_config(self.config_path.as_deref()) {
            Ok(new_config) => match self.game.reload(new_config) {
                Ok(()) => log::info!("Configuration reloaded"),
                Err(e) => log::error!("Rejected reloaded config: {}", e),
            },
            Err(e) => log::error!("Failed to reload config: {}", e),
        }
    }

    /// Paints the coalesced frame request. Returns whether anything was drawn.
    pub fn flush(&mut self) -> bool {
        let redraw = std::mem::take(&mut self.frame);
        if redraw == Redraw::None {
            return false;
        }
        self.view.draw(&mut self.scene, &self.game, redraw);
        true
    }

    pub fn has_pending_frame(&self) -> bool {
        self.frame != Redraw::None
    }

    pub fn has_pending_resume(&self) -> bool {
        self.pending_resume.is_some()
    }

    pub fn shutdown(&mut self) {
        if let Some(timer) = self.pending_resume.take() {
            timer.cancel();
        }
    }

    pub fn game(&self) -> &GameController {
        &self.game
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}
