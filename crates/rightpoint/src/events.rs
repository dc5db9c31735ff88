use ringkit::{Point, Viewport};

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Raw pointer position in viewport pixels.
    PointerMove(Point),
    Resize(Viewport),
    ResumeLevel,
    ConfigReload,
    Quit,
}
