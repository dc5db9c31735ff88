pub mod controller;
pub mod level;
pub mod view;

pub use controller::{Feedback, GameController, GameError, Phase, PointerAction, Redraw};
pub use level::Level;
pub use view::BoardView;

// Level generation constants. Weights are drawn from {20, 25, ..., 100}.
pub const WEIGHT_STEPS: f64 = 17.0;
pub const WEIGHT_MIN_STEP: f64 = 4.0;
pub const WEIGHT_UNIT: f64 = 5.0;
pub const TONE_JITTER: f64 = 32.0; // per-channel offset added to the base tone
pub const CHANNEL_SPREAD: f64 = 128.0; // gradient spans 128..256 per channel
