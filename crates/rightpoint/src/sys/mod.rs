pub mod autopilot;
pub mod runtime;
pub mod session;
pub mod simulate;
pub mod timer;
