pub mod config;
pub mod events;
pub mod game;
pub mod sys;

#[cfg(feature = "gui")]
pub mod gui;
