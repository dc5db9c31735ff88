pub mod app;
pub mod paint;
