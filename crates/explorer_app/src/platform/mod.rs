mod app;
mod config;
mod effects;
mod logging;
pub(crate) mod ui;

pub use app::run_app;
