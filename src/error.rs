//! Errors for the parts of the crate that touch the outside world.
//!
//! Gauge geometry itself never fails; bad threshold input is clamped or
//! defaulted instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid color '{0}', expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error("failed to read threshold file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse thresholds: {0}")]
    Thresholds(#[from] serde_json::Error),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("pixel buffer error: {0}")]
    Pixels(#[from] pixels::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
