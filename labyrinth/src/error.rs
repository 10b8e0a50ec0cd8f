use thiserror::Error;

/// Reasons a [`MazeConfig`](crate::config::MazeConfig) is rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("maze must be at least 3x3 cells, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("carve start ({x}, {y}) is outside the maze")]
    StartOutOfBounds { x: i32, y: i32 },
    #[error("{what} cell ({x}, {y}) is never carved from the start cell")]
    NotCarvable { what: &'static str, x: i32, y: i32 },
    #[error("pursuer speed must be positive and finite, got {0}")]
    InvalidSpeed(f32),
    #[error("catch radius must be non-negative and finite, got {0}")]
    InvalidCatchRadius(f32),
}
