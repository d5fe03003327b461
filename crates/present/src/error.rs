//! Presentation error types.

use std::collections::TryReserveError;

use thiserror::Error;

/// Presentation-specific error type.
#[derive(Error, Debug)]
pub enum PresentError {
    /// A buffer or target was requested with a zero dimension
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The byte size of a buffer does not fit in the address space
    #[error("Buffer of {width}x{height} pixels is too large")]
    TooLarge { width: u32, height: u32 },

    /// The allocator refused the offscreen buffer
    #[error("Failed to allocate {bytes} bytes for the offscreen buffer: {source}")]
    Allocation {
        bytes: usize,
        #[source]
        source: TryReserveError,
    },

    /// Waiting on a frame fence timed out
    #[error("Timed out waiting for frame fence")]
    FenceTimeout,

    /// Swapchain backend error
    #[error("Swapchain error: {0}")]
    SwapchainError(String),

    /// Error reported by the pixels surface
    #[error("Pixels error: {0}")]
    Pixels(#[from] pixels::Error),

    /// Error resizing the pixels surface or texture
    #[error("Texture error: {0}")]
    Texture(#[from] pixels::TextureError),
}

/// Result type alias for presentation operations.
pub type PresentResult<T> = std::result::Result<T, PresentError>;
