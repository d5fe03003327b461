//! Error types shared across the platform layer.

use thiserror::Error;

/// Main error type for the platform layer.
#[derive(Error, Debug)]
pub enum Error {
    /// Window creation or management errors
    #[error("Window error: {0}")]
    Window(String),

    /// Presentation target errors that are not recoverable by a rebuild
    #[error("Present error: {0}")]
    Present(String),
}

/// Result type alias using the platform layer's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Present("device lost".to_string());
        assert_eq!(err.to_string(), "Present error: device lost");
    }

    #[test]
    fn test_window_error_display() {
        let err = Error::Window("no display".to_string());
        assert_eq!(err.to_string(), "Window error: no display");
    }
}
