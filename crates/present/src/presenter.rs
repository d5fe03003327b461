//! Presentation adapter contract.

use crate::buffer::PixelBuffer;
use crate::error::PresentResult;

/// Result of a successful present call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    /// The visible surface now shows the buffer.
    Presented,
    /// The target no longer matches the window and must be rebuilt before
    /// the next present.
    Stale,
}

/// Copies the offscreen buffer to the visible surface.
///
/// Implementations fit the buffer to the target size set by the last
/// [`rebuild`](Presenter::rebuild) call; how a size mismatch is scaled is up
/// to the backend. They only borrow the buffer for the duration of the call.
pub trait Presenter {
    /// Present `buffer`.
    ///
    /// # Errors
    ///
    /// A stale target is not an error; it is reported as
    /// [`PresentOutcome::Stale`]. Errors are failures a rebuild cannot fix.
    fn present(&mut self, buffer: &PixelBuffer) -> PresentResult<PresentOutcome>;

    /// Rebuild the target-specific resources for a `width` x `height` surface.
    fn rebuild(&mut self, width: u32, height: u32) -> PresentResult<()>;
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn present(&mut self, buffer: &PixelBuffer) -> PresentResult<PresentOutcome> {
        (**self).present(buffer)
    }

    fn rebuild(&mut self, width: u32, height: u32) -> PresentResult<()> {
        (**self).rebuild(width, height)
    }
}
