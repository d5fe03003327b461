//! Synchronization contract for GPU presentation backends.
//!
//! A [`Fence`] is the GPU-to-CPU signal a backend attaches to a submission.
//! The CPU waits on it before reusing the resources that submission touched.
//!
//! # Synchronization flow
//!
//! ```text
//! 1. Wait on the slot's in-flight fence (previous use of this slot is done)
//! 2. Acquire a swapchain image
//! 3. Reset the fence (only once work is certain to be submitted)
//! 4. Submit the upload/blit; the backend signals the fence on completion
//! 5. Present the image
//! ```

use crate::error::PresentResult;

/// GPU-to-CPU completion signal.
pub trait Fence {
    /// Block until the fence is signaled or `timeout` nanoseconds pass.
    ///
    /// # Errors
    ///
    /// Returns [`PresentError::FenceTimeout`](crate::PresentError::FenceTimeout)
    /// if the timeout expires.
    fn wait(&self, timeout: u64) -> PresentResult<()>;

    /// Return the fence to the unsignaled state.
    fn reset(&self) -> PresentResult<()>;

    /// Whether the fence is currently signaled, without blocking.
    fn is_signaled(&self) -> PresentResult<bool>;
}

/// Per-slot state a backend keeps for one frame in flight.
pub trait FrameSlot {
    type Fence: Fence;

    /// Fence signaled when this slot's last submission completes.
    ///
    /// Backends create it signaled so the first wait does not block.
    fn in_flight_fence(&self) -> &Self::Fence;
}
