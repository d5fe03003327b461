//! Presentation through a GPU swapchain.
//!
//! [`SwapchainBackend`] is the capability table a GPU backend fills in once
//! at startup: image acquisition, submission of the buffer upload, present,
//! idle wait and recreation. [`SwapchainPresenter`] drives it with the
//! frames-in-flight discipline from [`FrameSlots`] and turns out-of-date
//! results into [`PresentOutcome::Stale`] instead of errors.

use tracing::{debug, info, warn};

use crate::buffer::PixelBuffer;
use crate::error::PresentResult;
use crate::frame_slots::FrameSlots;
use crate::presenter::{PresentOutcome, Presenter};
use crate::sync::FrameSlot;

/// Result of a swapchain acquire or present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStatus<T> {
    /// The operation succeeded and the swapchain matches the surface.
    Ready(T),
    /// The operation succeeded but the swapchain should be recreated.
    Suboptimal(T),
    /// The swapchain no longer matches the surface; nothing was done.
    OutOfDate,
}

/// Operations a GPU backend exposes to the presenter.
pub trait SwapchainBackend {
    /// Per-frame resources (command buffer, semaphores, in-flight fence).
    type Slot: FrameSlot;

    /// Create the resources for frame slot `index`, fence signaled.
    fn create_slot(&mut self, index: usize) -> PresentResult<Self::Slot>;

    /// Acquire the next presentable image for `slot`.
    fn acquire_image(&mut self, slot: &Self::Slot) -> PresentResult<SwapStatus<u32>>;

    /// Record and submit the copy of `buffer` into image `image_index`.
    ///
    /// The backend signals `slot`'s fence when the GPU finishes.
    fn submit(
        &mut self,
        slot: &mut Self::Slot,
        image_index: u32,
        buffer: &PixelBuffer,
    ) -> PresentResult<()>;

    /// Queue image `image_index` for presentation after `slot`'s submission.
    fn present_image(&mut self, slot: &Self::Slot, image_index: u32)
    -> PresentResult<SwapStatus<()>>;

    /// Block until the device has no pending work.
    fn wait_idle(&mut self) -> PresentResult<()>;

    /// Recreate the swapchain and its image-dependent resources.
    fn recreate(&mut self, width: u32, height: u32) -> PresentResult<()>;
}

/// [`Presenter`] over a [`SwapchainBackend`] with N frames in flight.
pub struct SwapchainPresenter<B: SwapchainBackend> {
    backend: B,
    slots: FrameSlots<B::Slot>,
    extent: (u32, u32),
}

impl<B: SwapchainBackend> SwapchainPresenter<B> {
    /// Create the frame slots and take ownership of `backend`.
    ///
    /// # Errors
    ///
    /// Returns an error if any slot creation fails.
    pub fn new(mut backend: B, width: u32, height: u32) -> PresentResult<Self> {
        let slots = FrameSlots::new(|index| backend.create_slot(index))?;

        info!(
            "Swapchain presenter created: {}x{}, {} frames in flight",
            width,
            height,
            slots.len()
        );

        Ok(Self {
            backend,
            slots,
            extent: (width, height),
        })
    }

    /// Current swapchain extent.
    pub fn extent(&self) -> (u32, u32) {
        self.extent
    }

    /// Index of the frame slot the next present will use.
    pub fn current_slot(&self) -> usize {
        self.slots.current_index()
    }

    /// The backend, e.g. for queries.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: SwapchainBackend> Presenter for SwapchainPresenter<B> {
    fn present(&mut self, buffer: &PixelBuffer) -> PresentResult<PresentOutcome> {
        // Wait for this slot's previous work to complete
        self.slots.wait_for_slot()?;

        let (image_index, acquire_suboptimal) =
            match self.backend.acquire_image(self.slots.current())? {
                SwapStatus::Ready(index) => (index, false),
                SwapStatus::Suboptimal(index) => {
                    debug!("Swapchain suboptimal during acquire");
                    (index, true)
                }
                SwapStatus::OutOfDate => {
                    debug!("Swapchain out of date during acquire");
                    return Ok(PresentOutcome::Stale);
                }
            };

        // Reset fence only after we're sure we'll submit work
        self.slots.reset_slot()?;
        if let Err(e) = self
            .backend
            .submit(self.slots.current_mut(), image_index, buffer)
        {
            // Nothing reached the GPU, so nothing will ever signal the reset fence.
            let index = self.slots.current_index();
            warn!("Submit failed on frame slot {}, recreating it: {}", index, e);
            let slot = self.backend.create_slot(index)?;
            self.slots.replace_current(slot);
            return Err(e);
        }

        let status = self
            .backend
            .present_image(self.slots.current(), image_index)?;

        self.slots.next_slot();

        match status {
            SwapStatus::Ready(()) if !acquire_suboptimal => Ok(PresentOutcome::Presented),
            SwapStatus::Ready(()) | SwapStatus::Suboptimal(()) => {
                debug!("Swapchain suboptimal, requesting rebuild");
                Ok(PresentOutcome::Stale)
            }
            SwapStatus::OutOfDate => {
                debug!("Swapchain out of date during present");
                Ok(PresentOutcome::Stale)
            }
        }
    }

    fn rebuild(&mut self, width: u32, height: u32) -> PresentResult<()> {
        self.slots.wait_for_all()?;
        self.backend.wait_idle()?;
        self.backend.recreate(width, height)?;
        self.extent = (width, height);

        info!("Swapchain rebuilt for {}x{}", width, height);
        Ok(())
    }
}
