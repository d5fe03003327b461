//! Offscreen buffer and presentation.
//!
//! This crate owns everything between the game's pixels and the screen:
//! - The CPU-side [`PixelBuffer`]
//! - The [`Presenter`] contract with its stale-target signal
//! - A software presenter over `pixels`
//! - Frames-in-flight bookkeeping and the GPU swapchain contract

mod error;

pub mod buffer;
pub mod frame_slots;
pub mod presenter;
pub mod software;
pub mod swapchain;
pub mod sync;

pub use buffer::{BYTES_PER_PIXEL, PixelBuffer, pack_rgb};
pub use error::{PresentError, PresentResult};
pub use frame_slots::{FrameSlots, MAX_FRAMES_IN_FLIGHT};
pub use presenter::{PresentOutcome, Presenter};
pub use software::SoftwarePresenter;
pub use swapchain::{SwapStatus, SwapchainBackend, SwapchainPresenter};
pub use sync::{Fence, FrameSlot};
