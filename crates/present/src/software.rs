//! Software presenter backed by the `pixels` crate.
//!
//! The offscreen buffer is converted from packed `0x00RRGGBB` into the RGBA8
//! frame `pixels` owns, and `pixels` draws that frame onto the window
//! surface at the largest whole-number scale that fits, centered with
//! black borders. The surface texture is rebuilt on resize; the frame
//! texture follows the buffer dimensions, so the two only differ while a
//! buffer resize is pending or has failed.

use pixels::wgpu::SurfaceError;
use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, info};

use raika_platform::Window;

use crate::buffer::PixelBuffer;
use crate::error::{PresentError, PresentResult};
use crate::presenter::{PresentOutcome, Presenter};

/// Convert a packed `0x00RRGGBB` pixel to RGBA8 bytes.
#[inline]
pub(crate) fn xrgb_to_rgba(pixel: u32) -> [u8; 4] {
    [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8, 0xFF]
}

/// Copy `buffer` into an RGBA8 frame of the same dimensions.
pub(crate) fn copy_to_rgba(buffer: &PixelBuffer, frame: &mut [u8]) {
    let frame: &mut [[u8; 4]] = bytemuck::cast_slice_mut(frame);
    let width = buffer.width() as usize;

    for (dst_row, src_row) in frame.chunks_exact_mut(width.max(1)).zip(buffer.rows()) {
        for (dst, &src) in dst_row.iter_mut().zip(src_row) {
            *dst = xrgb_to_rgba(src);
        }
    }
}

/// Presents the offscreen buffer to a winit window through `pixels`.
pub struct SoftwarePresenter {
    pixels: Pixels<'static>,
    /// Dimensions of the `pixels` frame texture.
    frame_size: (u32, u32),
    /// Dimensions of the window surface.
    target_size: (u32, u32),
}

impl SoftwarePresenter {
    /// Create a presenter for `window` with a frame matching `buffer`.
    ///
    /// # Errors
    ///
    /// Returns an error if no adapter or device can be created for the window surface.
    pub fn new(window: &Window, buffer: &PixelBuffer) -> PresentResult<Self> {
        let (width, height) = (window.width(), window.height());
        if width == 0 || height == 0 || buffer.is_empty() {
            return Err(PresentError::InvalidDimensions { width, height });
        }

        let surface = SurfaceTexture::new(width, height, window.inner_arc());
        let pixels = Pixels::new(buffer.width(), buffer.height(), surface)?;

        info!(
            "Software presenter created: frame {}x{}, surface {}x{}",
            buffer.width(),
            buffer.height(),
            width,
            height
        );

        Ok(Self {
            pixels,
            frame_size: (buffer.width(), buffer.height()),
            target_size: (width, height),
        })
    }

    /// Current window surface dimensions.
    pub fn target_size(&self) -> (u32, u32) {
        self.target_size
    }
}

impl Presenter for SoftwarePresenter {
    fn present(&mut self, buffer: &PixelBuffer) -> PresentResult<PresentOutcome> {
        let size = (buffer.width(), buffer.height());
        if size != self.frame_size {
            self.pixels.resize_buffer(size.0, size.1)?;
            self.frame_size = size;
            debug!("Frame texture resized: {}x{}", size.0, size.1);
        }

        copy_to_rgba(buffer, self.pixels.frame_mut());

        match self.pixels.render() {
            Ok(()) => Ok(PresentOutcome::Presented),
            Err(pixels::Error::Surface(SurfaceError::Outdated)) => {
                debug!("Surface outdated during present");
                Ok(PresentOutcome::Stale)
            }
            Err(pixels::Error::Surface(SurfaceError::Lost)) => {
                debug!("Surface lost during present");
                Ok(PresentOutcome::Stale)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn rebuild(&mut self, width: u32, height: u32) -> PresentResult<()> {
        if width == 0 || height == 0 {
            return Err(PresentError::InvalidDimensions { width, height });
        }

        self.pixels.resize_surface(width, height)?;
        self.target_size = (width, height);

        info!("Surface rebuilt for {}x{}", width, height);
        Ok(())
    }
}
