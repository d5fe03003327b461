//! CPU-side offscreen pixel buffer.
//!
//! Pixels are packed `0x00RRGGBB` words laid out row by row. The stride is
//! kept in bytes, matching the pitch the window systems expect.

use tracing::debug;

use crate::error::{PresentError, PresentResult};

/// Bytes per packed pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Pack 8-bit channels into a `0x00RRGGBB` pixel.
#[inline]
pub const fn pack_rgb(red: u8, green: u8, blue: u8) -> u32 {
    ((red as u32) << 16) | ((green as u32) << 8) | blue as u32
}

/// Offscreen buffer matching the current window size.
///
/// Invariants: `stride >= width * BYTES_PER_PIXEL` and the byte length equals
/// `stride * height`. A default buffer is empty (0x0).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
    stride: usize,
}

impl PixelBuffer {
    /// Allocate a zeroed buffer of `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> PresentResult<Self> {
        let mut buffer = Self::default();
        buffer.resize(width, height)?;
        Ok(buffer)
    }

    /// Replace the region with a zeroed one of the new size.
    ///
    /// The new region is allocated before the old one is released, so on
    /// error the previous contents and dimensions are untouched.
    ///
    /// # Errors
    ///
    /// - [`PresentError::InvalidDimensions`] if either dimension is zero
    /// - [`PresentError::TooLarge`] if the byte size overflows
    /// - [`PresentError::Allocation`] if the allocator refuses the request
    pub fn resize(&mut self, width: u32, height: u32) -> PresentResult<()> {
        if width == 0 || height == 0 {
            return Err(PresentError::InvalidDimensions { width, height });
        }

        let len = (width as usize)
            .checked_mul(height as usize)
            .filter(|len| {
                len.checked_mul(BYTES_PER_PIXEL)
                    .is_some_and(|bytes| bytes <= isize::MAX as usize)
            })
            .ok_or(PresentError::TooLarge { width, height })?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|source| PresentError::Allocation {
                bytes: len * BYTES_PER_PIXEL,
                source,
            })?;
        pixels.resize(len, 0);

        self.pixels = pixels;
        self.width = width;
        self.height = height;
        self.stride = width as usize * BYTES_PER_PIXEL;

        debug!("Offscreen buffer resized: {}x{}", width, height);
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row pitch in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Total byte length of the region.
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.pixels.len() * BYTES_PER_PIXEL
    }

    /// Whether no region is allocated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    fn row_pixels(&self) -> usize {
        self.stride / BYTES_PER_PIXEL
    }

    /// Write one pixel. The caller guarantees `x < width && y < height`.
    #[inline]
    pub fn write(&mut self, x: u32, y: u32, color: u32) {
        debug_assert!(x < self.width && y < self.height);
        let index = y as usize * self.row_pixels() + x as usize;
        self.pixels[index] = color;
    }

    /// Read one pixel. The caller guarantees `x < width && y < height`.
    #[inline]
    pub fn read(&self, x: u32, y: u32) -> u32 {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[y as usize * self.row_pixels() + x as usize]
    }

    /// Mutable view of row `y`, `width` pixels long.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let row_pixels = self.row_pixels();
        let start = y as usize * row_pixels;
        &mut self.pixels[start..start + self.width as usize]
    }

    /// Iterate rows, each `width` pixels long.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        let width = self.width as usize;
        self.pixels
            .chunks_exact(self.row_pixels().max(1))
            .map(move |row| &row[..width])
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// The contiguous byte region, `stride * height` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}
