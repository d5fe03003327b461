//! Scrolling blue/green gradient.

use raika_present::{PixelBuffer, pack_rgb};

/// Fill `buffer` with the gradient shifted by the given offsets.
///
/// Blue follows `x + x_offset`, green follows `y + y_offset`, both wrapping
/// every 256 pixels; red stays zero.
pub fn render_gradient(buffer: &mut PixelBuffer, x_offset: i32, y_offset: i32) {
    for y in 0..buffer.height() {
        let green = (y as i32).wrapping_add(y_offset) as u8;
        let row = buffer.row_mut(y);
        for (x, pixel) in row.iter_mut().enumerate() {
            let blue = (x as i32).wrapping_add(x_offset) as u8;
            *pixel = pack_rgb(0, green, blue);
        }
    }
}
