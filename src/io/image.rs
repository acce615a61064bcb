use crate::error::Result;
use image::{ImageBuffer, Rgb};
use std::path::Path;

/// Saves a 0RGB `u32` buffer (the window's pixel format) as an image file.
///
/// The format follows the file extension.
pub fn save_buffer_to_image<P: AsRef<Path>>(
    buffer: &[u32],
    width: usize,
    height: usize,
    path: P,
) -> Result<()> {
    let img_buf = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let color = buffer[(y as usize) * width + (x as usize)];
        Rgb([
            ((color >> 16) & 0xFF) as u8,
            ((color >> 8) & 0xFF) as u8,
            (color & 0xFF) as u8,
        ])
    });
    img_buf.save(path.as_ref())?;
    Ok(())
}
