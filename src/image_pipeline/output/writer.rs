use std::io::Write;

use crate::image_pipeline::common::error::Result;

pub trait ImageWriter {
    /// File extension, without the dot, for images this writer produces.
    fn extension(&self) -> &'static str;

    fn write_gray(&self, width: usize, height: usize, data: &[u8], output: &mut dyn Write) -> Result<()>;

    /// `data` is interleaved RGB, three bytes per pixel.
    fn write_rgb(&self, width: usize, height: usize, data: &[u8], output: &mut dyn Write) -> Result<()>;
}

impl<T: ImageWriter + ?Sized> ImageWriter for Box<T> {
    fn extension(&self) -> &'static str {
        (**self).extension()
    }

    fn write_gray(&self, width: usize, height: usize, data: &[u8], output: &mut dyn Write) -> Result<()> {
        (**self).write_gray(width, height, data, output)
    }

    fn write_rgb(&self, width: usize, height: usize, data: &[u8], output: &mut dyn Write) -> Result<()> {
        (**self).write_rgb(width, height, data, output)
    }
}
