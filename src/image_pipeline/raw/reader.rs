use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::RawFrame;

pub trait RawFrameReader {
    fn read_frame(&self, data: &[u8]) -> Result<RawFrame>;
}

impl<T: RawFrameReader + ?Sized> RawFrameReader for Box<T> {
    fn read_frame(&self, data: &[u8]) -> Result<RawFrame> {
        (**self).read_frame(data)
    }
}
