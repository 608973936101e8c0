use crate::bbox::Region;
use crate::error::Error;

use ndarray::prelude::*;

/// A decoded video frame: `height x width x 3` BGR pixels and the absolute
/// index of the frame in its stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    index: u32,
    pixels: Array3<u8>,
}

impl Frame {
    pub fn new(index: u32, pixels: Array3<u8>) -> Result<Self, Error> {
        let channels = pixels.shape()[2];
        if channels != 3 {
            return Err(Error::InvalidFrame(format!(
                "expected 3 channels, got {}",
                channels
            )));
        }

        Ok(Self { index, pixels })
    }

    /// Frame painted with a single BGR color.
    pub fn filled(index: u32, width: u32, height: u32, bgr: [u8; 3]) -> Self {
        let pixels = Array3::from_shape_fn((height as usize, width as usize, 3), |(_, _, c)| {
            bgr[c]
        });

        Self { index, pixels }
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.shape()[1] as u32
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.shape()[0] as u32
    }

    #[inline]
    pub fn dims(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    #[inline]
    pub fn pixels(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        self.pixels.view_mut()
    }

    /// Pixels of `region` after clipping it to the frame bounds.
    pub fn crop(&self, region: &Region) -> Option<ArrayView3<'_, u8>> {
        let r = region.clip(self.width(), self.height())?;

        Some(self.pixels.slice(s![
            r.top as usize..r.bottom as usize,
            r.left as usize..r.right as usize,
            ..
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dims() {
        let frame = Frame::filled(4, 16, 9, [1, 2, 3]);

        assert_eq!(frame.dims(), (16, 9));
        assert_eq!(frame.index(), 4);
        assert_eq!(frame.pixels()[[8, 15, 2]], 3);
    }

    #[test]
    fn test_rejects_wrong_channels() {
        let pixels = Array3::<u8>::zeros((4, 4, 1));

        assert!(matches!(Frame::new(0, pixels), Err(Error::InvalidFrame(_))));
    }

    #[test]
    fn test_crop_is_clipped() {
        let frame = Frame::filled(0, 10, 10, [0, 0, 0]);

        let view = frame.crop(&Region::new(-3, 8, 4, 20)).unwrap();
        assert_eq!(view.shape(), &[2, 4, 3]);

        assert!(frame.crop(&Region::new(0, -20, 10, 0)).is_none());
    }
}
