use crate::bbox::{BBox, Region, Side};
use crate::frame::Frame;

use nalgebra as na;
use ndarray::prelude::*;
use serde_derive::{Deserialize, Serialize};

/// Width in pixels of the strips sampled around a box.
pub const DEFAULT_MARGIN: u32 = 20;

/// Mean blue, green and red values of a region.
pub type Bgr = na::Vector3<f64>;

/// Average colors inside a box and in the four strips around it. `None`
/// marks a region that lies entirely outside the frame (or has no area).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct LocalContext {
    pub within: Option<Bgr>,
    pub above: Option<Bgr>,
    pub below: Option<Bgr>,
    pub left: Option<Bgr>,
    pub right: Option<Bgr>,
}

impl LocalContext {
    /// Colors in output order: within, above, below, left, right.
    #[inline]
    pub fn colors(&self) -> [Option<Bgr>; 5] {
        [self.within, self.above, self.below, self.left, self.right]
    }
}

/// Per-channel mean over every pixel of an `h x w x 3` view.
///
/// Channel sums are accumulated exactly in `u64` and divided once.
pub fn average_color(view: ArrayView3<'_, u8>) -> Option<Bgr> {
    let count = view.shape()[0] * view.shape()[1];
    if count == 0 {
        return None;
    }

    let mut sums = [0u64; 3];
    for (sum, plane) in sums.iter_mut().zip(view.axis_iter(Axis(2))) {
        *sum = plane.iter().map(|&v| u64::from(v)).sum();
    }

    let n = count as f64;
    Some(Bgr::new(
        sums[0] as f64 / n,
        sums[1] as f64 / n,
        sums[2] as f64 / n,
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextSampler {
    margin: u32,
}

impl Default for ContextSampler {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN)
    }
}

impl ContextSampler {
    pub fn new(margin: u32) -> Self {
        Self { margin }
    }

    #[inline]
    pub fn margin(&self) -> u32 {
        self.margin
    }

    fn region_color(&self, frame: &Frame, region: &Region) -> Option<Bgr> {
        let color = frame.crop(region).and_then(average_color);
        if color.is_none() {
            log::debug!(
                "frame {}: region {:?} is outside of the {}x{} frame",
                frame.index(),
                region,
                frame.width(),
                frame.height()
            );
        }

        color
    }

    pub fn sample(&self, frame: &Frame, bbox: &BBox) -> LocalContext {
        LocalContext {
            within: self.region_color(frame, &bbox.region()),
            above: self.region_color(frame, &bbox.margin(Side::Above, self.margin)),
            below: self.region_color(frame, &bbox.margin(Side::Below, self.margin)),
            left: self.region_color(frame, &bbox.margin(Side::Left, self.margin)),
            right: self.region_color(frame, &bbox.margin(Side::Right, self.margin)),
        }
    }
}
