use crate::error::Error;
use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// Left-top-right-bottom box in integer pixel coordinates, (0,0) is the
/// top left corner of the frame.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BBox([i32; 4]);

impl From<BBox> for [i32; 4] {
    fn from(bbox: BBox) -> Self {
        bbox.0
    }
}

impl BBox {
    /// Builds a box without checking that the corners are ordered.
    #[inline]
    pub fn ltrb(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        BBox([xmin, ymin, xmax, ymax])
    }

    #[inline]
    pub fn as_slice(&self) -> &[i32; 4] {
        &self.0
    }

    #[inline(always)]
    pub fn left(&self) -> i32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> i32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn right(&self) -> i32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn bottom(&self) -> i32 {
        self.0[3]
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.left() > self.right() || self.top() > self.bottom() {
            return Err(Error::GeometryViolation {
                xmin: self.left(),
                ymin: self.top(),
                xmax: self.right(),
                ymax: self.bottom(),
            });
        }

        Ok(())
    }

    /// Midpoint of the box extrema.
    #[inline]
    pub fn center(&self) -> na::Point2<f32> {
        na::Point2::new(
            (self.left() as f32 + self.right() as f32) / 2.0,
            (self.top() as f32 + self.bottom() as f32) / 2.0,
        )
    }

    /// `(width, height)`, computed in `i64` so any pair of `i32` extrema
    /// fits. Not clamped: an unordered box gives negative sizes.
    #[inline]
    pub fn dimensions(&self) -> (i64, i64) {
        (
            i64::from(self.right()) - i64::from(self.left()),
            i64::from(self.bottom()) - i64::from(self.top()),
        )
    }

    #[inline]
    pub fn region(&self) -> Region {
        Region::new(self.left(), self.top(), self.right(), self.bottom())
    }

    /// Strip of `size` pixels outside the given edge, spanning the box along
    /// the other axis.
    pub fn margin(&self, side: Side, size: u32) -> Region {
        let m = i32::try_from(size).unwrap_or(i32::MAX);
        let (l, t, r, b) = (self.left(), self.top(), self.right(), self.bottom());

        match side {
            Side::Above => Region::new(l, t.saturating_sub(m), r, t),
            Side::Below => Region::new(l, b, r, b.saturating_add(m)),
            Side::Left => Region::new(l.saturating_sub(m), t, l, b),
            Side::Right => Region::new(r, t, r.saturating_add(m), b),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    Above,
    Below,
    Left,
    Right,
}

/// Half-open pixel rectangle `[left, right) x [top, bottom)`.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Region {
    #[inline]
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Intersects the region with a `width x height` frame. `None` when
    /// nothing of the region is left.
    pub fn clip(&self, width: u32, height: u32) -> Option<Region> {
        let w = i32::try_from(width).unwrap_or(i32::MAX);
        let h = i32::try_from(height).unwrap_or(i32::MAX);

        let clipped = Region::new(
            self.left.max(0),
            self.top.max(0),
            self.right.min(w),
            self.bottom.min(h),
        );

        if clipped.is_empty() {
            None
        } else {
            Some(clipped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_dimensions() {
        let bbox = BBox::ltrb(0, 0, 10, 20);

        assert_eq!(bbox.center(), na::Point2::new(5.0, 10.0));
        assert_eq!(bbox.dimensions(), (10, 20));
    }

    #[test]
    fn test_odd_center_is_fractional() {
        let bbox = BBox::ltrb(1, 2, 4, 7);

        assert_eq!(bbox.center(), na::Point2::new(2.5, 4.5));
    }

    #[test]
    fn test_unordered_box() {
        let bbox = BBox::ltrb(10, 0, 4, 5);

        assert_eq!(bbox.dimensions(), (-6, 5));
        assert!(matches!(
            bbox.validate(),
            Err(Error::GeometryViolation { xmin: 10, xmax: 4, .. })
        ));
        assert!(BBox::ltrb(3, 3, 3, 3).validate().is_ok());
    }

    #[test]
    fn test_extreme_span() {
        let bbox = BBox::ltrb(-2_000_000_000, i32::MIN, 2_000_000_000, i32::MAX);

        assert!(bbox.validate().is_ok());
        assert_eq!(bbox.dimensions(), (4_000_000_000, u32::MAX as i64));
        assert_eq!(bbox.center(), na::Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_margins() {
        let bbox = BBox::ltrb(30, 40, 50, 70);

        assert_eq!(bbox.margin(Side::Above, 20), Region::new(30, 20, 50, 40));
        assert_eq!(bbox.margin(Side::Below, 20), Region::new(30, 70, 50, 90));
        assert_eq!(bbox.margin(Side::Left, 20), Region::new(10, 40, 30, 70));
        assert_eq!(bbox.margin(Side::Right, 20), Region::new(50, 40, 70, 70));
    }

    #[test]
    fn test_clip() {
        let region = BBox::ltrb(5, 0, 15, 10).margin(Side::Above, 20);
        assert_eq!(region.clip(100, 100), None);

        let region = Region::new(-5, -5, 10, 10);
        assert_eq!(region.clip(8, 100), Some(Region::new(0, 0, 8, 10)));

        let region = Region::new(120, 0, 140, 10);
        assert_eq!(region.clip(100, 100), None);
    }
}
