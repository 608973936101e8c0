use crate::error::Error;
use crate::sampler::{Bgr, LocalContext};

use nalgebra as na;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

/// Column names of the feature file. The color groups follow the value order
/// of [`LocalContext::colors`].
pub const FEATURE_HEADER: [&str; 22] = [
    "frame",
    "node_id",
    "position_x",
    "position_y",
    "width",
    "height",
    "type",
    "center_blue",
    "center_green",
    "center_red",
    "above_blue",
    "above_green",
    "above_red",
    "below_blue",
    "below_green",
    "below_red",
    "left_blue",
    "left_green",
    "left_red",
    "right_blue",
    "right_green",
    "right_red",
];

/// Per-object, per-frame attributes of a graph node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub frame: u32,
    pub node_id: u32,
    /// Center of the bounding box.
    pub position: na::Point2<f32>,
    pub width: i64,
    pub height: i64,
    /// Node type code, see [`crate::Label::code`].
    pub kind: u8,
    pub context: LocalContext,
}

struct ColorCells(Option<Bgr>);

impl fmt::Display for ColorCells {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(c) => write!(f, "{} {} {}", c.x, c.y, c.z),
            None => f.write_str("nan nan nan"),
        }
    }
}

impl fmt::Display for FeatureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.frame,
            self.node_id,
            self.position.x,
            self.position.y,
            self.width,
            self.height,
            self.kind
        )?;

        for color in self.context.colors() {
            write!(f, " {}", ColorCells(color))?;
        }

        Ok(())
    }
}

/// Space separated feature file: a `#` header line, then one row per record.
pub struct FeatureWriter<W: Write> {
    inner: W,
    rows: usize,
}

impl<W: Write> FeatureWriter<W> {
    pub fn new(mut inner: W) -> Result<Self, Error> {
        writeln!(inner, "# {}", FEATURE_HEADER.join(" "))?;

        Ok(Self { inner, rows: 0 })
    }

    pub fn write(&mut self, record: &FeatureRecord) -> Result<(), Error> {
        writeln!(self.inner, "{}", record)?;
        self.rows += 1;

        Ok(())
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> Result<W, Error> {
        self.inner.flush()?;

        Ok(self.inner)
    }
}
