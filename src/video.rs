use crate::error::Error;
use crate::frame::Frame;

/// Sequential reader over decoded frames with absolute repositioning.
///
/// `seek` may cost time linear in the displacement for containers without
/// random access.
pub trait VideoCursor {
    /// Next frame, or `None` once the stream is exhausted.
    fn advance(&mut self) -> Result<Option<Frame>, Error>;

    /// Repositions the cursor so the next `advance` yields frame `index`.
    /// Seeking past the end is not an error: the next `advance` returns `None`.
    fn seek(&mut self, index: u32) -> Result<(), Error>;

    /// Index of the frame the next `advance` would return.
    fn position(&self) -> u32;
}

impl<C: VideoCursor + ?Sized> VideoCursor for &mut C {
    #[inline]
    fn advance(&mut self) -> Result<Option<Frame>, Error> {
        (**self).advance()
    }

    #[inline]
    fn seek(&mut self, index: u32) -> Result<(), Error> {
        (**self).seek(index)
    }

    #[inline]
    fn position(&self) -> u32 {
        (**self).position()
    }
}

/// Cursor over frames held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryVideo {
    frames: Vec<Frame>,
    pos: u32,
}

impl MemoryVideo {
    /// Frames are re-indexed by their position in `frames`.
    pub fn new<I: IntoIterator<Item = ndarray::Array3<u8>>>(frames: I) -> Result<Self, Error> {
        let frames = frames
            .into_iter()
            .enumerate()
            .map(|(idx, pixels)| Frame::new(idx as u32, pixels))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { frames, pos: 0 })
    }

    /// `count` frames where every pixel of frame `i` has value `f(i)`.
    pub fn from_fn<F: Fn(u32) -> [u8; 3]>(count: u32, width: u32, height: u32, f: F) -> Self {
        let frames = (0..count)
            .map(|idx| Frame::filled(idx, width, height, f(idx)))
            .collect();

        Self { frames, pos: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl VideoCursor for MemoryVideo {
    fn advance(&mut self) -> Result<Option<Frame>, Error> {
        let frame = self.frames.get(self.pos as usize).cloned();
        if frame.is_some() {
            self.pos += 1;
        }

        Ok(frame)
    }

    fn seek(&mut self, index: u32) -> Result<(), Error> {
        self.pos = index;
        Ok(())
    }

    #[inline]
    fn position(&self) -> u32 {
        self.pos
    }
}

#[cfg(feature = "opencv")]
pub use self::capture::OpenCvVideo;

#[cfg(feature = "opencv")]
mod capture {
    use super::VideoCursor;
    use crate::error::Error;
    use crate::frame::Frame;

    use ndarray::Array3;
    use opencv::{core::Mat, prelude::*, videoio};

    /// Video file decoded through `opencv::videoio::VideoCapture`.
    pub struct OpenCvVideo {
        cap: videoio::VideoCapture,
        mat: Mat,
        pos: u32,
        total: u32,
    }

    impl OpenCvVideo {
        pub fn open(path: &str) -> Result<Self, Error> {
            let mut cap = videoio::VideoCapture::from_file(path, videoio::CAP_ANY)?;
            if !videoio::VideoCapture::is_opened(&cap)? {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("unable to open video {}", path),
                )));
            }

            let width = cap.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
            let height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
            let total = cap.get(videoio::CAP_PROP_FRAME_COUNT)? as u32;

            log::info!("video {} {}x{} {} frames", path, width, height, total);

            Ok(Self {
                cap,
                mat: Mat::default(),
                pos: 0,
                total,
            })
        }

        /// Frame count reported by the container; may be an estimate.
        #[inline]
        pub fn frame_count(&self) -> u32 {
            self.total
        }

        fn to_frame(&self) -> Result<Option<Frame>, Error> {
            let (cols, rows) = (self.mat.cols(), self.mat.rows());
            if cols <= 0 || rows <= 0 {
                return Ok(None);
            }

            let bytes = self.mat.data_bytes()?;
            let channels = bytes.len() / (cols as usize * rows as usize);
            let pixels = Array3::from_shape_vec(
                (rows as usize, cols as usize, channels),
                bytes.to_vec(),
            )?;

            Frame::new(self.pos, pixels).map(Some)
        }
    }

    impl VideoCursor for OpenCvVideo {
        fn advance(&mut self) -> Result<Option<Frame>, Error> {
            if !self.cap.read(&mut self.mat)? {
                return Ok(None);
            }

            let frame = self.to_frame()?;
            if frame.is_some() {
                self.pos += 1;
            }

            Ok(frame)
        }

        fn seek(&mut self, index: u32) -> Result<(), Error> {
            self.cap.set(videoio::CAP_PROP_POS_FRAMES, index as f64)?;
            self.pos = index;

            Ok(())
        }

        #[inline]
        fn position(&self) -> u32 {
            self.pos
        }
    }
}
