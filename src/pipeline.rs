use crate::annotation::Annotation;
use crate::error::{Error, Result};
use crate::feature::FeatureRecord;
use crate::frame::Frame;
use crate::sampler::ContextSampler;
use crate::video::VideoCursor;

/// Turns annotation lines into feature records, pulling the matching image
/// for every line from a video cursor.
///
/// Input is expected grouped by track: all lines of one track form a
/// contiguous block with non-decreasing frames. The cursor is repositioned
/// once at the start of each block and read sequentially inside it.
pub struct FeatureExtractor<C> {
    cursor: C,
    sampler: ContextSampler,
    current_track: Option<u32>,
    frame: Option<Frame>,
    seeks: usize,
}

impl<C: VideoCursor> FeatureExtractor<C> {
    pub fn new(cursor: C, sampler: ContextSampler) -> Self {
        Self {
            cursor,
            sampler,
            current_track: None,
            frame: None,
            seeks: 0,
        }
    }

    /// Number of track-boundary repositionings so far.
    #[inline]
    pub fn seeks(&self) -> usize {
        self.seeks
    }

    #[inline]
    pub fn into_cursor(self) -> C {
        self.cursor
    }

    fn sync(&mut self, ann: &Annotation) -> Result<()> {
        if self.current_track != Some(ann.track_id) {
            log::debug!("track {} starts at frame {}", ann.track_id, ann.frame);

            self.cursor.seek(ann.frame)?;
            self.current_track = Some(ann.track_id);
            self.frame = None;
            self.seeks += 1;
        }

        match &self.frame {
            Some(frame) if frame.index() == ann.frame => return Ok(()),
            Some(frame) if frame.index() > ann.frame => log::warn!(
                "track {}: frame {} requested after frame {}, using the next frame",
                ann.track_id,
                ann.frame,
                frame.index()
            ),
            _ => (),
        }

        loop {
            let frame = self.cursor.advance()?.ok_or(Error::StreamExhausted {
                track_id: ann.track_id,
                frame: ann.frame,
            })?;

            let index = frame.index();
            self.frame = Some(frame);

            if index >= ann.frame {
                return Ok(());
            }

            log::debug!(
                "track {}: skipping frame {} on the way to {}",
                ann.track_id,
                index,
                ann.frame
            );
        }
    }

    /// Feature record for a single annotation line.
    pub fn extract(&mut self, ann: &Annotation) -> Result<FeatureRecord> {
        self.sync(ann)?;

        let frame = self.frame.as_ref().ok_or(Error::StreamExhausted {
            track_id: ann.track_id,
            frame: ann.frame,
        })?;

        let (width, height) = ann.bbox.dimensions();

        Ok(FeatureRecord {
            frame: ann.frame,
            node_id: ann.track_id,
            position: ann.bbox.center(),
            width,
            height,
            kind: ann.label.code(),
            context: self.sampler.sample(frame, &ann.bbox),
        })
    }

    /// One record per annotation, in input order. Stops at the first error.
    pub fn run<'a, I>(&mut self, annotations: I) -> Result<Vec<FeatureRecord>>
    where
        I: IntoIterator<Item = &'a Annotation>,
    {
        let records = annotations
            .into_iter()
            .map(|ann| self.extract(ann))
            .collect::<Result<Vec<_>>>()?;

        log::info!(
            "extracted {} feature records over {} tracks",
            records.len(),
            self.seeks
        );

        Ok(records)
    }
}
