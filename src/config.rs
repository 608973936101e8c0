use crate::annotation::{read_annotations, Annotation};
use crate::error::Error;
use crate::graph::GraphBuilder;
use crate::sampler::{ContextSampler, DEFAULT_MARGIN};

use serde_derive::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Inputs and tuning of one run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub annotations: PathBuf,
    #[serde(default)]
    pub video: Option<PathBuf>,
    /// Proximity threshold, in the coordinate units of the annotations.
    /// Only graph runs need one.
    #[serde(default)]
    pub threshold: Option<f32>,
    #[serde(default = "default_margin")]
    pub margin: u32,
    #[serde(default)]
    pub spatial_index: bool,
}

fn default_margin() -> u32 {
    DEFAULT_MARGIN
}

impl Config {
    pub fn new<P: Into<PathBuf>>(annotations: P) -> Self {
        Self {
            annotations: annotations.into(),
            video: None,
            threshold: None,
            margin: DEFAULT_MARGIN,
            spatial_index: false,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_video<P: Into<PathBuf>>(mut self, video: P) -> Self {
        self.video = Some(video.into());
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_spatial_index(mut self, enabled: bool) -> Self {
        self.spatial_index = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        match self.threshold {
            Some(t) if !t.is_finite() || t < 0.0 => Err(Error::Config(format!(
                "threshold must be a finite non-negative number, got {}",
                t
            ))),
            _ => Ok(()),
        }
    }

    #[inline]
    pub fn sampler(&self) -> ContextSampler {
        ContextSampler::new(self.margin)
    }

    pub fn graph_builder(&self) -> Result<GraphBuilder, Error> {
        let threshold = self
            .threshold
            .ok_or_else(|| Error::Config("graph construction needs a threshold".to_string()))?;

        Ok(GraphBuilder::new(threshold).with_spatial_index(self.spatial_index))
    }

    pub fn load_annotations(&self) -> Result<Vec<Annotation>, Error> {
        let file = File::open(&self.annotations)?;
        let annotations = read_annotations(BufReader::new(file))?;

        log::info!(
            "loaded {} annotations from {}",
            annotations.len(),
            self.annotations.display()
        );

        Ok(annotations)
    }
}
