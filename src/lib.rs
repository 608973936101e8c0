//! Turns tracked object annotations of a fixed camera scene into inputs for
//! graph neural networks: per-object feature records sampled from the video,
//! and per-frame proximity graphs over the visible objects.

pub mod annotation;
pub mod bbox;
pub mod config;
pub mod error;
pub mod feature;
pub mod frame;
pub mod graph;
pub mod label;
pub mod pipeline;
pub mod sampler;
pub mod video;

pub use annotation::{read_annotations, Annotation, Annotations};
pub use bbox::BBox;
pub use config::Config;
pub use error::{Error, Result};
pub use feature::{FeatureRecord, FeatureWriter};
pub use frame::Frame;
pub use graph::{
    frame_graph, graphs_by_frame, FrameGraph, GraphBuilder, Node, NodeId, ProximityGraph,
};
pub use label::{label_int, Label};
pub use pipeline::FeatureExtractor;
pub use sampler::{ContextSampler, LocalContext};
pub use video::{MemoryVideo, VideoCursor};

#[cfg(feature = "opencv")]
pub use video::OpenCvVideo;
