use crate::annotation::Annotation;
use crate::error::Error;
use crate::label::Label;

use nalgebra as na;
use serde_derive::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Write;

/// Slot of a node in its graph. Two nodes at the same position are still
/// distinct slots.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub track_id: u32,
    pub position: na::Point2<f32>,
    pub label: Label,
}

impl Node {
    pub fn new(track_id: u32, position: na::Point2<f32>, label: Label) -> Self {
        Self {
            track_id,
            position,
            label,
        }
    }

    #[inline]
    pub fn distance(&self, other: &Node) -> f32 {
        na::distance(&self.position, &other.position)
    }
}

impl<'a> From<&'a Annotation> for Node {
    fn from(ann: &'a Annotation) -> Self {
        Node::new(ann.track_id, ann.bbox.center(), ann.label)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphState {
    Empty,
    Building,
}

/// Uniform grid over node positions with cells as wide as the threshold, so
/// every node closer than the threshold sits in the 3x3 block around a cell.
#[derive(Debug, Clone)]
struct SpatialGrid {
    cell: f32,
    buckets: HashMap<(i64, i64), Vec<usize>>,
}

impl SpatialGrid {
    fn new(cell: f32) -> Self {
        Self {
            cell,
            buckets: HashMap::new(),
        }
    }

    #[inline]
    fn key(&self, p: &na::Point2<f32>) -> (i64, i64) {
        (
            (p.x / self.cell).floor() as i64,
            (p.y / self.cell).floor() as i64,
        )
    }

    fn insert(&mut self, p: &na::Point2<f32>, slot: usize) {
        let key = self.key(p);
        self.buckets.entry(key).or_default().push(slot);
    }

    /// Slots in the 3x3 neighbourhood of `p`, ascending.
    fn candidates(&self, p: &na::Point2<f32>) -> Vec<usize> {
        let (cx, cy) = self.key(p);
        let mut slots = Vec::new();

        for x in cx - 1..=cx + 1 {
            for y in cy - 1..=cy + 1 {
                if let Some(bucket) = self.buckets.get(&(x, y)) {
                    slots.extend_from_slice(bucket);
                }
            }
        }

        slots.sort_unstable();
        slots
    }
}

/// Undirected graph over the objects of one frame. Two nodes are adjacent
/// iff their centers are strictly closer than `threshold`.
///
/// Edges are formed as nodes are added, each new node is compared with all
/// nodes already present, so building `n` nodes costs O(n²). A graph built
/// with [`ProximityGraph::with_spatial_index`] only compares nodes in
/// neighbouring grid cells and produces the same edges in the same order.
#[derive(Serialize, Debug, Clone)]
pub struct ProximityGraph {
    threshold: f32,
    nodes: Vec<Node>,
    edges: Vec<(NodeId, NodeId)>,
    #[serde(skip)]
    grid: Option<SpatialGrid>,
}

impl ProximityGraph {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            nodes: Vec::new(),
            edges: Vec::new(),
            grid: None,
        }
    }

    /// Falls back to the plain builder for thresholds that cannot size a
    /// grid cell (non-finite or not positive).
    pub fn with_spatial_index(threshold: f32) -> Self {
        let grid = if threshold.is_finite() && threshold > 0.0 {
            Some(SpatialGrid::new(threshold))
        } else {
            None
        };

        Self {
            grid,
            ..Self::new(threshold)
        }
    }

    #[inline]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());

        match &mut self.grid {
            Some(grid) => {
                for slot in grid.candidates(&node.position) {
                    if node.distance(&self.nodes[slot]) < self.threshold {
                        self.edges.push((NodeId(slot), id));
                    }
                }

                grid.insert(&node.position, id.0);
            }
            None => {
                for (slot, other) in self.nodes.iter().enumerate() {
                    if node.distance(other) < self.threshold {
                        self.edges.push((NodeId(slot), id));
                    }
                }
            }
        }

        self.nodes.push(node);

        id
    }

    #[inline]
    pub fn state(&self) -> GraphState {
        if self.nodes.is_empty() {
            GraphState::Empty
        } else {
            GraphState::Building
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Edges in insertion order, each as `(earlier node, later node)`.
    #[inline]
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    /// Edges with each pair ordered, independent of insertion order.
    pub fn edge_set(&self) -> BTreeSet<(NodeId, NodeId)> {
        self.edges
            .iter()
            .map(|&(a, b)| if a <= b { (a, b) } else { (b, a) })
            .collect()
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edges
            .iter()
            .any(|&(x, y)| (x, y) == (a, b) || (x, y) == (b, a))
    }

    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.iter().filter_map(move |&(a, b)| {
            if a == id {
                Some(b)
            } else if b == id {
                Some(a)
            } else {
                None
            }
        })
    }
}

/// How per-frame graphs are constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphBuilder {
    pub threshold: f32,
    pub spatial_index: bool,
}

impl GraphBuilder {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            spatial_index: false,
        }
    }

    pub fn with_spatial_index(mut self, enabled: bool) -> Self {
        self.spatial_index = enabled;
        self
    }

    pub fn empty(&self) -> ProximityGraph {
        if self.spatial_index {
            ProximityGraph::with_spatial_index(self.threshold)
        } else {
            ProximityGraph::new(self.threshold)
        }
    }
}

/// An annotation takes part in the graph of its frame unless it is lost.
#[inline]
pub fn is_visible_in(ann: &Annotation, frame: u32) -> bool {
    ann.frame == frame && !ann.lost
}

/// Graph of the objects visible in `frame`.
pub fn frame_graph<'a, I>(annotations: I, frame: u32, builder: &GraphBuilder) -> ProximityGraph
where
    I: IntoIterator<Item = &'a Annotation>,
{
    let mut graph = builder.empty();

    for ann in annotations {
        if is_visible_in(ann, frame) {
            graph.add_node(Node::from(ann));
        }
    }

    graph
}

/// Graphs of every frame that occurs in `annotations`, built in a single
/// pass. Frames whose objects are all lost get an empty graph.
pub fn graphs_by_frame<'a, I>(
    annotations: I,
    builder: &GraphBuilder,
) -> BTreeMap<u32, ProximityGraph>
where
    I: IntoIterator<Item = &'a Annotation>,
{
    let mut graphs = BTreeMap::new();

    for ann in annotations {
        let graph = graphs.entry(ann.frame).or_insert_with(|| builder.empty());

        if !ann.lost {
            graph.add_node(Node::from(ann));
        }
    }

    log::debug!("built graphs for {} frames", graphs.len());

    graphs
}

/// A graph tagged with its frame index, serialized as one flat object.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct FrameGraph<'a> {
    pub frame: u32,
    #[serde(flatten)]
    pub graph: &'a ProximityGraph,
}

impl<'a> FrameGraph<'a> {
    pub fn new(frame: u32, graph: &'a ProximityGraph) -> Self {
        Self { frame, graph }
    }

    /// Writes the graph as a single JSON line.
    pub fn write_json_line<W: Write>(&self, out: &mut W) -> Result<(), Error> {
        serde_json::to_writer(&mut *out, self)?;
        writeln!(out)?;

        Ok(())
    }
}
