use clap::Parser;
use sdd_graph::{frame_graph, graphs_by_frame, Config, FrameGraph};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Builds proximity graphs from an annotation file and prints one JSON
/// object per frame.
#[derive(Parser, Debug)]
#[command(name = "proximity_graph")]
struct Args {
    annotations: PathBuf,
    /// Nodes closer than this (in pixels) are connected.
    #[arg(long)]
    threshold: f32,
    /// Only build the graph of this frame.
    #[arg(long)]
    frame: Option<u32>,
    /// Bucket nodes on a grid instead of comparing every pair.
    #[arg(long)]
    spatial_index: bool,
    /// Write to a file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), sdd_graph::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::new(&args.annotations)
        .with_threshold(args.threshold)
        .with_spatial_index(args.spatial_index);
    config.validate()?;

    let annotations = config.load_annotations()?;
    let builder = config.graph_builder()?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    match args.frame {
        Some(frame) => {
            let graph = frame_graph(&annotations, frame, &builder);
            log::info!(
                "frame {}: {} nodes, {} edges",
                frame,
                graph.len(),
                graph.edges().len()
            );
            FrameGraph::new(frame, &graph).write_json_line(&mut out)?;
        }
        None => {
            let graphs = graphs_by_frame(&annotations, &builder);
            let edges: usize = graphs.values().map(|g| g.edges().len()).sum();
            log::info!("{} frames, {} edges", graphs.len(), edges);

            for (frame, graph) in &graphs {
                FrameGraph::new(*frame, graph).write_json_line(&mut out)?;
            }
        }
    }

    out.flush()?;

    Ok(())
}
