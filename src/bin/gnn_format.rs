use clap::Parser;
use sdd_graph::{Annotations, Config, FeatureExtractor, FeatureWriter, OpenCvVideo};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

/// Writes per-node attribute records for a scene directory containing
/// `annotations.txt` and `video.mov`.
#[derive(Parser, Debug)]
#[command(name = "gnn_format")]
struct Args {
    input_dir: PathBuf,
    output_dir: PathBuf,
    /// Output is written to `<output_dir>/<name>.attributes`.
    name: String,
    #[arg(long, default_value_t = sdd_graph::sampler::DEFAULT_MARGIN)]
    margin: u32,
}

fn main() -> Result<(), sdd_graph::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::new(args.input_dir.join("annotations.txt"))
        .with_video(args.input_dir.join("video.mov"))
        .with_margin(args.margin);
    config.validate()?;

    let video_path = config.video.clone().unwrap_or_default();
    let video = OpenCvVideo::open(&video_path.to_string_lossy())?;
    let mut extractor = FeatureExtractor::new(video, config.sampler());

    let out_path = args.output_dir.join(format!("{}.attributes", args.name));
    let mut writer = FeatureWriter::new(BufWriter::new(File::create(&out_path)?))?;

    let annotations = Annotations::new(BufReader::new(File::open(&config.annotations)?));
    for ann in annotations {
        let record = extractor.extract(&ann?)?;
        writer.write(&record)?;
    }

    log::info!(
        "wrote {} records over {} tracks to {}",
        writer.rows(),
        extractor.seeks(),
        out_path.display()
    );
    writer.finish()?;

    Ok(())
}
