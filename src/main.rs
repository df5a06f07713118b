//! Command-line entry point: evaluate a containerized detector over a
//! dataset directory and print per-image and global metrics.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use defect_eval::detector::DockerDetector;
use defect_eval::evaluator::{evaluate, EvaluatorConfig};
use defect_eval::metrics::calculate_average_iou;

#[derive(Parser, Debug)]
#[command(author, version, about = "Evaluate a Dockerized defect detector against VOC ground truth")]
struct Args {
    /// Directory containing paired image and annotation files
    #[arg(long, value_name = "DIR", default_value = "dataset")]
    dataset: PathBuf,

    /// Docker image that runs the detector
    #[arg(long, value_name = "IMAGE")]
    docker_image: String,

    /// Configuration path as seen from inside the container
    #[arg(long, value_name = "PATH", default_value = "/App/config.json")]
    config: String,

    /// IoU threshold for TP/FP classification (0.0 - 1.0)
    #[arg(long, default_value = "0.5", value_name = "THRESHOLD")]
    iou_threshold: f64,

    /// Worker pool size (defaults to available parallelism)
    #[arg(long, value_name = "COUNT")]
    workers: Option<usize>,

    /// Image file extension to evaluate
    #[arg(long, default_value = "jpg", value_name = "EXT")]
    image_ext: String,

    /// Annotation file extension paired with each image
    #[arg(long, default_value = "xml", value_name = "EXT")]
    annotation_ext: String,

    /// Write the full report as JSON to this file
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let detector =
        DockerDetector::new(&args.docker_image, &args.dataset).with_config_path(&args.config);

    let mut config = EvaluatorConfig::new(&args.dataset);
    config.image_extension = args.image_ext;
    config.annotation_extension = args.annotation_ext;
    config.iou_threshold = args.iou_threshold;
    config.num_workers = args.workers;

    let report = evaluate(&detector, &config)?;

    println!(
        "{:<30} {:>5} {:>5} {:>5} {:>12} {:>8}",
        "Image", "TP", "FP", "FN", "Time(ms)", "AvgIoU"
    );
    for record in &report.records {
        println!(
            "{:<30} {:>5} {:>5} {:>5} {:>12.2} {:>8.2}",
            record.image_name,
            record.counts.true_positives,
            record.counts.false_positives,
            record.counts.false_negatives,
            record.processing_time_ms,
            calculate_average_iou(&record.iou_scores),
        );
    }

    println!();
    println!("Global metrics");
    println!("  Total TP:       {}", report.global.total_tp);
    println!("  Total FP:       {}", report.global.total_fp);
    println!("  Total FN:       {}", report.global.total_fn);
    println!("  Total time (s): {:.2}", report.global.total_time_secs);
    println!("  Average IoU:    {:.2}", report.global.avg_iou);

    if let Some(path) = &args.output {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!();
        println!("Report written to {}", path.display());
    }

    Ok(())
}
