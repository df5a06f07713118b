//! Batch evaluation orchestrator.
//!
//! Discovers the dataset, runs the per-image pipeline (detect -> read ground
//! truth -> match) on a bounded worker pool, and aggregates the surviving
//! records into global metrics. Per-image failures are logged and dropped;
//! only infrastructure failures abort the run.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::annotations::read_ground_truth;
use crate::detector::Detector;
use crate::error::{DefectEvalError, Result};
use crate::matching::match_detections;
use crate::metrics::iou::{calculate_average_iou, calculate_pairwise_ious};
use crate::types::{DetectionRecord, EvaluationReport, GlobalMetrics};

/// Configuration for an evaluation run.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Directory holding paired image and annotation files.
    pub dataset_dir: PathBuf,
    /// Image file extension, matched case-insensitively.
    pub image_extension: String,
    /// Annotation file extension; annotation paths share the image's base name.
    pub annotation_extension: String,
    /// Minimum IoU for a prediction to claim a ground-truth box.
    pub iou_threshold: f64,
    /// Worker pool size; `None` uses the host's available parallelism.
    pub num_workers: Option<usize>,
}

impl EvaluatorConfig {
    /// Configuration with the conventional defaults: `jpg` images, `xml`
    /// annotations, IoU threshold 0.5, pool sized to the host.
    pub fn new(dataset_dir: impl Into<PathBuf>) -> Self {
        Self {
            dataset_dir: dataset_dir.into(),
            image_extension: "jpg".to_string(),
            annotation_extension: "xml".to_string(),
            iou_threshold: 0.5,
            num_workers: None,
        }
    }
}

/// List the image files in the dataset directory, sorted by path.
///
/// Only the top level of the directory is scanned; files are filtered by the
/// configured extension, case-insensitively.
///
/// # Errors
///
/// Returns [`DefectEvalError::DatasetScan`] if the directory cannot be
/// enumerated. This is fatal for the run.
pub fn discover_images(config: &EvaluatorConfig) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for entry in WalkDir::new(&config.dataset_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| DefectEvalError::DatasetScan(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let matches_ext = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&config.image_extension));
        if matches_ext {
            images.push(path);
        }
    }

    images.sort();
    Ok(images)
}

/// Derive the annotation path paired with an image: same base name, the
/// configured annotation extension.
pub fn annotation_path_for(image_path: &Path, annotation_extension: &str) -> PathBuf {
    image_path.with_extension(annotation_extension)
}

/// Run the full pipeline for one image and build its record.
///
/// Times the detector call (wall clock, milliseconds), reads the paired
/// annotation file, classifies TP/FP/FN at the configured threshold, and
/// collects the pairwise IoU scores. Any failure at any stage is returned
/// to the caller; nothing partial is produced.
pub fn evaluate_image<D: Detector + ?Sized>(
    detector: &D,
    image_path: &Path,
    config: &EvaluatorConfig,
) -> Result<DetectionRecord> {
    let start = Instant::now();
    let predictions = detector.detect(image_path)?;
    let processing_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    let annotation_path = annotation_path_for(image_path, &config.annotation_extension);
    let ground_truth = read_ground_truth(&annotation_path)?;

    let counts = match_detections(&ground_truth, &predictions, config.iou_threshold);
    let iou_scores = calculate_pairwise_ious(&ground_truth, &predictions);

    let image_name = image_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| image_path.display().to_string());

    Ok(DetectionRecord {
        image_name,
        ground_truth,
        predictions,
        processing_time_ms,
        iou_scores,
        counts,
    })
}

/// Evaluate every image in the dataset and aggregate global metrics.
///
/// Images are independent units of work on a bounded rayon pool sized to
/// `config.num_workers` (default: the host's available parallelism). The
/// call blocks until every unit completes; aggregation runs strictly after
/// that barrier, as a pure pass over the completed records.
///
/// A failing image is logged and contributes nothing to the report — the
/// batch never aborts for per-image errors. Pool construction failure and
/// dataset enumeration failure are fatal.
pub fn evaluate<D: Detector + ?Sized>(
    detector: &D,
    config: &EvaluatorConfig,
) -> Result<EvaluationReport> {
    let images = discover_images(config)?;
    info!(images = images.len(), dataset = %config.dataset_dir.display(), "starting evaluation");

    let num_workers = config.num_workers.unwrap_or_else(default_num_workers);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_workers)
        .build()
        .map_err(|e| DefectEvalError::ThreadPool(e.to_string()))?;

    // Each worker builds its record locally; nothing aggregate is written
    // until the whole batch has drained.
    let outcomes: Vec<Result<DetectionRecord>> = pool.install(|| {
        images
            .par_iter()
            .map(|image| evaluate_image(detector, image, config))
            .collect()
    });

    let mut records = Vec::with_capacity(outcomes.len());
    for (image, outcome) in images.iter().zip(outcomes) {
        match outcome {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(image = %image.display(), error = %e, "image dropped from evaluation");
            }
        }
    }

    let global = compute_global_metrics(&records);
    info!(
        evaluated = records.len(),
        total_tp = global.total_tp,
        total_fp = global.total_fp,
        total_fn = global.total_fn,
        "evaluation complete"
    );

    Ok(EvaluationReport { records, global })
}

/// Aggregate global metrics from completed per-image records.
///
/// Sums TP/FP/FN and detector time (converted from milliseconds to
/// seconds), and averages the concatenated IoU scores of all records.
pub fn compute_global_metrics(records: &[DetectionRecord]) -> GlobalMetrics {
    let mut global = GlobalMetrics::default();
    let mut all_ious = Vec::new();
    let mut total_time_ms = 0.0;

    for record in records {
        global.total_tp += record.counts.true_positives;
        global.total_fp += record.counts.false_positives;
        global.total_fn += record.counts.false_negatives;
        total_time_ms += record.processing_time_ms;
        all_ious.extend_from_slice(&record.iou_scores);
    }

    global.total_time_secs = total_time_ms / 1000.0;
    global.avg_iou = calculate_average_iou(&all_ious);
    global
}

fn default_num_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
