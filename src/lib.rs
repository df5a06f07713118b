//! # defect-eval
//!
//! A Rust library for evaluating an external object-detection process
//! against ground-truth annotations across a batch of images.
//!
//! The pipeline per image is: invoke the detector (a containerized external
//! process), parse its textual output into predicted boxes, read the paired
//! VOC-style XML annotation into ground-truth boxes, then classify TP/FP/FN
//! with greedy IoU matching. Images are processed in parallel on a bounded
//! worker pool and aggregated into global metrics after the batch drains.
//!
//! ## Features
//!
//! - Calculate IoU (Intersection over Union) between bounding boxes
//! - Greedy, order-deterministic TP/FP/FN matching at a configurable threshold
//! - Parse VOC-style XML ground-truth annotations
//! - Invoke a Dockerized detector and parse its `(x,y,w,h)` output protocol
//! - Parallel per-image orchestration with per-image failure isolation
//! - Aggregate per-image records into global metrics
//!
//! ## Quick Start
//!
//! ```no_run
//! use defect_eval::detector::DockerDetector;
//! use defect_eval::evaluator::{evaluate, EvaluatorConfig};
//!
//! # fn main() -> defect_eval::Result<()> {
//! let detector = DockerDetector::new("metalgroup/defect-detector:1.0", "dataset");
//! let config = EvaluatorConfig::new("dataset");
//!
//! let report = evaluate(&detector, &config)?;
//! println!("TP={} FP={} FN={}", report.global.total_tp, report.global.total_fp, report.global.total_fn);
//! println!("Average IoU: {:.4}", report.global.avg_iou);
//! # Ok(())
//! # }
//! ```
//!
//! ## Detector protocol
//!
//! The external process receives the image and configuration locations as
//! environment variables, reads them from a mounted directory, and must
//! print zero or more `(x,y,width,height)` integer tuples somewhere in its
//! output. `(0,0,0,0)` means "nothing detected". A nonzero exit status is a
//! per-image failure and drops the image from the batch.

pub mod annotations;
pub mod detector;
pub mod error;
pub mod evaluator;
pub mod matching;
pub mod metrics;
pub mod types;

// Re-export commonly used types and functions
pub use annotations::{parse_ground_truth, read_ground_truth};
pub use detector::{parse_detector_output, Detector, DockerDetector};
pub use error::{DefectEvalError, Result};
pub use evaluator::{
    compute_global_metrics, discover_images, evaluate, evaluate_image, EvaluatorConfig,
};
pub use matching::match_detections;
pub use metrics::{calculate_average_iou, calculate_iou, calculate_pairwise_ious};
pub use types::{
    BoundingBox, DetectionCounts, DetectionRecord, EvaluationReport, GlobalMetrics,
};
