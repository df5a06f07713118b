//! Core data types for bounding boxes and evaluation results.

use serde::{Deserialize, Serialize};

/// Represents an axis-aligned bounding box in (x, y, width, height) format.
///
/// Coordinates are in LTWH (Left-Top-Width-Height) format where:
/// - x: Left coordinate (origin top-left, pixel units)
/// - y: Top coordinate
/// - width: Box width
/// - height: Box height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Create a bounding box from corner coordinates (xmin, ymin, xmax, ymax),
    /// the form used by VOC-style annotation records.
    pub fn from_corners(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            x: xmin,
            y: ymin,
            width: xmax - xmin,
            height: ymax - ymin,
        }
    }

    /// Get the area of the bounding box.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Get the right coordinate (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom coordinate (y + height).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the bounding box is valid (positive dimensions).
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// TP/FP/FN counts produced by matching predictions against ground truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionCounts {
    /// Predictions matched to a ground-truth box.
    pub true_positives: usize,
    /// Predictions with no matching ground-truth box.
    pub false_positives: usize,
    /// Ground-truth boxes no prediction claimed.
    pub false_negatives: usize,
}

/// Evaluation result for a single image.
///
/// Built once by the evaluator after detection, annotation parsing, and
/// matching complete; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// File name of the evaluated image.
    pub image_name: String,
    /// Ground-truth boxes from the annotation file.
    pub ground_truth: Vec<BoundingBox>,
    /// Boxes reported by the detector.
    pub predictions: Vec<BoundingBox>,
    /// Wall-clock duration of the detector call, in milliseconds.
    pub processing_time_ms: f64,
    /// IoU of every (ground-truth, prediction) pair, outer loop ground truth.
    pub iou_scores: Vec<f64>,
    /// TP/FP/FN classification at the configured IoU threshold.
    pub counts: DetectionCounts,
}

/// Aggregate metrics over a full evaluation run.
///
/// Derived in a single pass over the completed [`DetectionRecord`]s, never
/// maintained incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalMetrics {
    pub total_tp: usize,
    pub total_fp: usize,
    pub total_fn: usize,
    /// Summed detector time across all successful images, in seconds.
    pub total_time_secs: f64,
    /// Mean of all pairwise IoU scores across all records.
    pub avg_iou: f64,
}

/// The complete result set handed to reporting collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Per-image results, successful images only.
    pub records: Vec<DetectionRecord>,
    /// Metrics aggregated over `records`.
    pub global: GlobalMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners() {
        let bbox = BoundingBox::from_corners(10.0, 20.0, 60.0, 50.0);
        assert_eq!(bbox.x, 10.0);
        assert_eq!(bbox.y, 20.0);
        assert_eq!(bbox.width, 50.0);
        assert_eq!(bbox.height, 30.0);
    }

    #[test]
    fn test_area_and_edges() {
        let bbox = BoundingBox::new(5.0, 5.0, 10.0, 4.0);
        assert_eq!(bbox.area(), 40.0);
        assert_eq!(bbox.right(), 15.0);
        assert_eq!(bbox.bottom(), 9.0);
        assert!(bbox.is_valid());
    }

    #[test]
    fn test_degenerate_box_is_invalid() {
        let bbox = BoundingBox::new(0.0, 0.0, 0.0, 0.0);
        assert!(!bbox.is_valid());
        assert_eq!(bbox.area(), 0.0);
    }
}
