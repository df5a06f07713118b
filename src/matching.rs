//! Greedy matching of predictions against ground truth.

use std::collections::HashSet;

use crate::metrics::iou::calculate_iou;
use crate::types::{BoundingBox, DetectionCounts};

/// Classify predictions as TP/FP and ground truth as FN using greedy
/// first-fit matching.
///
/// Predictions are visited in input order; each claims the FIRST unmatched
/// ground-truth box (again in input order) whose IoU reaches
/// `iou_threshold`. A claimed ground-truth box is never matched again.
/// Predictions that claim nothing count as false positives; ground-truth
/// boxes left unclaimed count as false negatives.
///
/// The policy is deliberately order-dependent and not an optimal bipartite
/// assignment; it must stay first-eligible-by-order so that reported counts
/// are reproducible across runs and implementations.
///
/// Guarantees for any input:
/// - `true_positives + false_negatives == ground_truth.len()`
/// - `true_positives + false_positives == predictions.len()`
pub fn match_detections(
    ground_truth: &[BoundingBox],
    predictions: &[BoundingBox],
    iou_threshold: f64,
) -> DetectionCounts {
    let mut matched_gt: HashSet<usize> = HashSet::new();
    let mut counts = DetectionCounts::default();

    for pred in predictions {
        let mut matched = false;
        for (gt_idx, gt) in ground_truth.iter().enumerate() {
            if matched_gt.contains(&gt_idx) {
                continue; // Already claimed
            }
            if calculate_iou(pred, gt) >= iou_threshold {
                matched_gt.insert(gt_idx);
                counts.true_positives += 1;
                matched = true;
                break;
            }
        }
        if !matched {
            counts.false_positives += 1;
        }
    }

    counts.false_negatives = ground_truth.len() - matched_gt.len();
    counts
}
