//! Intersection over Union (IoU) calculation.

use crate::types::BoundingBox;

/// Calculate the Intersection over Union (IoU) between two bounding boxes.
///
/// IoU is defined as the area of intersection divided by the area of union.
///
/// # Arguments
///
/// * `bbox1` - First bounding box
/// * `bbox2` - Second bounding box
///
/// # Returns
///
/// Returns a value between 0.0 (no overlap) and 1.0 (perfect overlap).
/// Zero-area boxes are permitted; when the union is zero the result is 0.0.
///
/// # Example
///
/// ```
/// use defect_eval::metrics::iou::calculate_iou;
/// use defect_eval::types::BoundingBox;
///
/// let bbox1 = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
/// let bbox2 = BoundingBox::new(5.0, 5.0, 10.0, 10.0);
/// let iou = calculate_iou(&bbox1, &bbox2);
/// assert!(iou > 0.0 && iou < 1.0);
/// ```
pub fn calculate_iou(bbox1: &BoundingBox, bbox2: &BoundingBox) -> f64 {
    // Calculate intersection coordinates
    let x_left = bbox1.x.max(bbox2.x);
    let y_top = bbox1.y.max(bbox2.y);
    let x_right = bbox1.right().min(bbox2.right());
    let y_bottom = bbox1.bottom().min(bbox2.bottom());

    // If there's no intersection
    if x_right < x_left || y_bottom < y_top {
        return 0.0;
    }

    // Calculate intersection area
    let intersection_area = (x_right - x_left) * (y_bottom - y_top);

    // Calculate union area
    let bbox1_area = bbox1.area();
    let bbox2_area = bbox2.area();
    let union_area = bbox1_area + bbox2_area - intersection_area;

    // Avoid division by zero
    if union_area == 0.0 {
        return 0.0;
    }

    intersection_area / union_area
}

/// Calculate the IoU of every (ground-truth, prediction) pair.
///
/// The outer loop runs over ground truth and the inner loop over
/// predictions, so the result has `ground_truth.len() * predictions.len()`
/// entries in that nested order. Used for distributional reporting,
/// independently of TP/FP/FN matching.
pub fn calculate_pairwise_ious(
    ground_truth: &[BoundingBox],
    predictions: &[BoundingBox],
) -> Vec<f64> {
    let mut ious = Vec::with_capacity(ground_truth.len() * predictions.len());
    for gt in ground_truth {
        for pred in predictions {
            ious.push(calculate_iou(gt, pred));
        }
    }
    ious
}

/// Arithmetic mean of a slice of IoU scores.
///
/// Returns 0.0 for an empty slice.
pub fn calculate_average_iou(ious: &[f64]) -> f64 {
    if ious.is_empty() {
        return 0.0;
    }
    ious.iter().sum::<f64>() / ious.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_boxes() {
        let bbox1 = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let bbox2 = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let iou = calculate_iou(&bbox1, &bbox2);
        assert!((iou - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_no_overlap_is_exactly_zero() {
        let bbox1 = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let bbox2 = BoundingBox::new(20.0, 20.0, 10.0, 10.0);
        let iou = calculate_iou(&bbox1, &bbox2);
        assert_eq!(iou, 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let bbox1 = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let bbox2 = BoundingBox::new(5.0, 5.0, 10.0, 10.0);
        let iou = calculate_iou(&bbox1, &bbox2);

        // Intersection: 5x5 = 25
        // Union: 100 + 100 - 25 = 175
        // IoU: 25/175 ≈ 0.1429
        assert!((iou - 0.142857).abs() < 1e-5);
    }

    #[test]
    fn test_touching_edges() {
        // Boxes share an edge: zero-width intersection, IoU 0.0.
        let bbox1 = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let bbox2 = BoundingBox::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(calculate_iou(&bbox1, &bbox2), 0.0);
    }

    #[test]
    fn test_degenerate_boxes_do_not_panic() {
        let zero = BoundingBox::new(5.0, 5.0, 0.0, 0.0);
        assert_eq!(calculate_iou(&zero, &zero), 0.0);

        let real = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(calculate_iou(&zero, &real), 0.0);
    }

    #[test]
    fn test_pairwise_order() {
        let ground_truth = vec![
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            BoundingBox::new(100.0, 100.0, 10.0, 10.0),
        ];
        let predictions = vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)];

        let ious = calculate_pairwise_ious(&ground_truth, &predictions);
        assert_eq!(ious.len(), 2);
        assert!((ious[0] - 1.0).abs() < 1e-10);
        assert_eq!(ious[1], 0.0);
    }

    #[test]
    fn test_average_empty_is_zero() {
        assert_eq!(calculate_average_iou(&[]), 0.0);
    }

    #[test]
    fn test_average_single() {
        assert_eq!(calculate_average_iou(&[1.0]), 1.0);
    }

    #[test]
    fn test_average_mean() {
        let avg = calculate_average_iou(&[0.0, 0.5, 1.0]);
        assert!((avg - 0.5).abs() < 1e-10);
    }
}
