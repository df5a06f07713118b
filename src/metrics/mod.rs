//! Metrics calculation modules for detector evaluation.

pub mod iou;

pub use iou::{calculate_average_iou, calculate_iou, calculate_pairwise_ious};
