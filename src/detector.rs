//! External detector invocation and output parsing.
//!
//! The detector runs as a separate containerized process. It receives the
//! image and configuration locations through environment variables, reads
//! them from a mounted dataset directory, and prints zero or more
//! `(x,y,width,height)` tuples somewhere in its output. A `(0,0,0,0)` tuple
//! means "nothing detected".

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{DefectEvalError, Result};
use crate::types::BoundingBox;

static COORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+),(\d+),(\d+),(\d+)\)").expect("static pattern"));

/// Capability seam for the external detector.
///
/// The evaluator only depends on this trait, so orchestration and matching
/// can be exercised with a stub implementation instead of a real subprocess.
pub trait Detector: Sync {
    /// Run detection on one image, returning the predicted boxes.
    ///
    /// Blocking from the caller's perspective: implementations wait for the
    /// external process to exit and consume its full output.
    fn detect(&self, image: &Path) -> Result<Vec<BoundingBox>>;
}

/// Runs the detector as a Docker container over a mounted dataset directory.
///
/// Equivalent to:
///
/// ```text
/// docker run -e CONFIG=<config_path> -e IMAGE=<container_root>/<image name> \
///     -v <dataset dir>:<container_root> <docker image>
/// ```
#[derive(Debug, Clone)]
pub struct DockerDetector {
    docker_image: String,
    dataset_dir: PathBuf,
    container_root: String,
    config_path: String,
}

impl DockerDetector {
    /// Create a detector for the given Docker image and dataset directory,
    /// with the conventional `/App` mount point and `/App/config.json`
    /// configuration reference.
    pub fn new(docker_image: impl Into<String>, dataset_dir: impl Into<PathBuf>) -> Self {
        Self {
            docker_image: docker_image.into(),
            dataset_dir: dataset_dir.into(),
            container_root: "/App".to_string(),
            config_path: "/App/config.json".to_string(),
        }
    }

    /// Override the configuration path passed to the container.
    pub fn with_config_path(mut self, config_path: impl Into<String>) -> Self {
        self.config_path = config_path.into();
        self
    }

    /// Override the mount point inside the container.
    pub fn with_container_root(mut self, container_root: impl Into<String>) -> Self {
        self.container_root = container_root.into();
        self
    }
}

impl Detector for DockerDetector {
    fn detect(&self, image: &Path) -> Result<Vec<BoundingBox>> {
        let image_name = image
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DefectEvalError::DetectorSpawn {
                image: image.display().to_string(),
                message: "image path has no usable file name".to_string(),
            })?;

        let dataset_dir = self.dataset_dir.canonicalize()?;

        let output = Command::new("docker")
            .arg("run")
            .arg("-e")
            .arg(format!("CONFIG={}", self.config_path))
            .arg("-e")
            .arg(format!("IMAGE={}/{}", self.container_root, image_name))
            .arg("-v")
            .arg(format!("{}:{}", dataset_dir.display(), self.container_root))
            .arg(&self.docker_image)
            .output()
            .map_err(|e| DefectEvalError::DetectorSpawn {
                image: image_name.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(DefectEvalError::DetectorInvocation {
                image: image_name.to_string(),
                code: output.status.code().unwrap_or(-1),
            });
        }

        // Combined output blob: stdout first, then stderr.
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        let boxes = parse_detector_output(&combined);
        debug!(image = image_name, detections = boxes.len(), "detector finished");
        Ok(boxes)
    }
}

/// Extract predicted boxes from the detector's combined output text.
///
/// Every `(x,y,width,height)` tuple of four non-negative integers becomes a
/// box, in order of appearance. The `(0,0,0,0)` sentinel tuple ("nothing
/// detected") is filtered out. Text with no parseable tuples yields an
/// empty vector, not an error.
pub fn parse_detector_output(output: &str) -> Vec<BoundingBox> {
    COORD_PATTERN
        .captures_iter(output)
        .filter_map(|caps| {
            let x: u32 = caps[1].parse().ok()?;
            let y: u32 = caps[2].parse().ok()?;
            let width: u32 = caps[3].parse().ok()?;
            let height: u32 = caps[4].parse().ok()?;

            if x == 0 && y == 0 && width == 0 && height == 0 {
                return None; // No-detection sentinel
            }

            Some(BoundingBox::new(
                x as f64,
                y as f64,
                width as f64,
                height as f64,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tuples_in_order() {
        let output = "found (10,10,50,50) junk (0,0,0,0) (5,5,20,20)";
        let boxes = parse_detector_output(output);

        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0], BoundingBox::new(10.0, 10.0, 50.0, 50.0));
        assert_eq!(boxes[1], BoundingBox::new(5.0, 5.0, 20.0, 20.0));
    }

    #[test]
    fn test_sentinel_only_is_empty() {
        let boxes = parse_detector_output("no defects: (0,0,0,0)");
        assert!(boxes.is_empty());
    }

    #[test]
    fn test_no_tuples_is_empty() {
        assert!(parse_detector_output("nothing to see here").is_empty());
        assert!(parse_detector_output("").is_empty());
    }

    #[test]
    fn test_tuples_embedded_in_log_lines() {
        let output = "INFO loading model\nDetection: (3,4,5,6)\nDONE\n";
        let boxes = parse_detector_output(output);
        assert_eq!(boxes, vec![BoundingBox::new(3.0, 4.0, 5.0, 6.0)]);
    }

    #[test]
    fn test_spaced_tuple_is_not_matched() {
        // The protocol is exact: no whitespace inside the tuple.
        assert!(parse_detector_output("(10, 10, 50, 50)").is_empty());
    }

    #[test]
    fn test_negative_coordinates_not_matched() {
        assert!(parse_detector_output("(-1,2,3,4)").is_empty());
    }
}
