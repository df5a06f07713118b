//! Ground-truth loading from VOC-style XML annotation files.
//!
//! An annotation document holds zero or more `<object>` entries, each with a
//! `<bndbox>` giving integer corner coordinates:
//!
//! ```xml
//! <annotation>
//!     <filename>plate_01.jpg</filename>
//!     <object>
//!         <name>defect</name>
//!         <bndbox>
//!             <xmin>10</xmin>
//!             <ymin>10</ymin>
//!             <xmax>60</xmax>
//!             <ymax>60</ymax>
//!         </bndbox>
//!     </object>
//! </annotation>
//! ```
//!
//! Unknown elements are ignored, so full VOC documents (with `size`, `pose`,
//! `truncated`, ...) parse cleanly.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DefectEvalError, Result};
use crate::types::BoundingBox;

#[derive(Debug, Deserialize)]
struct VocAnnotation {
    #[serde(default, rename = "object")]
    objects: Vec<VocObject>,
}

#[derive(Debug, Deserialize)]
struct VocObject {
    bndbox: VocBndBox,
}

#[derive(Debug, Deserialize)]
struct VocBndBox {
    xmin: i64,
    ymin: i64,
    xmax: i64,
    ymax: i64,
}

/// Load ground-truth boxes from an annotation file.
///
/// Each `<bndbox>` record becomes a [`BoundingBox`] with
/// `width = xmax - xmin` and `height = ymax - ymin`.
///
/// # Errors
///
/// Returns [`DefectEvalError::AnnotationParse`] if the file is missing,
/// unreadable, malformed, or contains a box with inverted corners. These are
/// per-image failures; the evaluator drops the image and continues.
pub fn read_ground_truth<P: AsRef<Path>>(path: P) -> Result<Vec<BoundingBox>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        DefectEvalError::AnnotationParse(format!("{}: {}", path.display(), e))
    })?;

    parse_ground_truth(&text)
        .map_err(|e| DefectEvalError::AnnotationParse(format!("{}: {}", path.display(), e)))
}

/// Parse ground-truth boxes from an annotation document string.
///
/// Exposed separately from [`read_ground_truth`] so parsing can be tested
/// without touching the filesystem.
pub fn parse_ground_truth(xml: &str) -> Result<Vec<BoundingBox>> {
    let annotation: VocAnnotation = quick_xml::de::from_str(xml)
        .map_err(|e| DefectEvalError::AnnotationParse(e.to_string()))?;

    let mut boxes = Vec::with_capacity(annotation.objects.len());
    for object in &annotation.objects {
        let b = &object.bndbox;
        if b.xmax < b.xmin || b.ymax < b.ymin {
            return Err(DefectEvalError::AnnotationParse(format!(
                "bndbox has inverted corners: xmin={} ymin={} xmax={} ymax={}",
                b.xmin, b.ymin, b.xmax, b.ymax
            )));
        }
        boxes.push(BoundingBox::from_corners(
            b.xmin as f64,
            b.ymin as f64,
            b.xmax as f64,
            b.ymax as f64,
        ));
    }

    Ok(boxes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_object() {
        let xml = r#"
            <annotation>
                <object>
                    <name>defect</name>
                    <bndbox>
                        <xmin>10</xmin>
                        <ymin>20</ymin>
                        <xmax>60</xmax>
                        <ymax>50</ymax>
                    </bndbox>
                </object>
            </annotation>
        "#;

        let boxes = parse_ground_truth(xml).unwrap();
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0], BoundingBox::new(10.0, 20.0, 50.0, 30.0));
    }

    #[test]
    fn test_parse_no_objects() {
        let xml = "<annotation><filename>empty.jpg</filename></annotation>";
        let boxes = parse_ground_truth(xml).unwrap();
        assert!(boxes.is_empty());
    }

    #[test]
    fn test_missing_coordinate_is_error() {
        let xml = r#"
            <annotation>
                <object>
                    <bndbox>
                        <xmin>10</xmin>
                        <ymin>20</ymin>
                        <xmax>60</xmax>
                    </bndbox>
                </object>
            </annotation>
        "#;

        assert!(parse_ground_truth(xml).is_err());
    }

    #[test]
    fn test_inverted_corners_is_error() {
        let xml = r#"
            <annotation>
                <object>
                    <bndbox>
                        <xmin>60</xmin>
                        <ymin>20</ymin>
                        <xmax>10</xmax>
                        <ymax>50</ymax>
                    </bndbox>
                </object>
            </annotation>
        "#;

        let err = parse_ground_truth(xml).unwrap_err();
        assert!(matches!(err, DefectEvalError::AnnotationParse(_)));
    }

    #[test]
    fn test_missing_file_is_annotation_error() {
        let err = read_ground_truth("/nonexistent/annotation.xml").unwrap_err();
        assert!(matches!(err, DefectEvalError::AnnotationParse(_)));
    }
}
