//! Detections handed to an overlay renderer.
//!
//! Bounding boxes arrive in the resolution of the video they were detected
//! in and are rescaled onto the fixed 960x720 overlay canvas.

use serde::{Deserialize, Serialize};

pub const OVERLAY_RESOLUTION: Resolution = Resolution {
    width: 960,
    height: 720,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// `[x, y, width, height]`
    pub bounding_box: [f32; 4],
    pub class_name: String,
    pub score: f32,
}

/// A detection placed on the overlay canvas, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBox {
    pub bounding_box: [f32; 4],
    pub label: String,
}

impl Detection {
    pub fn label(&self) -> String {
        format!("{} ({} %)", self.class_name, (self.score * 100.0).round())
    }

    /// Maps a box reported at `source` resolution onto the overlay canvas.
    pub fn to_overlay(&self, source: Resolution) -> OverlayBox {
        let width_ratio = source.width.max(1) as f32 / OVERLAY_RESOLUTION.width as f32;
        let height_ratio = source.height.max(1) as f32 / OVERLAY_RESOLUTION.height as f32;
        let [x, y, w, h] = self.bounding_box;

        OverlayBox {
            bounding_box: [x / width_ratio, y / height_ratio, w / width_ratio, h / height_ratio],
            label: self.label(),
        }
    }
}

pub fn layout_overlay(detections: &[Detection], source: Resolution) -> Vec<OverlayBox> {
    detections.iter().map(|d| d.to_overlay(source)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(score: f32) -> Detection {
        Detection {
            bounding_box: [96.0, 72.0, 480.0, 360.0],
            class_name: "dog".to_string(),
            score,
        }
    }

    #[test]
    fn test_reference_resolution_is_identity() {
        let overlay = detection(0.5).to_overlay(OVERLAY_RESOLUTION);
        assert_eq!(overlay.bounding_box, [96.0, 72.0, 480.0, 360.0]);
    }

    #[test]
    fn test_half_resolution_source_doubles_boxes() {
        let overlay = detection(0.5).to_overlay(Resolution {
            width: 480,
            height: 360,
        });
        assert_eq!(overlay.bounding_box, [192.0, 144.0, 960.0, 720.0]);
    }

    #[test]
    fn test_double_resolution_source_halves_boxes() {
        let overlay = detection(0.5).to_overlay(Resolution {
            width: 1920,
            height: 1440,
        });
        assert_eq!(overlay.bounding_box, [48.0, 36.0, 240.0, 180.0]);
    }

    #[test]
    fn test_label_rounds_score_to_percent() {
        assert_eq!(detection(0.876).label(), "dog (88 %)");
        assert_eq!(detection(1.0).label(), "dog (100 %)");
    }

    #[test]
    fn test_layout_keeps_order() {
        let mut cat = detection(0.1);
        cat.class_name = "cat".to_string();
        let overlays = layout_overlay(&[detection(0.9), cat], OVERLAY_RESOLUTION);
        assert_eq!(overlays.len(), 2);
        assert_eq!(overlays[1].label, "cat (10 %)");
    }
}
