//! Eye aspect ratio (EAR) estimation from eye landmarks

use serde::{Deserialize, Serialize};

/// Horizontal distances below this are treated as a collapsed eye contour.
const MIN_HORIZONTAL_PX: f64 = 1e-6;

/// A 2-D landmark position in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Six landmarks of one eye: the two corners and two upper/lower lid pairs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EyeLandmarks {
    pub horizontal: [Point; 2],
    pub vertical: [[Point; 2]; 2],
}

/// Face-mesh indices selecting one eye's six landmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeIndices {
    pub horizontal: [usize; 2],
    pub vertical: [[usize; 2]; 2],
}

/// Compute `(|v1| + |v2|) / (2 * |h|)` for one eye.
///
/// Degenerate geometry returns `0.0`, which the engine reads as a closed
/// eye, so an unreadable frame never reopens an in-progress blink.
pub fn eye_aspect_ratio(eye: &EyeLandmarks) -> f64 {
    let [h0, h1] = eye.horizontal;
    let horizontal = h0.distance(&h1);
    if !horizontal.is_finite() || horizontal < MIN_HORIZONTAL_PX {
        return 0.0;
    }

    let vertical: f64 = eye.vertical.iter().map(|[a, b]| a.distance(b)).sum();
    let ear = vertical / (2.0 * horizontal);

    if ear.is_finite() {
        ear
    } else {
        0.0
    }
}

/// Resolve normalized face-mesh landmarks into pixel space and compute the EAR.
///
/// `landmarks` holds `(x, y)` pairs in `[0, 1]` image coordinates. Indices
/// outside the mesh yield `0.0`.
pub fn eye_aspect_ratio_from_mesh(
    landmarks: &[(f32, f32)],
    indices: &EyeIndices,
    width: u32,
    height: u32,
) -> f64 {
    let resolve = |idx: usize| {
        landmarks
            .get(idx)
            .map(|&(x, y)| Point::new(x as f64 * width as f64, y as f64 * height as f64))
    };

    let eye = (|| {
        Some(EyeLandmarks {
            horizontal: [resolve(indices.horizontal[0])?, resolve(indices.horizontal[1])?],
            vertical: [
                [resolve(indices.vertical[0][0])?, resolve(indices.vertical[0][1])?],
                [resolve(indices.vertical[1][0])?, resolve(indices.vertical[1][1])?],
            ],
        })
    })();

    eye.map(|eye| eye_aspect_ratio(&eye)).unwrap_or(0.0)
}
