use serde::{Deserialize, Serialize};

/// A concrete decal transform handed to the renderer.
///
/// Position and rotation are in the garment model's local space (rotation is
/// Euler XYZ in radians). Scale is uniform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecalTransform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: f64,
}

/// Camera position and look-at target used to frame a region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFraming {
    pub position: [f64; 3],
    pub target: [f64; 3],
}

impl CameraFraming {
    pub const fn new(position: [f64; 3], target: [f64; 3]) -> Self {
        Self { position, target }
    }

    /// Linear interpolation between two framings, `t` in [0, 1].
    pub fn lerp(&self, other: &CameraFraming, t: f64) -> CameraFraming {
        CameraFraming {
            position: lerp3(self.position, other.position, t),
            target: lerp3(self.target, other.target, t),
        }
    }
}

impl Default for CameraFraming {
    fn default() -> Self {
        Self::new([0.0, 0.0, 3.0], [0.0, 0.0, 0.0])
    }
}

/// Empirically tuned placement of a decal on one region of the garment mesh.
///
/// The final decal scale is `tier base scale * scale_multiplier`. The
/// multiplier is tuned per region, independently of the tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionPlacement {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale_multiplier: f64,
}

fn lerp3(a: [f64; 3], b: [f64; 3], t: f64) -> [f64; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}
