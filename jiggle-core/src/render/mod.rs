//! Debug ray output. Rendering itself belongs to the host; the simulation only
//! hands rays to a sink.

use glam::Vec3;
use serde::Serialize;

/// Length of the vertical markers drawn at the dynamic point and stretch point.
pub const MARKER_LENGTH: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RayColor {
    /// Bind pose forward vector.
    Blue,
    /// Current forward vector.
    Magenta,
    /// Dynamic point marker.
    Red,
    /// Stretch distance marker.
    Green,
}

impl RayColor {
    pub fn rgba(self) -> [f32; 4] {
        match self {
            RayColor::Blue => [0.0, 0.0, 1.0, 1.0],
            RayColor::Magenta => [1.0, 0.0, 1.0, 1.0],
            RayColor::Red => [1.0, 0.0, 0.0, 1.0],
            RayColor::Green => [0.0, 1.0, 0.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DebugRay {
    pub origin: Vec3,
    /// Direction scaled to the drawn length.
    pub direction: Vec3,
    pub color: RayColor,
}

impl DebugRay {
    pub fn new(origin: Vec3, direction: Vec3, color: RayColor) -> Self { Self { origin, direction, color } }

    pub fn end(&self) -> Vec3 { self.origin + self.direction }
}

/// Receives debug rays from a simulation step.
pub trait DebugSink {
    fn draw_ray(&mut self, ray: DebugRay);
}

/// Records rays in emission order.
impl DebugSink for Vec<DebugRay> {
    fn draw_ray(&mut self, ray: DebugRay) { self.push(ray); }
}
