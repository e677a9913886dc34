use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::error::ScenarioError;
use crate::rig::ParentFrame;
use crate::secondary::shape::from_euler_degrees;

/// Longest run a scenario may ask for; about 4.6 hours at 60 Hz.
pub const MAX_FRAMES: u32 = 1_000_000;

fn default_dt() -> f32 { 1.0 / 60.0 }

/// Scripted motion of a bone's parent frame, sampled once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub frames: u32,
    #[serde(default = "default_dt")]
    pub dt: f32,
    #[serde(default)]
    pub interpolation: Interpolation,
    /// Bone translation relative to its parent.
    #[serde(default)]
    pub bone_offset: Vec3,
    /// Bone bind rotation relative to its parent, (pitch, yaw, roll) in degrees.
    #[serde(default)]
    pub bind_rotation_deg: Vec3,
    pub keys: Vec<ParentKey>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Hold each key until the next one.
    #[default]
    Step,
    /// Lerp translation and slerp rotation between keys.
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParentKey {
    pub frame: u32,
    #[serde(default)]
    pub translation: Vec3,
    /// (pitch, yaw, roll) in degrees.
    #[serde(default)]
    pub rotation_deg: Vec3,
}

impl ParentKey {
    pub fn new(frame: u32, translation: Vec3, rotation_deg: Vec3) -> Self { Self { frame, translation, rotation_deg } }

    pub fn rotation(&self) -> Quat { from_euler_degrees(self.rotation_deg) }

    fn to_frame(self) -> ParentFrame { ParentFrame::new(self.translation, self.rotation()) }
}

impl Scenario {
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.keys.is_empty() {
            return Err(ScenarioError::NoKeys(self.name.clone()));
        }
        if self.frames == 0 {
            return Err(ScenarioError::NoFrames(self.name.clone()));
        }
        if self.frames > MAX_FRAMES {
            return Err(ScenarioError::TooManyFrames { name: self.name.clone(), frames: self.frames, max: MAX_FRAMES });
        }
        if !self.dt.is_finite() || self.dt < 0.0 {
            return Err(ScenarioError::InvalidDt { name: self.name.clone(), dt: self.dt });
        }
        for (index, pair) in self.keys.windows(2).enumerate() {
            if pair[1].frame <= pair[0].frame {
                return Err(ScenarioError::KeysOutOfOrder {
                    name: self.name.clone(),
                    index: index + 1,
                    frame: pair[1].frame,
                    previous: pair[0].frame,
                });
            }
        }
        Ok(())
    }

    /// Local rotation the bone starts (and rests) in.
    pub fn bind_rotation(&self) -> Quat { from_euler_degrees(self.bind_rotation_deg) }

    /// Parent frame at `frame`. Frames before the first key use the first key;
    /// frames after the last key hold the last one.
    pub fn parent_at(&self, frame: u32) -> ParentFrame {
        let Some(first) = self.keys.first() else { return ParentFrame::default() };
        let next = self.keys.partition_point(|k| k.frame <= frame);
        if next == 0 {
            return first.to_frame();
        }
        let prev = self.keys[next - 1];
        match (self.interpolation, self.keys.get(next)) {
            (Interpolation::Linear, Some(after)) => {
                let t = (frame - prev.frame) as f32 / (after.frame - prev.frame) as f32;
                ParentFrame::new(
                    prev.translation.lerp(after.translation, t),
                    prev.rotation().slerp(after.rotation(), t),
                )
            }
            _ => prev.to_frame(),
        }
    }

    /// Simulated duration in seconds.
    pub fn duration(&self) -> f32 { self.frames as f32 * self.dt }
}
