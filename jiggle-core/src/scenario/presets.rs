use glam::Vec3;

use super::error::ScenarioError;
use super::schema::{Interpolation, ParentKey, Scenario};

/// Built-in scenario names with a one-line description.
pub const PRESETS: &[(&str, &str)] = &[
    ("still", "parent never moves; the bone sags under gravity and settles"),
    ("snap90", "parent yaws 90 degrees in a single frame"),
    ("sway", "parent sweeps yaw to +60, -60 and back"),
    ("bounce", "parent hops up half a unit and back every second"),
];

fn yaw(frame: u32, degrees: f32) -> ParentKey { ParentKey::new(frame, Vec3::ZERO, Vec3::new(0.0, degrees, 0.0)) }

fn base(name: &str, frames: u32, interpolation: Interpolation, keys: Vec<ParentKey>) -> Scenario {
    Scenario {
        name: name.to_string(),
        frames,
        dt: 1.0 / 60.0,
        interpolation,
        bone_offset: Vec3::ZERO,
        bind_rotation_deg: Vec3::ZERO,
        keys,
    }
}

pub fn preset(name: &str) -> Result<Scenario, ScenarioError> {
    let scenario = match name {
        "still" => base(name, 240, Interpolation::Step, vec![yaw(0, 0.0)]),
        "snap90" => base(name, 240, Interpolation::Step, vec![yaw(0, 0.0), yaw(1, 90.0)]),
        "sway" => base(
            name,
            360,
            Interpolation::Linear,
            vec![yaw(0, 0.0), yaw(90, 60.0), yaw(180, -60.0), yaw(270, 0.0)],
        ),
        "bounce" => {
            let keys = (0..8u32)
                .map(|i| ParentKey::new(i * 30, Vec3::Y * if i % 2 == 1 { 0.5 } else { 0.0 }, Vec3::ZERO))
                .collect();
            base(name, 300, Interpolation::Step, keys)
        }
        _ => {
            let known: Vec<&str> = PRESETS.iter().map(|(n, _)| *n).collect();
            return Err(ScenarioError::UnknownPreset(name.to_string(), known.join(", ")));
        }
    };
    Ok(scenario)
}
