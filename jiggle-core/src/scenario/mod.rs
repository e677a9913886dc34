//! Offline driver: scripted parent motion applied to one jiggle bone.
//!
//! Scenario files describe only motion. Jiggle tunables are supplied by the
//! caller and never read from disk.

pub mod error;
pub mod presets;
pub mod schema;

use anyhow::{Context, Result};

pub use error::ScenarioError;
pub use presets::{preset, PRESETS};
pub use schema::{Interpolation, ParentKey, Scenario, MAX_FRAMES};

use crate::export::{FrameSample, Trace};
use crate::render::DebugSink;
use crate::rig::Bone;
use crate::secondary::{JiggleBone, JiggleParams};

pub fn load_from_yaml_str(s: &str) -> Result<Scenario> {
    let scenario: Scenario = serde_yaml::from_str(s)?;
    scenario.validate()?;
    Ok(scenario)
}

pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Scenario> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path).with_context(|| format!("reading scenario {}", path.display()))?;
    load_from_yaml_str(&data).with_context(|| format!("loading scenario {}", path.display()))
}

/// Resolves a preset name first, then falls back to a file path.
pub fn resolve(name_or_path: &str) -> Result<Scenario> {
    if PRESETS.iter().any(|(n, _)| *n == name_or_path) {
        return Ok(preset(name_or_path)?);
    }
    load_from_path(name_or_path)
}

/// Activates a bone at the frame 0 pose and steps it once per scenario frame.
pub fn run(scenario: &Scenario, params: JiggleParams, mut sink: Option<&mut dyn DebugSink>) -> Result<Trace, ScenarioError> {
    scenario.validate()?;
    let mut bone = Bone::new(scenario.parent_at(0), scenario.bone_offset, scenario.bind_rotation());
    let mut jiggle = JiggleBone::activate(&bone, params);
    #[cfg(feature = "log")]
    log::info!("running scenario '{}' for {} frames (dt={})", scenario.name, scenario.frames, scenario.dt);

    let mut samples = Vec::new();
    for frame in 0..scenario.frames {
        bone.set_parent(scenario.parent_at(frame));
        let step = jiggle.update(&mut bone, scenario.dt, sink.as_deref_mut());
        let sample = FrameSample::capture(frame, frame as f32 * scenario.dt, &step, jiggle.state());
        #[cfg(feature = "log")]
        log::debug!("frame {}: displacement={:.4} angle={:.2}", frame, sample.displacement, sample.angle_from_bind_deg);
        samples.push(sample);
    }
    Ok(Trace { scenario: scenario.name.clone(), dt: scenario.dt, samples })
}
