//! Trace export: per-frame samples and a run summary as JSON or CSV.

use std::fmt::Write as _;

use glam::Vec3;
use serde::Serialize;

use crate::secondary::shape::euler_degrees;
use crate::secondary::{JiggleState, JiggleStep};

/// Speed below which the final frame counts as settled.
pub const SETTLE_SPEED: f32 = 1e-2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSample {
    pub frame: u32,
    pub time: f32,
    pub dynamic_point: Vec3,
    pub velocity: Vec3,
    /// Length of the displacement that drove this frame.
    pub displacement: f32,
    /// World rotation as (pitch, yaw, roll) degrees.
    pub euler_deg: Vec3,
    /// Angle between the jiggled forward and the bind-pose forward.
    pub angle_from_bind_deg: f32,
    pub scale: Option<Vec3>,
}

impl FrameSample {
    pub fn capture(frame: u32, time: f32, step: &JiggleStep, state: &JiggleState) -> Self {
        Self {
            frame,
            time,
            dynamic_point: state.dynamic_point,
            velocity: state.velocity,
            displacement: step.displacement.length(),
            euler_deg: euler_degrees(step.rotation),
            angle_from_bind_deg: step.forward().angle_between(step.bind_forward()).to_degrees(),
            scale: step.scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub scenario: String,
    pub dt: f32,
    pub samples: Vec<FrameSample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceSummary {
    pub frames: usize,
    pub peak_displacement: f32,
    pub final_angle_from_bind_deg: f32,
    pub settled: bool,
}

impl Trace {
    pub fn summary(&self) -> TraceSummary {
        let peak_displacement = self.samples.iter().map(|s| s.displacement).fold(0.0, f32::max);
        let last = self.samples.last();
        TraceSummary {
            frames: self.samples.len(),
            peak_displacement,
            final_angle_from_bind_deg: last.map_or(0.0, |s| s.angle_from_bind_deg),
            settled: last.is_some_and(|s| s.velocity.length() < SETTLE_SPEED),
        }
    }
}

#[derive(Serialize)]
struct TraceDocument<'a> {
    #[serde(flatten)]
    trace: &'a Trace,
    summary: TraceSummary,
}

pub fn to_json(trace: &Trace) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&TraceDocument { trace, summary: trace.summary() })
}

pub const CSV_HEADER: &str = "frame,time,px,py,pz,vx,vy,vz,displacement,pitch,yaw,roll,angle_from_bind,sx,sy,sz";

pub fn to_csv(trace: &Trace) -> String {
    let mut out = String::with_capacity(64 * (trace.samples.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');
    for s in &trace.samples {
        let scale = s.scale.map_or_else(|| ",,".to_string(), |v| format!("{},{},{}", v.x, v.y, v.z));
        // writing into a String cannot fail
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            s.frame,
            s.time,
            s.dynamic_point.x,
            s.dynamic_point.y,
            s.dynamic_point.z,
            s.velocity.x,
            s.velocity.y,
            s.velocity.z,
            s.displacement,
            s.euler_deg.x,
            s.euler_deg.y,
            s.euler_deg.z,
            s.angle_from_bind_deg,
            scale,
        );
    }
    out
}
