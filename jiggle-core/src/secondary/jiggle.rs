use glam::{Quat, Vec3};

use super::params::JiggleParams;
use super::shape::{clamp_rotation, look_rotation, stretch_scale};
use crate::render::{DebugRay, DebugSink, RayColor, MARKER_LENGTH};
use crate::rig::BoneNode;

/// Simulation state carried between frames for one bone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JiggleState {
    /// Local rotation captured at activation; the rest pose.
    pub bind_rotation: Quat,
    /// World-space position of the simulated mass.
    pub dynamic_point: Vec3,
    /// World-space velocity of the simulated mass.
    pub velocity: Vec3,
}

/// What one update did, for hosts and tests that want to observe it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JiggleStep {
    /// World position of the bone.
    pub origin: Vec3,
    /// Undeformed target: bone position plus bind-pose forward.
    pub target: Vec3,
    /// Target minus the dynamic point before integration.
    pub displacement: Vec3,
    /// World rotation written to the bone after clamping.
    pub rotation: Quat,
    /// Local scale written to the bone, when stretch is enabled.
    pub scale: Option<Vec3>,
}

/// A single spring-damped bone.
///
/// Built by [`JiggleBone::activate`], so the bind pose is always captured
/// before the first [`JiggleBone::update`].
#[derive(Debug, Clone)]
pub struct JiggleBone {
    state: JiggleState,
    params: JiggleParams,
}

impl JiggleStep {
    /// Bind-pose forward unit vector for this frame.
    pub fn bind_forward(&self) -> Vec3 { self.target - self.origin }

    /// Forward unit vector after jiggling and clamping.
    pub fn forward(&self) -> Vec3 { self.rotation * Vec3::Z }
}

impl JiggleBone {
    /// Captures the bind pose of `node` and seeds the dynamic point one unit
    /// ahead of the bone.
    pub fn activate<N: BoneNode + ?Sized>(node: &N, params: JiggleParams) -> Self {
        let state = JiggleState {
            bind_rotation: node.local_rotation(),
            dynamic_point: node.world_position() + node.forward(),
            velocity: Vec3::ZERO,
        };
        #[cfg(feature = "log")]
        log::debug!("jiggle bone activated: bind={:?} point={:?}", state.bind_rotation, state.dynamic_point);
        Self { state, params }
    }

    pub fn state(&self) -> &JiggleState { &self.state }

    pub fn params(&self) -> &JiggleParams { &self.params }

    /// Tunables may change between frames; they are sanitized on use.
    pub fn params_mut(&mut self) -> &mut JiggleParams { &mut self.params }

    /// Drops accumulated motion: the dynamic point returns to the bind target
    /// and velocity is cleared. The bind rotation is kept.
    pub fn reset<N: BoneNode + ?Sized>(&mut self, node: &mut N) {
        node.set_local_rotation(self.state.bind_rotation);
        self.state.dynamic_point = node.world_position() + node.forward();
        self.state.velocity = Vec3::ZERO;
    }

    /// Advances the simulation by `dt` seconds and writes rotation (and scale)
    /// to `node`. Call once per frame after the primary pose is final.
    pub fn update<N: BoneNode + ?Sized>(&mut self, node: &mut N, dt: f32, sink: Option<&mut (dyn DebugSink + '_)>) -> JiggleStep {
        #[cfg(feature = "log")]
        if self.params.needs_sanitizing() {
            log::trace!("sanitizing jiggle params: mass={} damping={}", self.params.mass, self.params.damping);
        }
        let p = &self.params;
        let damping = p.effective_damping();
        let mass = p.effective_mass();

        // measure against the undeformed pose, not last frame's result
        node.set_local_rotation(self.state.bind_rotation);
        let bind_forward = node.forward();
        let position = node.world_position();
        let up = node.up();
        let target = position + bind_forward;
        let displacement = target - self.state.dynamic_point;

        let s = &mut self.state;
        s.velocity /= 1.0 + damping * dt;
        let mut acc = displacement * p.stiffness / mass;
        acc.y -= p.gravity;
        s.velocity += acc * dt;
        s.dynamic_point += s.velocity * dt;

        if let Some(look) = look_rotation(s.dynamic_point - position, up) {
            node.set_world_rotation(look);
        }
        let rotation = clamp_rotation(node.world_rotation(), p.lower_angular_limit, p.upper_angular_limit);
        node.set_world_rotation(rotation);

        let distance = displacement.length();
        let scale = if p.stretch {
            let scale = stretch_scale(distance, p.side_stretch, p.front_stretch, p.lower_scale_limit, p.upper_scale_limit);
            node.set_local_scale(scale);
            Some(scale)
        } else {
            None
        };

        if let (true, Some(sink)) = (p.debug_render, sink) {
            let forward = node.forward();
            sink.draw_ray(DebugRay::new(position, bind_forward, RayColor::Blue));
            sink.draw_ray(DebugRay::new(position, forward, RayColor::Magenta));
            sink.draw_ray(DebugRay::new(s.dynamic_point, Vec3::Y * MARKER_LENGTH, RayColor::Red));
            sink.draw_ray(DebugRay::new(position + forward * distance, Vec3::Y * MARKER_LENGTH, RayColor::Green));
        }

        JiggleStep { origin: position, target, displacement, rotation, scale }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::{Bone, ParentFrame};
    use std::f32::consts::FRAC_PI_2;

    const DT: f32 = 1.0 / 60.0;

    fn bone_at_origin() -> Bone { Bone::default() }

    fn angle_deg(a: Vec3, b: Vec3) -> f32 { a.angle_between(b).to_degrees() }

    #[test]
    fn activation_seeds_point_ahead_of_bone() {
        let parent = ParentFrame::new(Vec3::new(0.0, 1.0, 0.0), Quat::from_rotation_y(FRAC_PI_2));
        let bone = Bone::new(parent, Vec3::ZERO, Quat::from_rotation_x(0.2));
        let jiggle = JiggleBone::activate(&bone, JiggleParams::default());
        let s = jiggle.state();
        assert_eq!(s.bind_rotation, Quat::from_rotation_x(0.2));
        assert_eq!(s.velocity, Vec3::ZERO);
        assert!(s.dynamic_point.abs_diff_eq(bone.world_position() + bone.forward(), 1e-6));
    }

    #[test]
    fn zero_dt_keeps_point_and_velocity() {
        let mut bone = bone_at_origin();
        let mut jiggle = JiggleBone::activate(&bone, JiggleParams::default());
        for _ in 0..10 {
            jiggle.update(&mut bone, DT, None);
        }
        let before = *jiggle.state();
        bone.set_parent(ParentFrame::new(Vec3::new(0.5, 0.0, 0.0), Quat::from_rotation_y(0.7)));
        let step = jiggle.update(&mut bone, 0.0, None);
        assert_eq!(jiggle.state().velocity, before.velocity);
        assert_eq!(jiggle.state().dynamic_point, before.dynamic_point);
        // displacement still reflects the moved parent
        assert!(step.displacement.length() > 0.1);
    }

    #[test]
    fn negative_damping_behaves_as_zero() {
        let mut a = bone_at_origin();
        let mut b = bone_at_origin();
        let mut neg = JiggleBone::activate(&a, JiggleParams::default().with_damping(-5.0));
        let mut zero = JiggleBone::activate(&b, JiggleParams::default().with_damping(0.0));
        for _ in 0..30 {
            neg.update(&mut a, DT, None);
            zero.update(&mut b, DT, None);
        }
        assert_eq!(neg.state().dynamic_point, zero.state().dynamic_point);
        assert_eq!(neg.state().velocity, zero.state().velocity);
    }

    #[test]
    fn non_positive_mass_behaves_as_floor() {
        let mut a = bone_at_origin();
        let mut b = bone_at_origin();
        let mut neg = JiggleBone::activate(&a, JiggleParams::default().with_mass(-1.0));
        let mut floor = JiggleBone::activate(&b, JiggleParams::default().with_mass(0.01));
        for _ in 0..5 {
            neg.update(&mut a, DT, None);
            floor.update(&mut b, DT, None);
        }
        assert_eq!(neg.state().dynamic_point, floor.state().dynamic_point);
        // the stored tunable is left alone
        assert_eq!(neg.params().mass, -1.0);
    }

    #[test]
    fn zero_stiffness_decays_and_falls() {
        let mut bone = bone_at_origin();
        let params = JiggleParams::default().with_stiffness(0.0).with_gravity(0.0).with_damping(10.0);
        let mut jiggle = JiggleBone::activate(&bone, params);
        jiggle.state.velocity = Vec3::new(2.0, 0.0, -1.0);
        let factor = 1.0 / (1.0 + 10.0 * DT);
        let mut expected = jiggle.state().velocity;
        for _ in 0..20 {
            jiggle.update(&mut bone, DT, None);
            expected *= factor;
            assert!(jiggle.state().velocity.abs_diff_eq(expected, 1e-5));
        }

        // with gravity the only acceleration is straight down
        let mut bone = bone_at_origin();
        let mut jiggle = JiggleBone::activate(&bone, JiggleParams::default().with_stiffness(0.0));
        let start = jiggle.state().dynamic_point;
        for _ in 0..20 {
            jiggle.update(&mut bone, DT, None);
        }
        let moved = jiggle.state().dynamic_point - start;
        assert!(moved.y < 0.0);
        assert!(moved.x.abs() < 1e-6 && moved.z.abs() < 1e-6);
    }

    #[test]
    fn still_parent_settles_near_bind() {
        let mut bone = bone_at_origin();
        let mut jiggle = JiggleBone::activate(&bone, JiggleParams::default());
        let mut peak: f32 = 0.0;
        for _ in 0..600 {
            let step = jiggle.update(&mut bone, DT, None);
            peak = peak.max(step.displacement.length());
        }
        // gravity sag settles at g * m / k below the target
        let sag = 9.81 / 120.0;
        assert!(peak < 0.15, "peak displacement {peak}");
        let rest = Vec3::Z - Vec3::Y * sag;
        assert!(jiggle.state().dynamic_point.abs_diff_eq(rest, 1e-3));
        assert!(jiggle.state().velocity.length() < 1e-3);
        assert!(angle_deg(bone.forward(), Vec3::Z) < 6.0);
    }

    #[test]
    fn sudden_rotation_lags_then_settles() {
        let mut bone = bone_at_origin();
        let params = JiggleParams::default().without_stretch();
        let mut jiggle = JiggleBone::activate(&bone, params);
        for _ in 0..300 {
            jiggle.update(&mut bone, DT, None);
        }
        bone.set_parent(ParentFrame::new(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2)));
        let new_forward = Vec3::X;

        jiggle.update(&mut bone, DT, None);
        let lag = angle_deg(bone.forward(), new_forward);
        assert!(lag > 80.0, "bone snapped to {lag} degrees from target");

        let mut min_angle = lag;
        let mut overshot = false;
        for _ in 0..600 {
            jiggle.update(&mut bone, DT, None);
            let f = bone.forward();
            min_angle = min_angle.min(angle_deg(f, new_forward));
            // swinging past +X carries the forward into negative z
            if f.z < -0.01 {
                overshot = true;
            }
        }
        assert!(overshot, "expected the bone to swing past its target");
        assert!(angle_deg(bone.forward(), new_forward) < 6.0);
        assert!(min_angle < 6.0);
        assert_eq!(bone.local_scale(), Vec3::ONE);
    }

    #[test]
    fn stretch_writes_scale_from_displacement() {
        let mut bone = bone_at_origin();
        let mut jiggle = JiggleBone::activate(&bone, JiggleParams::default());
        bone.set_parent(ParentFrame::new(Vec3::new(0.0, 0.0, 1.0), Quat::IDENTITY));
        let step = jiggle.update(&mut bone, DT, None);
        let d = step.displacement.length();
        let expected = Vec3::new(1.0 - 0.15 * d, 1.0 - 0.15 * d, 1.0 + 0.2 * d);
        assert!(step.scale.unwrap().abs_diff_eq(expected, 1e-6));
        assert_eq!(bone.local_scale(), step.scale.unwrap());
    }

    #[test]
    fn angular_limits_bound_the_swing() {
        let mut bone = bone_at_origin();
        let params = JiggleParams::default()
            .without_stretch()
            .with_angular_limits(Vec3::NEG_INFINITY, Vec3::new(f32::INFINITY, 20.0, f32::INFINITY));
        let mut jiggle = JiggleBone::activate(&bone, params);
        bone.set_parent(ParentFrame::new(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2)));
        for _ in 0..120 {
            let step = jiggle.update(&mut bone, DT, None);
            let e = crate::secondary::shape::euler_degrees(step.rotation);
            assert!(e.y <= 20.0 + 1e-3, "yaw {}", e.y);
        }
    }

    #[test]
    fn rolled_bind_pose_keeps_its_roll() {
        let bind = Quat::from_rotation_z(1.0);
        let mut bone = Bone::new(ParentFrame::default(), Vec3::ZERO, bind);
        let params = JiggleParams::default().without_stretch().with_gravity(0.0);
        let mut jiggle = JiggleBone::activate(&bone, params);
        let parent = Quat::from_rotation_y(FRAC_PI_2);
        bone.set_parent(ParentFrame::new(Vec3::ZERO, parent));
        let expected_up = parent * bind * Vec3::Y;
        for _ in 0..600 {
            jiggle.update(&mut bone, DT, None);
        }
        // the look-at keeps the bone's own roll instead of world up
        assert!(bone.forward().abs_diff_eq(Vec3::X, 1e-3));
        assert!(bone.up().abs_diff_eq(expected_up, 1e-3), "up {}", bone.up());
        assert!(angle_deg(bone.up(), Vec3::Y) > 45.0);
    }

    #[test]
    fn gravity_pulls_along_world_y_only() {
        let parent = ParentFrame::new(Vec3::new(0.0, 2.0, 0.0), Quat::from_rotation_z(0.8) * Quat::from_rotation_x(0.5));
        let mut bone = Bone::new(parent, Vec3::ZERO, Quat::from_rotation_z(0.4));
        assert!(angle_deg(bone.up(), Vec3::Y) > 30.0);
        let params = JiggleParams::default().with_stiffness(0.0).without_stretch();
        let mut jiggle = JiggleBone::activate(&bone, params);
        let start = jiggle.state().dynamic_point;
        for _ in 0..30 {
            jiggle.update(&mut bone, DT, None);
            let v = jiggle.state().velocity;
            assert!(v.x.abs() < 1e-6 && v.z.abs() < 1e-6, "velocity {v}");
        }
        let moved = jiggle.state().dynamic_point - start;
        assert!(moved.y < -0.1);
        assert!(moved.x.abs() < 1e-5 && moved.z.abs() < 1e-5, "moved {moved}");
    }

    #[test]
    fn debug_rays_only_when_enabled() {
        let mut bone = bone_at_origin();
        let mut rays: Vec<DebugRay> = Vec::new();
        let mut jiggle = JiggleBone::activate(&bone, JiggleParams::default());
        jiggle.update(&mut bone, DT, Some(&mut rays));
        assert!(rays.is_empty());

        jiggle.params_mut().debug_render = true;
        let step = jiggle.update(&mut bone, DT, Some(&mut rays));
        let colors: Vec<RayColor> = rays.iter().map(|r| r.color).collect();
        assert_eq!(colors, vec![RayColor::Blue, RayColor::Magenta, RayColor::Red, RayColor::Green]);
        assert!(rays[0].direction.abs_diff_eq(Vec3::Z, 1e-6));
        assert_eq!(rays[2].origin, jiggle.state().dynamic_point);
        assert_eq!(rays[3].direction, Vec3::Y * MARKER_LENGTH);
        assert!(rays[3].origin.abs_diff_eq(bone.forward() * step.displacement.length(), 1e-6));

        // enabled without a sink is fine
        jiggle.update(&mut bone, DT, None);
    }

    #[test]
    fn debug_sink_does_not_change_numbers() {
        let mut a = bone_at_origin();
        let mut b = bone_at_origin();
        let params = JiggleParams::default().with_debug_render(true);
        let mut with_sink = JiggleBone::activate(&a, params);
        let mut without = JiggleBone::activate(&b, params);
        let mut rays: Vec<DebugRay> = Vec::new();
        for i in 0..50 {
            let parent = ParentFrame::new(Vec3::ZERO, Quat::from_rotation_y(i as f32 * 0.05));
            a.set_parent(parent);
            b.set_parent(parent);
            with_sink.update(&mut a, DT, Some(&mut rays));
            without.update(&mut b, DT, None);
        }
        assert_eq!(with_sink.state(), without.state());
        assert_eq!(rays.len(), 200);
    }

    #[test]
    fn reset_clears_motion_but_keeps_bind() {
        let mut bone = Bone::new(ParentFrame::default(), Vec3::ZERO, Quat::from_rotation_x(-0.3));
        let mut jiggle = JiggleBone::activate(&bone, JiggleParams::default());
        bone.set_parent(ParentFrame::new(Vec3::new(3.0, 0.0, 0.0), Quat::IDENTITY));
        for _ in 0..5 {
            jiggle.update(&mut bone, DT, None);
        }
        jiggle.reset(&mut bone);
        assert_eq!(jiggle.state().velocity, Vec3::ZERO);
        assert_eq!(jiggle.state().bind_rotation, Quat::from_rotation_x(-0.3));
        assert!(jiggle.state().dynamic_point.abs_diff_eq(bone.world_position() + bone.forward(), 1e-6));
    }
}
