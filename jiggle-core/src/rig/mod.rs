//! Rigging foundations: the transform capability a jiggle bone drives, plus a
//! small reference bone node for running the simulation outside a host engine.
//!
//! Axis conventions: +Z is a bone's forward axis, +Y its up axis, and world up
//! is +Y.

use glam::{Quat, Vec3};

/// Read/write access to a bone's transform, implemented by whatever scene graph
/// owns the bone. The simulation holds no other reference to the host.
pub trait BoneNode {
    fn local_rotation(&self) -> Quat;
    fn set_local_rotation(&mut self, rotation: Quat);
    fn world_position(&self) -> Vec3;
    fn world_rotation(&self) -> Quat;
    /// Sets the world-space rotation; implementors convert into local space.
    fn set_world_rotation(&mut self, rotation: Quat);
    fn local_scale(&self) -> Vec3;
    fn set_local_scale(&mut self, scale: Vec3);

    /// World-space forward unit vector.
    fn forward(&self) -> Vec3 { self.world_rotation() * Vec3::Z }

    /// World-space up unit vector.
    fn up(&self) -> Vec3 { self.world_rotation() * Vec3::Y }
}

/// Rigid world-space frame of a bone's parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentFrame {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for ParentFrame {
    fn default() -> Self { Self { translation: Vec3::ZERO, rotation: Quat::IDENTITY } }
}

impl ParentFrame {
    pub fn new(translation: Vec3, rotation: Quat) -> Self { Self { translation, rotation } }
}

/// Reference bone: a local transform under a rigid parent frame.
///
/// Parent scale is not modelled; scale written by the simulation is purely local.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bone {
    pub parent: ParentFrame,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Bone {
    fn default() -> Self {
        Self { parent: ParentFrame::default(), translation: Vec3::ZERO, rotation: Quat::IDENTITY, scale: Vec3::ONE }
    }
}

impl Bone {
    pub fn new(parent: ParentFrame, translation: Vec3, rotation: Quat) -> Self {
        Self { parent, translation, rotation, scale: Vec3::ONE }
    }

    /// Moves the parent frame, as the primary animation would each frame.
    pub fn set_parent(&mut self, parent: ParentFrame) { self.parent = parent; }
}

impl BoneNode for Bone {
    fn local_rotation(&self) -> Quat { self.rotation }

    fn set_local_rotation(&mut self, rotation: Quat) { self.rotation = rotation; }

    fn world_position(&self) -> Vec3 { self.parent.translation + self.parent.rotation * self.translation }

    fn world_rotation(&self) -> Quat { self.parent.rotation * self.rotation }

    fn set_world_rotation(&mut self, rotation: Quat) {
        self.rotation = (self.parent.rotation.inverse() * rotation).normalize();
    }

    fn local_scale(&self) -> Vec3 { self.scale }

    fn set_local_scale(&mut self, scale: Vec3) { self.scale = scale; }
}
