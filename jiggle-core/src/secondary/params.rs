use glam::Vec3;

/// Floor used in place of a non-positive mass.
pub const MIN_MASS: f32 = 0.01;

/// Tunables for one jiggle bone.
///
/// Fields are set freely; out-of-range values are corrected when a step runs,
/// never on assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JiggleParams {
    pub stiffness: f32,
    pub mass: f32,
    pub damping: f32,
    /// Magnitude of gravity along world -Y.
    pub gravity: f32,

    pub stretch: bool,
    pub side_stretch: f32,
    pub front_stretch: f32,

    /// Per-axis Euler limits in degrees, (pitch, yaw, roll) as x, y, z.
    pub lower_angular_limit: Vec3,
    pub upper_angular_limit: Vec3,

    pub lower_scale_limit: Vec3,
    pub upper_scale_limit: Vec3,

    pub debug_render: bool,
}

impl Default for JiggleParams {
    fn default() -> Self {
        Self {
            stiffness: 120.0,
            mass: 1.0,
            damping: 15.0,
            gravity: 9.81,
            stretch: true,
            side_stretch: 0.15,
            front_stretch: 0.2,
            lower_angular_limit: Vec3::NEG_INFINITY,
            upper_angular_limit: Vec3::INFINITY,
            lower_scale_limit: Vec3::ONE,
            upper_scale_limit: Vec3::INFINITY,
            debug_render: false,
        }
    }
}

impl JiggleParams {
    /// Loose, bouncy motion (hair, ears).
    pub fn soft() -> Self { Self { stiffness: 40.0, damping: 4.0, ..Self::default() } }

    /// Tight motion that settles quickly (armor straps, antennae).
    pub fn stiff() -> Self { Self { stiffness: 300.0, damping: 30.0, ..Self::default() } }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self { self.stiffness = stiffness; self }
    pub fn with_mass(mut self, mass: f32) -> Self { self.mass = mass; self }
    pub fn with_damping(mut self, damping: f32) -> Self { self.damping = damping; self }
    pub fn with_gravity(mut self, gravity: f32) -> Self { self.gravity = gravity; self }

    pub fn with_stretch(mut self, side: f32, front: f32) -> Self {
        self.stretch = true;
        self.side_stretch = side;
        self.front_stretch = front;
        self
    }

    pub fn without_stretch(mut self) -> Self { self.stretch = false; self }

    pub fn with_angular_limits(mut self, lower: Vec3, upper: Vec3) -> Self {
        self.lower_angular_limit = lower;
        self.upper_angular_limit = upper;
        self
    }

    pub fn with_scale_limits(mut self, lower: Vec3, upper: Vec3) -> Self {
        self.lower_scale_limit = lower;
        self.upper_scale_limit = upper;
        self
    }

    pub fn with_debug_render(mut self, enabled: bool) -> Self { self.debug_render = enabled; self }

    /// Mass the integrator uses: non-positive (or NaN) input becomes [`MIN_MASS`].
    pub fn effective_mass(&self) -> f32 {
        if self.mass > 0.0 { self.mass } else { MIN_MASS }
    }

    /// Damping the integrator uses: negative input becomes zero.
    pub fn effective_damping(&self) -> f32 {
        if self.damping < 0.0 { 0.0 } else { self.damping }
    }

    /// True when the stored values would be corrected at use time.
    pub fn needs_sanitizing(&self) -> bool { !(self.mass > 0.0) || self.damping < 0.0 }
}
