//! Secondary motion: spring-damped jiggle bones.
//!
//! Each bone is simulated on its own. Bones in a batch share nothing, so a
//! batch can be stepped in any order or in parallel (feature `parallel`).

mod jiggle;
pub mod params;
pub mod shape;

pub use jiggle::{JiggleBone, JiggleState, JiggleStep};
pub use params::JiggleParams;

use crate::rig::BoneNode;

/// Steps every (simulation, node) pair once, in order.
pub fn update_all<N: BoneNode>(bones: &mut [(JiggleBone, N)], dt: f32) {
    for (jiggle, node) in bones.iter_mut() {
        jiggle.update(node, dt, None);
    }
}

/// Steps every (simulation, node) pair once on the rayon pool.
#[cfg(feature = "parallel")]
pub fn par_update_all<N: BoneNode + Send>(bones: &mut [(JiggleBone, N)], dt: f32) {
    use rayon::prelude::*;
    bones.par_iter_mut().for_each(|(jiggle, node)| {
        jiggle.update(node, dt, None);
    });
}
