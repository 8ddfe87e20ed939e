//! Ground Sensing
//!
//! Samples the terrain under five points of the board (center plus the four
//! footprint corners, rotated with the rider) and averages the hits into one
//! [`ContactSample`].

use crate::core::math::{world_up, Quat, Vec3, VEC_EPS};
use crate::game::config::PhysicsConfig;
use crate::game::terrain::TerrainQuery;

/// Per-frame ground estimate under the rider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactSample {
    /// Mean elevation of the successful samples; `None` when nothing hit
    pub elevation: Option<f32>,
    /// Mean unit normal of the hits; world up when nothing hit
    pub normal: Vec3,
    /// Number of samples that found ground (0..=5)
    pub hits: u8,
}

impl ContactSample {
    /// No ground found.
    pub fn none() -> Self {
        Self {
            elevation: None,
            normal: world_up(),
            hits: 0,
        }
    }

    /// Vertical distance from `height` down to the ground, if any.
    #[inline]
    pub fn distance_below(&self, height: f32) -> Option<f32> {
        self.elevation.map(|elevation| height - elevation)
    }
}

/// Body-relative sample offsets: center, then the footprint corners.
pub fn footprint_offsets(config: &PhysicsConfig) -> [Vec3; 5] {
    let w = config.footprint_half_width;
    let l = config.footprint_half_length;
    [
        Vec3::zeros(),
        Vec3::new(-w, 0.0, -l),
        Vec3::new(w, 0.0, -l),
        Vec3::new(-w, 0.0, l),
        Vec3::new(w, 0.0, l),
    ]
}

/// Sample the ground under the rider's footprint.
pub fn sense_ground<T: TerrainQuery + ?Sized>(
    terrain: &T,
    position: &Vec3,
    orientation: &Quat,
    config: &PhysicsConfig,
) -> ContactSample {
    let mut elevation_sum = 0.0;
    let mut normal_sum = Vec3::zeros();
    let mut hits = 0u8;

    for offset in footprint_offsets(config) {
        let point = position + orientation * offset;
        if let Some(sample) = terrain.sample_ground(point.x, point.z) {
            elevation_sum += sample.elevation;
            normal_sum += sample.normal;
            hits += 1;
        }
    }

    if hits == 0 {
        return ContactSample::none();
    }

    let normal = (normal_sum / hits as f32)
        .try_normalize(VEC_EPS)
        .unwrap_or_else(world_up);

    ContactSample {
        elevation: Some(elevation_sum / hits as f32),
        normal,
        hits,
    }
}
