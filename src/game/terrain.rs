//! Terrain Queries
//!
//! The simulation never touches meshes. It asks a [`TerrainQuery`] for the
//! ground elevation and surface normal under a horizontal position, and gets
//! `None` where there is no ground (off the map, or a hole).
//!
//! Reference implementations:
//! - [`FlatTerrain`]: infinite horizontal plane
//! - [`SlopeTerrain`]: infinite plane descending toward -Z
//! - [`ProceduralTerrain`]: bounded noise mountain, downhill toward -Z

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::core::math::{world_up, Vec3};

/// Ground under a horizontal position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundSample {
    /// Surface height (m)
    pub elevation: f32,
    /// Unit surface normal
    pub normal: Vec3,
}

impl GroundSample {
    /// Horizontal ground at `elevation`.
    pub fn level(elevation: f32) -> Self {
        Self {
            elevation,
            normal: world_up(),
        }
    }
}

/// Height/normal lookup supplied by the host.
///
/// Implementations must be synchronous and cheap: the rider samples five
/// points per frame.
pub trait TerrainQuery {
    /// Ground under `(x, z)`, or `None` where there is no data.
    fn sample_ground(&self, x: f32, z: f32) -> Option<GroundSample>;

    /// False while terrain data is still loading; frames are skipped until
    /// this returns true.
    fn is_ready(&self) -> bool {
        true
    }
}

impl<T: TerrainQuery + ?Sized> TerrainQuery for &T {
    fn sample_ground(&self, x: f32, z: f32) -> Option<GroundSample> {
        (**self).sample_ground(x, z)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

// =============================================================================
// ANALYTIC TERRAINS
// =============================================================================

/// Infinite horizontal plane.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatTerrain {
    /// Plane height
    pub elevation: f32,
}

impl FlatTerrain {
    /// Plane at the given height.
    pub fn new(elevation: f32) -> Self {
        Self { elevation }
    }
}

impl TerrainQuery for FlatTerrain {
    fn sample_ground(&self, _x: f32, _z: f32) -> Option<GroundSample> {
        Some(GroundSample::level(self.elevation))
    }
}

/// Infinite inclined plane: `y = base + grade * z`.
///
/// Positive grade means the slope falls away toward -Z (body forward at
/// identity orientation).
#[derive(Clone, Copy, Debug)]
pub struct SlopeTerrain {
    /// Height at z = 0
    pub base: f32,
    /// Rise per meter along +Z
    pub grade: f32,
}

impl SlopeTerrain {
    /// Create a slope.
    pub fn new(base: f32, grade: f32) -> Self {
        Self { base, grade }
    }

    fn normal(&self) -> Vec3 {
        Vec3::new(0.0, 1.0, -self.grade).normalize()
    }
}

impl TerrainQuery for SlopeTerrain {
    fn sample_ground(&self, _x: f32, z: f32) -> Option<GroundSample> {
        Some(GroundSample {
            elevation: self.base + self.grade * z,
            normal: self.normal(),
        })
    }
}

// =============================================================================
// PROCEDURAL MOUNTAIN
// =============================================================================

/// Shape parameters for [`ProceduralTerrain`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProceduralParams {
    /// Noise seed
    pub seed: u32,
    /// Extent along X (m), centered on `center_x`
    pub width: f32,
    /// Extent along Z (m), centered on `center_z`
    pub depth: f32,
    /// Center of the terrain patch
    pub center_x: f32,
    /// See `center_x`
    pub center_z: f32,
    /// Height at the patch center (m)
    pub base_height: f32,
    /// Downhill ramp: rise per meter along +Z
    pub grade: f32,
    /// Noise octaves as (frequency 1/m, amplitude m)
    pub octaves: Vec<(f32, f32)>,
}

impl Default for ProceduralParams {
    fn default() -> Self {
        Self {
            seed: 7,
            width: 400.0,
            depth: 600.0,
            center_x: 0.0,
            center_z: 100.0,
            base_height: -20.0,
            grade: 0.35,
            octaves: vec![(0.01, 8.0), (0.05, 2.0), (0.2, 0.3)],
        }
    }
}

/// Noise-driven mountain patch with a steady downhill ramp.
///
/// Heights are layered Perlin noise; normals come from central differences.
/// Outside the patch there is no ground.
pub struct ProceduralTerrain {
    params: ProceduralParams,
    perlin: Perlin,
}

impl ProceduralTerrain {
    /// Central-difference step for normals (m).
    const NORMAL_STEP: f32 = 0.5;

    /// Build a terrain patch.
    pub fn new(params: ProceduralParams) -> Self {
        let perlin = Perlin::new(params.seed);
        Self { params, perlin }
    }

    /// Shape parameters.
    pub fn params(&self) -> &ProceduralParams {
        &self.params
    }

    /// True if `(x, z)` lies on the patch.
    pub fn contains(&self, x: f32, z: f32) -> bool {
        let p = &self.params;
        (x - p.center_x).abs() <= p.width * 0.5 && (z - p.center_z).abs() <= p.depth * 0.5
    }

    /// Unbounded height function.
    fn height(&self, x: f32, z: f32) -> f32 {
        let p = &self.params;
        let ramp = p.base_height + p.grade * (z - p.center_z);

        let detail: f64 = p
            .octaves
            .iter()
            .map(|&(frequency, amplitude)| {
                let point = [(x * frequency) as f64, (z * frequency) as f64];
                self.perlin.get(point) * amplitude as f64
            })
            .sum();

        ramp + detail as f32
    }
}

impl TerrainQuery for ProceduralTerrain {
    fn sample_ground(&self, x: f32, z: f32) -> Option<GroundSample> {
        if !self.contains(x, z) {
            return None;
        }

        let h = Self::NORMAL_STEP;
        let dx = (self.height(x + h, z) - self.height(x - h, z)) / (2.0 * h);
        let dz = (self.height(x, z + h) - self.height(x, z - h)) / (2.0 * h);
        let normal = Vec3::new(-dx, 1.0, -dz).normalize();

        Some(GroundSample {
            elevation: self.height(x, z),
            normal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_terrain() {
        let terrain = FlatTerrain::new(3.0);
        let sample = terrain.sample_ground(100.0, -50.0).expect("flat has ground");
        assert_eq!(sample.elevation, 3.0);
        assert_eq!(sample.normal, world_up());
        assert!(terrain.is_ready());
    }

    #[test]
    fn test_slope_descends_toward_negative_z() {
        let terrain = SlopeTerrain::new(0.0, 0.5);
        let uphill = terrain.sample_ground(0.0, 10.0).map(|s| s.elevation);
        let downhill = terrain.sample_ground(0.0, -10.0).map(|s| s.elevation);
        assert!(uphill > downhill);

        let normal = terrain.sample_ground(0.0, 0.0).expect("slope has ground").normal;
        assert!((normal.norm() - 1.0).abs() < 1.0e-5);
        // Normal leans downhill
        assert!(normal.z < 0.0);
    }

    #[test]
    fn test_procedural_bounds() {
        let terrain = ProceduralTerrain::new(ProceduralParams::default());
        assert!(terrain.sample_ground(0.0, 100.0).is_some());
        assert!(terrain.sample_ground(0.0, 1000.0).is_none());
        assert!(terrain.sample_ground(-500.0, 100.0).is_none());
    }

    #[test]
    fn test_procedural_is_deterministic_and_downhill() {
        let a = ProceduralTerrain::new(ProceduralParams::default());
        let b = ProceduralTerrain::new(ProceduralParams::default());

        let sa = a.sample_ground(12.3, 45.6);
        let sb = b.sample_ground(12.3, 45.6);
        assert_eq!(sa, sb);

        // Ramp dominates over 200 m
        let top = a.sample_ground(0.0, 300.0).map(|s| s.elevation).unwrap_or(0.0);
        let bottom = a.sample_ground(0.0, -100.0).map(|s| s.elevation).unwrap_or(0.0);
        assert!(top > bottom + 50.0);
    }

    #[test]
    fn test_procedural_normals_are_unit_and_upward() {
        let terrain = ProceduralTerrain::new(ProceduralParams::default());
        for i in 0..20 {
            let x = -150.0 + i as f32 * 15.0;
            let z = -150.0 + i as f32 * 25.0;
            let sample = terrain.sample_ground(x, z).expect("inside patch");
            assert!((sample.normal.norm() - 1.0).abs() < 1.0e-4);
            assert!(sample.normal.y > 0.5);
        }
    }
}
