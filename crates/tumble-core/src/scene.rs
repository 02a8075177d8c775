use std::f32::consts::TAU;

use rand::SeedableRng;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;

use crate::vector::Vec3;

/// Edge length of a freshly created cube, in object units.
pub const DEFAULT_CUBE_SIZE: f32 = 25.0;

/// Angular velocity of a freshly created cube, radians per tick on each axis.
pub const DEFAULT_ROTATION_SPEED: f32 = 0.01;

/// Rigid, axis-aligned cube spinning about its center.
///
/// # Example
/// ```
/// use tumble_core::scene::Cube;
/// use tumble_core::vector::Vec3;
/// let mut cube = Cube::new(25.0, Vec3::ZERO, Vec3::ZERO, Vec3::splat(0.5));
/// cube.advance();
/// assert_eq!(cube.rotation, Vec3::splat(0.5));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Cube {
    /// Edge length, strictly positive.
    pub size: f32,
    /// World-space center.
    pub center: Vec3,
    /// Euler angles in radians. Unbounded; the trig functions wrap it.
    pub rotation: Vec3,
    /// Radians added to `rotation` every tick.
    pub rotation_speed: Vec3,
}

impl Cube {
    #[must_use]
    pub fn new(size: f32, center: Vec3, rotation: Vec3, rotation_speed: Vec3) -> Self {
        Self {
            size,
            center,
            rotation,
            rotation_speed,
        }
    }

    /// Half the edge length: faces sit at `±half_size()` on their pinned axis.
    #[must_use]
    pub fn half_size(&self) -> f32 {
        self.size / 2.0
    }

    /// One tick of spin.
    #[inline]
    pub fn advance(&mut self) {
        self.rotation += self.rotation_speed;
    }
}

/// Parameters shared by every cube of a scene.
///
/// # Example
/// ```
/// use tumble_core::scene::CubeSpec;
/// let spec = CubeSpec::default();
/// assert_eq!(spec.size, 25.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubeSpec {
    pub size: f32,
    pub center: Vec3,
    pub rotation_speed: Vec3,
}

impl Default for CubeSpec {
    fn default() -> Self {
        Self {
            size: DEFAULT_CUBE_SIZE,
            center: Vec3::ZERO,
            rotation_speed: Vec3::splat(DEFAULT_ROTATION_SPEED),
        }
    }
}

/// Source of initial orientations.
///
/// Seeded scenes are reproducible: the same seed always yields the same
/// starting angles, which is what tests and headless runs rely on.
pub struct SceneRng {
    rng: StdRng,
}

impl SceneRng {
    /// Reproducible generator.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the thread-local entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }

    /// Uniform angle in `[0, 2π)`.
    pub fn angle(&mut self) -> f32 {
        let unit: f32 = StandardUniform.sample(&mut self.rng);
        // `unit * TAU` peut arrondir à TAU pour unit proche de 1.
        let a = unit * TAU;
        if a >= TAU { 0.0 } else { a }
    }

    fn orientation(&mut self) -> Vec3 {
        Vec3::new(self.angle(), self.angle(), self.angle())
    }
}

/// All cubes of the current run. Exclusively owned by the engine.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    cubes: Vec<Cube>,
}

impl Scene {
    /// `count` cubes built from `spec`, each with its own random orientation.
    ///
    /// # Example
    /// ```
    /// use tumble_core::scene::{CubeSpec, Scene, SceneRng};
    /// let scene = Scene::new(3, &CubeSpec::default(), &mut SceneRng::seeded(7));
    /// assert_eq!(scene.cubes().len(), 3);
    /// ```
    #[must_use]
    pub fn new(count: usize, spec: &CubeSpec, rng: &mut SceneRng) -> Self {
        let cubes = (0..count)
            .map(|_| Cube::new(spec.size, spec.center, rng.orientation(), spec.rotation_speed))
            .collect();
        Self { cubes }
    }

    #[must_use]
    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    /// Mutable access, e.g. to pin an orientation in tests or demos.
    pub fn cubes_mut(&mut self) -> &mut [Cube] {
        &mut self.cubes
    }

    /// Advance every cube by one tick.
    pub fn advance(&mut self) {
        for cube in &mut self.cubes {
            cube.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_cubes_follow_spec() {
        let spec = CubeSpec::default();
        let scene = Scene::new(4, &spec, &mut SceneRng::seeded(1));
        assert_eq!(scene.cubes().len(), 4);
        for cube in scene.cubes() {
            assert_eq!(cube.size, DEFAULT_CUBE_SIZE);
            assert_eq!(cube.center, Vec3::ZERO);
            assert_eq!(cube.rotation_speed, Vec3::splat(DEFAULT_ROTATION_SPEED));
            for a in [cube.rotation.x, cube.rotation.y, cube.rotation.z] {
                assert!((0.0..TAU).contains(&a), "angle hors de [0, 2π) : {a}");
            }
        }
    }

    #[test]
    fn orientations_are_independent() {
        let scene = Scene::new(2, &CubeSpec::default(), &mut SceneRng::seeded(99));
        assert_ne!(scene.cubes()[0].rotation, scene.cubes()[1].rotation);
    }

    #[test]
    fn same_seed_same_scene() {
        let spec = CubeSpec::default();
        let a = Scene::new(3, &spec, &mut SceneRng::seeded(42));
        let b = Scene::new(3, &spec, &mut SceneRng::seeded(42));
        assert_eq!(a.cubes(), b.cubes());
    }

    #[test]
    fn advance_adds_speed_without_wrapping() {
        let mut cube = Cube::new(10.0, Vec3::ZERO, Vec3::new(6.0, 0.0, -1.0), Vec3::splat(0.5));
        for _ in 0..4 {
            cube.advance();
        }
        assert!((cube.rotation.x - 8.0).abs() < 1e-5);
        assert!((cube.rotation.y - 2.0).abs() < 1e-5);
        assert!((cube.rotation.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_scene_advances() {
        let mut scene = Scene::new(0, &CubeSpec::default(), &mut SceneRng::seeded(0));
        scene.advance();
        assert!(scene.cubes().is_empty());
    }
}
