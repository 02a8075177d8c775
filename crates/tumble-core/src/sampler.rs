use crate::scene::Cube;
use crate::vector::Vec3;

/// One of the six faces of an axis-aligned cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl Face {
    /// Toutes les faces, dans l'ordre de balayage.
    pub const ALL: [Self; 6] = [
        Self::Front,
        Self::Back,
        Self::Left,
        Self::Right,
        Self::Top,
        Self::Bottom,
    ];

    /// Constant outward normal in object space.
    #[must_use]
    pub const fn normal(self) -> Vec3 {
        match self {
            Self::Front => Vec3::new(0.0, 0.0, -1.0),
            Self::Back => Vec3::new(0.0, 0.0, 1.0),
            Self::Left => Vec3::new(-1.0, 0.0, 0.0),
            Self::Right => Vec3::new(1.0, 0.0, 0.0),
            Self::Top => Vec3::new(0.0, -1.0, 0.0),
            Self::Bottom => Vec3::new(0.0, 1.0, 0.0),
        }
    }

    /// Point on this face for free coordinates `(u, v)`.
    ///
    /// Front/back: `u = x, v = y`. Left/right: `u = z, v = y`.
    /// Top/bottom: `u = x, v = z`.
    #[inline(always)]
    #[must_use]
    pub fn point(self, half: f32, u: f32, v: f32) -> Vec3 {
        match self {
            Self::Front => Vec3::new(u, v, -half),
            Self::Back => Vec3::new(u, v, half),
            Self::Left => Vec3::new(-half, v, u),
            Self::Right => Vec3::new(half, v, u),
            Self::Top => Vec3::new(u, -half, v),
            Self::Bottom => Vec3::new(u, half, v),
        }
    }
}

/// Opposite faces share a sampling grid and are visited in lockstep.
const FACE_PAIRS: [(Face, Face); 3] = [
    (Face::Front, Face::Back),
    (Face::Left, Face::Right),
    (Face::Top, Face::Bottom),
];

/// Surface sample: object-space point and its outward normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub point: Vec3,
    pub normal: Vec3,
}

/// Number of grid positions covering `[-half, +half]` inclusive.
///
/// A small tolerance keeps the `+half` edge when `size / step` is an
/// integer that floating point lands just under.
#[must_use]
pub fn steps_per_axis(size: f32, step: f32) -> usize {
    if !(size > 0.0 && step > 0.0) {
        return 1;
    }
    ((size / step) + 1e-3).floor() as usize + 1
}

/// Lazy iterator over every sample of a cube's six faces.
///
/// Cloning yields an independent iterator from the same position, so a
/// fresh [`samples`] call (or a clone taken up front) restarts the sweep.
#[derive(Clone, Debug)]
pub struct FaceSamples {
    half: f32,
    step: f32,
    n: usize,
    pair: usize,
    i: usize,
    j: usize,
    second: bool,
}

/// Sample `cube`'s surface every `step` units.
///
/// # Example
/// ```
/// use tumble_core::sampler::samples;
/// use tumble_core::scene::Cube;
/// use tumble_core::vector::Vec3;
/// let cube = Cube::new(2.0, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO);
/// // 3 positions per axis, 9 per face, 6 faces.
/// assert_eq!(samples(&cube, 1.0).count(), 54);
/// ```
#[must_use]
pub fn samples(cube: &Cube, step: f32) -> FaceSamples {
    FaceSamples {
        half: cube.half_size(),
        step,
        n: steps_per_axis(cube.size, step),
        pair: 0,
        i: 0,
        j: 0,
        second: false,
    }
}

impl FaceSamples {
    #[inline(always)]
    fn coord(&self, k: usize) -> f32 {
        -self.half + k as f32 * self.step
    }

    fn remaining(&self) -> usize {
        if self.pair >= FACE_PAIRS.len() {
            return 0;
        }
        let per_pair = self.n * self.n * 2;
        let done_in_pair = (self.i * self.n + self.j) * 2 + usize::from(self.second);
        (FACE_PAIRS.len() - self.pair) * per_pair - done_in_pair
    }
}

impl Iterator for FaceSamples {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        let (a, b) = *FACE_PAIRS.get(self.pair)?;
        let face = if self.second { b } else { a };
        let sample = Sample {
            point: face.point(self.half, self.coord(self.i), self.coord(self.j)),
            normal: face.normal(),
        };

        if self.second {
            self.second = false;
            self.j += 1;
            if self.j == self.n {
                self.j = 0;
                self.i += 1;
                if self.i == self.n {
                    self.i = 0;
                    self.pair += 1;
                }
            }
        } else {
            self.second = true;
        }
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for FaceSamples {}
