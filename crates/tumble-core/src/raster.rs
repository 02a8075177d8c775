use std::fmt;

use crate::vector::Vec3;

/// Projection scale: apparent size of one object unit at unit depth.
pub const K1: f32 = 40.0;

/// Distance added to every point's depth, keeping the scene in front of the eye.
pub const CUBE_DISTANCE: f32 = 100.0;

/// Glyph written to cells no surface reaches.
pub const BLANK: char = ' ';

/// Grille de sortie : caractères row-major, `width × height`.
///
/// Pré-allouée, réutilisée chaque tick. Its `Display` impl prints `height`
/// lines of `width` glyphs.
///
/// # Example
/// ```
/// use tumble_core::raster::CharGrid;
/// let mut grid = CharGrid::new(3, 2);
/// grid.set(1, 1, '#');
/// assert_eq!(grid.to_string(), "   \n # \n");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharGrid {
    /// Flat array of glyphs, row-major.
    pub cells: Vec<char>,
    /// Width in characters.
    pub width: u16,
    /// Height in characters.
    pub height: u16,
}

impl CharGrid {
    /// Crée une grille pré-allouée, remplie de [`BLANK`].
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![BLANK; usize::from(width) * usize::from(height)],
            width,
            height,
        }
    }

    /// A 0×0 grid, what an unconfigured engine hands out.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline(always)]
    pub fn set(&mut self, x: u16, y: u16, ch: char) {
        self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)] = ch;
    }

    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> char {
        self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    /// Rows as slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(usize::from(self.width).max(1))
    }

    /// Reset every cell to [`BLANK`].
    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }
}

impl fmt::Display for CharGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 0 {
            return Ok(());
        }
        for row in self.rows() {
            for &ch in row {
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Inverse-depth buffer: larger values are nearer, 0 means empty.
#[derive(Clone, Debug, Default)]
pub struct DepthBuffer {
    values: Vec<f32>,
}

impl DepthBuffer {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<f32> {
        self.values.get(idx).copied()
    }

    pub fn clear(&mut self) {
        self.values.fill(0.0);
    }
}

/// Screen-space position of a world point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// Column (may be off-grid).
    pub x: i64,
    /// Row (may be off-grid).
    pub y: i64,
    /// `1 / depth`.
    pub ooz: f32,
}

/// Perspective projection of `point + center` onto a `width × height` grid.
///
/// The vertical axis is flipped so that +y is up on screen.
///
/// # Example
/// ```
/// use tumble_core::raster::project;
/// use tumble_core::vector::Vec3;
/// let p = project(Vec3::ZERO, Vec3::ZERO, 160, 40);
/// assert_eq!((p.x, p.y), (80, 20));
/// assert!((p.ooz - 0.01).abs() < 1e-7);
/// ```
#[inline(always)]
#[must_use]
pub fn project(point: Vec3, center: Vec3, width: u16, height: u16) -> Projected {
    let final_z = point.z + center.z + CUBE_DISTANCE;
    let ooz = 1.0 / final_z;
    let xp = (f32::from(width) / 2.0 + K1 * ooz * (point.x + center.x)).floor();
    let yp = (f32::from(height) / 2.0 - K1 * ooz * (point.y + center.y)).floor();
    Projected {
        x: xp as i64,
        y: yp as i64,
        ooz,
    }
}

/// Rasterizer target: both per-tick buffers, borrowed exclusively for a sweep.
pub struct Target<'a> {
    pub depth: &'a mut DepthBuffer,
    pub grid: &'a mut CharGrid,
}

impl Target<'_> {
    /// Depth-test and write one projected glyph.
    ///
    /// The linear index `x + y·width` is bounds-checked as a whole against
    /// `[0, width·height)`, so a column past the right edge wraps onto the
    /// next row. Off-grid points are dropped. Returns `true` on write.
    #[inline(always)]
    pub fn plot(&mut self, p: Projected, ch: char) -> bool {
        let width = i64::from(self.grid.width);
        let len = self.grid.cells.len();
        // Saturating: a point at depth 0 projects to ±inf.
        let idx = p.x.saturating_add(p.y.saturating_mul(width));
        if idx < 0 || idx >= len as i64 {
            return false;
        }
        let idx = idx as usize;
        // Buffers de tailles différentes : hors du plus court, rien n'est écrit.
        let Some(depth) = self.depth.values.get_mut(idx) else {
            return false;
        };
        if p.ooz > *depth {
            *depth = p.ooz;
            self.grid.cells[idx] = ch;
            true
        } else {
            false
        }
    }

    /// Project then plot.
    #[inline(always)]
    pub fn rasterize(&mut self, point: Vec3, center: Vec3, ch: char) -> bool {
        let p = project(point, center, self.grid.width, self.grid.height);
        self.plot(p, ch)
    }
}
