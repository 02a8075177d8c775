use crate::vector::Vec3;

/// 12 caractères — du plus sombre au plus lumineux.
pub const DEFAULT_PALETTE: &str = ".,-~:;=!*#$@";

/// Sampling step used with the built-in palette.
pub const DEFAULT_STEP: f32 = 0.5;

/// Finest sampling step, whatever the palette length.
pub const MIN_STEP: f32 = 0.1;

/// Light direction before normalization: from above, towards the viewer.
pub const LIGHT_SOURCE: Vec3 = Vec3::new(0.0, 1.0, -1.0);

/// Ordered glyph palette, dark → bright, never empty.
///
/// Also carries the surface sampling step, derived from the palette length:
/// more glyphs give finer sampling.
///
/// # Example
/// ```
/// use tumble_core::palette::Palette;
/// let p = Palette::new("ab");
/// assert_eq!(p.len(), 2);
/// assert_eq!(p.chars(), &['a', 'b']);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    chars: Vec<char>,
    step: f32,
}

impl Palette {
    /// Build a palette from text; empty text selects [`DEFAULT_PALETTE`].
    ///
    /// # Example
    /// ```
    /// use tumble_core::palette::{Palette, DEFAULT_PALETTE};
    /// assert_eq!(Palette::new(""), Palette::new(DEFAULT_PALETTE).with_default_step());
    /// ```
    #[must_use]
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Self::default();
        }
        let step = step_for_len(chars.len());
        Self { chars, step }
    }

    /// Same glyphs, with the step the built-in palette uses.
    #[must_use]
    pub fn with_default_step(mut self) -> Self {
        self.step = DEFAULT_STEP;
        self
    }

    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Object-space distance between two samples on a cube face.
    #[must_use]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Palette index for a luminance in `[-1, 1]`, clamped into range.
    ///
    /// # Example
    /// ```
    /// use tumble_core::palette::Palette;
    /// let p = Palette::new("0123456789");
    /// assert_eq!(p.index_for(-1.0), 0);
    /// assert_eq!(p.index_for(1.0), 9);
    /// assert_eq!(p.index_for(0.0), 4);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn index_for(&self, luminance: f32) -> usize {
        let last = self.chars.len() - 1;
        let idx = ((luminance + 1.0) * last as f32 / 2.0).floor();
        if idx <= 0.0 {
            0
        } else {
            (idx as usize).min(last)
        }
    }

    /// Glyph for a luminance in `[-1, 1]`.
    #[inline(always)]
    #[must_use]
    pub fn glyph(&self, luminance: f32) -> char {
        self.chars[self.index_for(luminance)]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            chars: DEFAULT_PALETTE.chars().collect(),
            step: DEFAULT_STEP,
        }
    }
}

/// `max(0.1, 1 / (len/5 + 1))`.
///
/// # Example
/// ```
/// use tumble_core::palette::step_for_len;
/// assert!((step_for_len(5) - 0.5).abs() < 1e-6);
/// assert!((step_for_len(60) - 0.1).abs() < 1e-6);
/// ```
#[must_use]
pub fn step_for_len(len: usize) -> f32 {
    (1.0 / (len as f32 / 5.0 + 1.0)).max(MIN_STEP)
}

/// Directional light, normalized once at construction.
#[derive(Clone, Copy, Debug)]
pub struct Light {
    direction: Vec3,
}

impl Light {
    /// Normalizes `source`. A zero vector yields a light that shades
    /// every face at luminance 0.
    #[must_use]
    pub fn new(source: Vec3) -> Self {
        Self {
            direction: source.normalized(),
        }
    }

    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Luminance in `[-1, 1]` for a unit normal.
    #[inline(always)]
    #[must_use]
    pub fn luminance(&self, normal: Vec3) -> f32 {
        normal.dot(self.direction)
    }

    /// Glyph for a rotated unit normal.
    #[inline(always)]
    #[must_use]
    pub fn shade(&self, normal: Vec3, palette: &Palette) -> char {
        palette.glyph(self.luminance(normal))
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(LIGHT_SOURCE)
    }
}
