use crate::config::TumbleConfig;
use crate::palette::{Light, Palette};
use crate::raster::{CharGrid, DepthBuffer, Target};
use crate::sampler::samples;
use crate::scene::{Cube, CubeSpec, Scene, SceneRng};
use crate::traits::FrameSink;
use crate::vector::Rotation;

/// Engine lifecycle.
///
/// # Example
/// ```
/// use tumble_core::engine::{EngineState, TumbleEngine};
/// let engine = TumbleEngine::default();
/// assert_eq!(engine.state(), EngineState::Uninitialized);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// No usable grid size yet: ticks render nothing.
    Uninitialized,
    /// Buffers and cubes allocated.
    Ready,
}

/// Frame driver: owns the scene and both per-tick buffers.
///
/// Hosts call [`TumbleEngine::tick`] once per refresh. Configuration
/// changes go through [`configure`](Self::configure) and
/// [`set_palette`](Self::set_palette) between ticks.
///
/// # Example
/// ```
/// use tumble_core::engine::TumbleEngine;
/// let mut engine = TumbleEngine::default();
/// engine.configure(80, 24, 1);
/// let frame = engine.tick();
/// assert_eq!(frame.cells.len(), 80 * 24);
/// ```
pub struct TumbleEngine {
    state: EngineState,
    width: u16,
    height: u16,
    cube_count: usize,
    spec: CubeSpec,
    seed: Option<u64>,
    rng: SceneRng,
    palette: Palette,
    light: Light,
    scene: Scene,
    depth: DepthBuffer,
    grid: CharGrid,
    frame_count: u64,
}

impl TumbleEngine {
    /// Unconfigured engine. `seed` makes every scene reset reproducible.
    #[must_use]
    pub fn new(spec: CubeSpec, palette: Palette, seed: Option<u64>) -> Self {
        Self {
            state: EngineState::Uninitialized,
            width: 0,
            height: 0,
            cube_count: 1,
            spec,
            seed,
            rng: seed.map_or_else(SceneRng::from_entropy, SceneRng::seeded),
            palette,
            light: Light::default(),
            scene: Scene::default(),
            depth: DepthBuffer::default(),
            grid: CharGrid::empty(),
            frame_count: 0,
        }
    }

    /// Engine set up from a config; `available` sizes axes left at 0.
    ///
    /// # Example
    /// ```
    /// use tumble_core::config::TumbleConfig;
    /// use tumble_core::engine::{EngineState, TumbleEngine};
    /// let engine = TumbleEngine::from_config(&TumbleConfig::default(), (120, 30));
    /// assert_eq!(engine.state(), EngineState::Ready);
    /// assert_eq!(engine.size(), (120, 30));
    /// ```
    #[must_use]
    pub fn from_config(config: &TumbleConfig, available: (u16, u16)) -> Self {
        let mut engine = Self::new(config.cube_spec(), Palette::new(&config.palette), config.seed);
        let (w, h) = config.grid_size(available);
        engine.configure(w, h, config.cube_count);
        engine
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn cube_count(&self) -> usize {
        self.cube_count
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Ticks rendered since construction.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Apply a grid size and cube count.
    ///
    /// Any change (or a first valid size) reallocates both buffers and
    /// rebuilds the scene. A zero dimension drops everything and leaves the
    /// engine [`EngineState::Uninitialized`].
    pub fn configure(&mut self, width: u16, height: u16, cube_count: usize) {
        let unchanged = self.state == EngineState::Ready
            && self.width == width
            && self.height == height
            && self.cube_count == cube_count;
        if unchanged {
            return;
        }

        self.width = width;
        self.height = height;
        self.cube_count = cube_count;

        if width == 0 || height == 0 {
            log::debug!("Grille {width}×{height} invalide, moteur non initialisé");
            self.state = EngineState::Uninitialized;
            self.scene = Scene::default();
            self.depth = DepthBuffer::default();
            self.grid = CharGrid::empty();
            return;
        }

        self.reset();
    }

    /// Rebuild cubes and buffers at the current size. No-op while uninitialized.
    pub fn reset(&mut self) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        if let Some(seed) = self.seed {
            self.rng = SceneRng::seeded(seed);
        }
        let len = usize::from(self.width) * usize::from(self.height);
        self.scene = Scene::new(self.cube_count, &self.spec, &mut self.rng);
        self.depth = DepthBuffer::new(len);
        self.grid = CharGrid::new(self.width, self.height);
        self.state = EngineState::Ready;
        log::debug!(
            "Réallocation : grille {}×{}, {} cube(s)",
            self.width,
            self.height,
            self.cube_count
        );
    }

    /// Replace the palette (and with it the sampling step). Buffers are kept.
    pub fn set_palette(&mut self, text: &str) {
        let palette = Palette::new(text);
        if palette != self.palette {
            log::debug!(
                "Palette : {} glyphe(s), pas {:.3}",
                palette.len(),
                palette.step()
            );
            self.palette = palette;
        }
    }

    /// Change cube shape or spin; rebuilds the scene when it differs.
    pub fn set_cube_spec(&mut self, spec: CubeSpec) {
        if spec != self.spec {
            self.spec = spec;
            self.reset();
        }
    }

    /// Change the orientation seed; rebuilds the scene when it differs.
    pub fn set_seed(&mut self, seed: Option<u64>) {
        if seed != self.seed {
            self.seed = seed;
            if seed.is_none() {
                self.rng = SceneRng::from_entropy();
            }
            self.reset();
        }
    }

    /// Apply every engine-relevant field of `config`.
    pub fn apply_config(&mut self, config: &TumbleConfig, available: (u16, u16)) {
        self.set_palette(&config.palette);
        self.set_seed(config.seed);
        self.set_cube_spec(config.cube_spec());
        let (w, h) = config.grid_size(available);
        self.configure(w, h, config.cube_count);
    }

    /// One simulation + render step; returns a snapshot of the frame.
    ///
    /// While uninitialized, returns an empty 0×0 grid.
    pub fn tick(&mut self) -> CharGrid {
        if self.state != EngineState::Ready {
            return CharGrid::empty();
        }
        if self.grid.width != self.width || self.grid.height != self.height {
            self.reset();
        }

        self.depth.clear();
        self.grid.clear();

        let mut target = Target {
            depth: &mut self.depth,
            grid: &mut self.grid,
        };
        for cube in self.scene.cubes_mut() {
            cube.advance();
            render_cube(cube, &self.palette, &self.light, &mut target);
        }

        self.frame_count += 1;
        self.grid.clone()
    }

    /// [`tick`](Self::tick), delivering the frame to `sink`.
    pub fn tick_into<S: FrameSink + ?Sized>(&mut self, sink: &mut S) {
        let frame = self.tick();
        sink.deliver(frame);
    }
}

impl Default for TumbleEngine {
    fn default() -> Self {
        Self::new(CubeSpec::default(), Palette::default(), None)
    }
}

/// Sample, rotate, shade and rasterize every surface point of `cube`.
fn render_cube(cube: &Cube, palette: &Palette, light: &Light, target: &mut Target<'_>) {
    let rotation = Rotation::new(cube.rotation);
    for sample in samples(cube, palette.step()) {
        let point = rotation.apply(sample.point);
        let normal = rotation.apply(sample.normal);
        let ch = light.shade(normal, palette);
        target.rasterize(point, cube.center, ch);
    }
}
