use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::palette::DEFAULT_PALETTE;
use crate::scene::{CubeSpec, DEFAULT_CUBE_SIZE, DEFAULT_ROTATION_SPEED};
use crate::vector::Vec3;

/// Configuration complète, hot-rechargeable.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use tumble_core::config::TumbleConfig;
/// let config = TumbleConfig::default();
/// assert_eq!(config.cube_count, 1);
/// assert_eq!(config.target_fps, 60);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TumbleConfig {
    // === Scène ===
    /// Grid width in cells. 0 = follow the terminal.
    pub width: u16,
    /// Grid height in cells. 0 = follow the terminal.
    pub height: u16,
    /// Number of independent cubes.
    pub cube_count: usize,
    /// Glyphs from dark to bright. Empty selects the built-in palette.
    pub palette: String,
    /// Cube edge length in object units.
    pub cube_size: f32,
    /// Radians per tick on X, Y, Z.
    pub rotation_speed: [f32; 3],
    /// Seed for initial orientations. None = random each reset.
    pub seed: Option<u64>,

    // === Affichage ===
    /// Ticks per second.
    pub target_fps: u32,
    /// Glyph foreground color (RGB).
    pub color: [u8; 3],
    /// Use `color`; otherwise the terminal default.
    pub color_enabled: bool,
    /// One-line status bar under the canvas.
    pub show_status: bool,
}

impl Default for TumbleConfig {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cube_count: 1,
            palette: DEFAULT_PALETTE.to_string(),
            cube_size: DEFAULT_CUBE_SIZE,
            rotation_speed: [DEFAULT_ROTATION_SPEED; 3],
            seed: None,
            target_fps: 60,
            color: [120, 220, 160],
            color_enabled: true,
            show_status: true,
        }
    }
}

impl TumbleConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.cube_count = self.cube_count.clamp(1, 64);
        self.cube_size = self.cube_size.clamp(1.0, 80.0);
        for s in &mut self.rotation_speed {
            *s = s.clamp(-1.0, 1.0);
        }
        self.target_fps = self.target_fps.clamp(1, 240);
    }

    /// Reject values `clamp_all` cannot repair.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] for non-finite cube size or rotation speed.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.cube_size.is_finite() {
            return Err(CoreError::Config(format!(
                "cube_size doit être fini (reçu {})",
                self.cube_size
            )));
        }
        if let Some(s) = self.rotation_speed.iter().find(|s| !s.is_finite()) {
            return Err(CoreError::Config(format!(
                "rotation_speed doit être fini (reçu {s})"
            )));
        }
        Ok(())
    }

    /// Shape shared by every cube of the scene.
    ///
    /// # Example
    /// ```
    /// use tumble_core::config::TumbleConfig;
    /// let spec = TumbleConfig::default().cube_spec();
    /// assert_eq!(spec.size, 25.0);
    /// ```
    #[must_use]
    pub fn cube_spec(&self) -> CubeSpec {
        CubeSpec {
            size: self.cube_size,
            center: Vec3::ZERO,
            rotation_speed: Vec3::from(self.rotation_speed),
        }
    }

    /// Grid size: fixed dimensions win over the available area.
    ///
    /// Each axis falls back to `available` independently when set to 0.
    ///
    /// # Example
    /// ```
    /// use tumble_core::config::TumbleConfig;
    /// let mut config = TumbleConfig::default();
    /// assert_eq!(config.grid_size((100, 30)), (100, 30));
    /// config.width = 160;
    /// assert_eq!(config.grid_size((100, 30)), (160, 30));
    /// ```
    #[must_use]
    pub fn grid_size(&self, available: (u16, u16)) -> (u16, u16) {
        let w = if self.width > 0 { self.width } else { available.0 };
        let h = if self.height > 0 { self.height } else { available.1 };
        (w, h)
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    scene: Option<SceneSection>,
    display: Option<DisplaySection>,
}

/// Scene section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct SceneSection {
    width: Option<u16>,
    height: Option<u16>,
    cube_count: Option<usize>,
    palette: Option<String>,
    cube_size: Option<f32>,
    rotation_speed: Option<[f32; 3]>,
    seed: Option<u64>,
}

/// Display section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct DisplaySection {
    target_fps: Option<u32>,
    color: Option<[u8; 3]>,
    color_enabled: Option<bool>,
    show_status: Option<bool>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for this layout, or if a
/// value cannot be repaired by clamping.
///
/// # Example
/// ```
/// use tumble_core::config::parse_config;
/// let config = parse_config("[scene]\ncube_count = 3\npalette = \"ab\"\n").unwrap();
/// assert_eq!(config.cube_count, 3);
/// assert_eq!(config.palette, "ab");
/// ```
pub fn parse_config(text: &str) -> Result<TumbleConfig> {
    let file: ConfigFile = toml::from_str(text).context("Erreur de parsing TOML")?;
    let mut config = TumbleConfig::default();

    if let Some(s) = file.scene {
        if let Some(v) = s.width {
            config.width = v;
        }
        if let Some(v) = s.height {
            config.height = v;
        }
        if let Some(v) = s.cube_count {
            config.cube_count = v;
        }
        if let Some(v) = s.palette {
            config.palette = v;
        }
        if let Some(v) = s.cube_size {
            config.cube_size = v;
        }
        if let Some(v) = s.rotation_speed {
            config.rotation_speed = v;
        }
        if s.seed.is_some() {
            config.seed = s.seed;
        }
    }

    if let Some(d) = file.display {
        if let Some(v) = d.target_fps {
            config.target_fps = v;
        }
        if let Some(v) = d.color {
            config.color = v;
        }
        if let Some(v) = d.color_enabled {
            config.color_enabled = v;
        }
        if let Some(v) = d.show_status {
            config.show_status = v;
        }
    }

    config.validate()?;
    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use tumble_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<TumbleConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Config invalide : {}", path.display()))
}

/// Path of preset `name` inside `dir`.
///
/// # Errors
/// Returns [`CoreError::UnknownPreset`] when `dir/name.toml` does not exist.
pub fn preset_path(dir: &Path, name: &str) -> Result<PathBuf, CoreError> {
    let path = dir.join(format!("{name}.toml"));
    if path.is_file() {
        Ok(path)
    } else {
        Err(CoreError::UnknownPreset {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, TumbleConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = parse_config(
            "[scene]\nwidth = 160\nheight = 40\n\n[display]\nshow_status = false\n",
        )
        .unwrap();
        assert_eq!((config.width, config.height), (160, 40));
        assert!(!config.show_status);
        assert_eq!(config.cube_count, 1);
        assert_eq!(config.palette, DEFAULT_PALETTE);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = parse_config(
            "[scene]\ncube_count = 0\ncube_size = 500.0\nrotation_speed = [5.0, -5.0, 0.02]\n\n[display]\ntarget_fps = 0\n",
        )
        .unwrap();
        assert_eq!(config.cube_count, 1);
        assert!((config.cube_size - 80.0).abs() < f32::EPSILON);
        assert_eq!(config.rotation_speed, [1.0, -1.0, 0.02]);
        assert_eq!(config.target_fps, 1);
    }

    #[test]
    fn non_finite_speed_is_rejected() {
        let err = parse_config("[scene]\nrotation_speed = [nan, 0.0, 0.0]\n").unwrap_err();
        assert!(err.to_string().contains("rotation_speed"), "{err}");
    }

    #[test]
    fn unknown_field_type_is_an_error() {
        assert!(parse_config("[scene]\ncube_count = \"many\"\n").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scene]\nseed = 42\npalette = \"\"").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.seed, Some(42));
        assert!(config.palette.is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/tumble.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/tumble.toml"));
    }

    #[test]
    fn preset_lookup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("swarm.toml"), "[scene]\ncube_count = 8\n").unwrap();
        assert!(preset_path(dir.path(), "swarm").is_ok());
        assert!(matches!(
            preset_path(dir.path(), "nope"),
            Err(CoreError::UnknownPreset { .. })
        ));
    }

    #[test]
    fn shipped_configs_parse() {
        let default = parse_config(include_str!("../../../config/default.toml")).unwrap();
        assert_eq!(default, TumbleConfig::default());

        let reference = parse_config(include_str!("../../../config/presets/reference.toml")).unwrap();
        assert_eq!((reference.width, reference.height), (160, 40));

        let blocks = parse_config(include_str!("../../../config/presets/blocks.toml")).unwrap();
        assert_eq!(blocks.palette.chars().count(), 5);

        let dense = parse_config(include_str!("../../../config/presets/dense.toml")).unwrap();
        assert_eq!(dense.palette.chars().count(), 69);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = TumbleConfig {
            seed: Some(7),
            ..TumbleConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        let back: TumbleConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
