use std::path::PathBuf;

use clap::Parser;
use tumble_core::config::TumbleConfig;

/// tumble — Rotating ASCII cubes in the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Charger un preset nommé depuis config/presets/ (ignore --config).
    #[arg(long)]
    pub preset: Option<String>,

    /// Nombre de cubes.
    #[arg(long)]
    pub cubes: Option<usize>,

    /// Palette, du plus sombre au plus clair. Vide = palette par défaut.
    #[arg(long)]
    pub palette: Option<String>,

    /// Taille fixe de la grille, ex. 160x40. Défaut : taille du terminal.
    #[arg(long, value_parser = parse_size)]
    pub size: Option<(u16, u16)>,

    /// Graine des orientations initiales (rendu reproductible).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Ticks par seconde.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Désactiver la couleur.
    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    /// Arrêter après N ticks.
    #[arg(long)]
    pub frames: Option<u64>,

    /// Écrire les frames en texte brut sur stdout au lieu du terminal plein écran.
    /// Requiert --size (ou width/height dans la config).
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// CLI values that take precedence over the config file.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            cubes: self.cubes,
            palette: self.palette.clone(),
            size: self.size,
            seed: self.seed,
            fps: self.fps,
            no_color: self.no_color,
        }
    }
}

/// Command-line values layered over every loaded config, including
/// hot-reloaded ones.
///
/// # Example
/// ```
/// use tumble_app::cli::Overrides;
/// use tumble_core::config::TumbleConfig;
/// let overrides = Overrides { cubes: Some(3), ..Overrides::default() };
/// let mut config = TumbleConfig::default();
/// overrides.apply(&mut config);
/// assert_eq!(config.cube_count, 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub cubes: Option<usize>,
    pub palette: Option<String>,
    pub size: Option<(u16, u16)>,
    pub seed: Option<u64>,
    pub fps: Option<u32>,
    pub no_color: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut TumbleConfig) {
        if let Some(n) = self.cubes {
            config.cube_count = n;
        }
        if let Some(ref p) = self.palette {
            config.palette.clone_from(p);
        }
        if let Some((w, h)) = self.size {
            config.width = w;
            config.height = h;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(fps) = self.fps {
            config.target_fps = fps;
        }
        if self.no_color {
            config.color_enabled = false;
        }
        config.clamp_all();
    }
}

/// Parse `WIDTHxHEIGHT`.
///
/// # Errors
/// Returns a message when the text is not two positive integers joined by `x`.
///
/// # Example
/// ```
/// use tumble_app::cli::parse_size;
/// assert_eq!(parse_size("160x40"), Ok((160, 40)));
/// assert!(parse_size("160").is_err());
/// ```
pub fn parse_size(s: &str) -> Result<(u16, u16), String> {
    let (w, h) = s
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| format!("format attendu LARGEURxHAUTEUR, reçu '{s}'"))?;
    let w: u16 = w.trim().parse().map_err(|e| format!("largeur '{w}' : {e}"))?;
    let h: u16 = h.trim().parse().map_err(|e| format!("hauteur '{h}' : {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("dimensions nulles : {w}x{h}"));
    }
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("80X24"), Ok((80, 24)));
        assert_eq!(parse_size(" 200 x 50 "), Ok((200, 50)));
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("axb").is_err());
        assert!(parse_size("70000x10").is_err());
    }

    #[test]
    fn cli_parses_overrides() {
        let cli = Cli::try_parse_from([
            "tumble",
            "--cubes",
            "4",
            "--palette",
            "ab",
            "--size",
            "160x40",
            "--seed",
            "9",
            "--no-color",
        ])
        .unwrap();
        let mut config = TumbleConfig::default();
        cli.overrides().apply(&mut config);
        assert_eq!(config.cube_count, 4);
        assert_eq!(config.palette, "ab");
        assert_eq!((config.width, config.height), (160, 40));
        assert_eq!(config.seed, Some(9));
        assert!(!config.color_enabled);
    }

    #[test]
    fn empty_palette_override_is_kept() {
        let cli = Cli::try_parse_from(["tumble", "--palette", ""]).unwrap();
        let mut config = TumbleConfig::default();
        cli.overrides().apply(&mut config);
        assert!(config.palette.is_empty());
    }

    #[test]
    fn overrides_are_clamped() {
        let overrides = Overrides {
            cubes: Some(0),
            fps: Some(10_000),
            ..Overrides::default()
        };
        let mut config = TumbleConfig::default();
        overrides.apply(&mut config);
        assert_eq!(config.cube_count, 1);
        assert_eq!(config.target_fps, 240);
    }
}
