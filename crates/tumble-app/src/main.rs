use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use clap::Parser;
use tumble_app::{app, cli, headless, hotreload};
use tumble_core::config::{self, TumbleConfig};

/// Répertoire des presets nommés.
const PRESET_DIR: &str = "config/presets";

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config, puis appliquer les overrides CLI
    let config_path = resolve_config_path(&cli)?;
    let mut config = load_or_default(&config_path)?;
    let overrides = cli.overrides();
    overrides.apply(&mut config);

    // 4. Mode headless : frames texte sur stdout, pas de terminal
    if cli.headless {
        return headless::run_stdout(&config, cli.frames.unwrap_or(1));
    }

    let config = Arc::new(ArcSwap::from_pointee(config));

    // 5. Lancer le hot-reload config (thread interne notify)
    let _watcher = if config_path.exists() {
        Some(hotreload::spawn_config_watcher(
            &config_path,
            &config,
            overrides,
        )?)
    } else {
        None
    };

    // 6. Initialiser le terminal ratatui
    let terminal = ratatui::init();
    let size = crossterm::terminal::size().unwrap_or((80, 24));

    // 7. Construire l'App
    let mut app_instance = app::App::new(config, size);
    app_instance.frame_limit = cli.frames;

    // 8. Boucle principale
    let result = app_instance.run(terminal);

    // 9. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    ratatui::restore();

    result
}

/// Preset takes priority over --config.
fn resolve_config_path(cli: &cli::Cli) -> Result<PathBuf> {
    match cli.preset {
        Some(ref name) => Ok(config::preset_path(Path::new(PRESET_DIR), name)?),
        None => Ok(cli.config.clone()),
    }
}

fn load_or_default(path: &Path) -> Result<TumbleConfig> {
    if path.exists() {
        config::load_config(path)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            path.display()
        );
        Ok(TumbleConfig::default())
    }
}
