use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tumble_core::config::{TumbleConfig, load_config};

use crate::cli::Overrides;

/// Lance un thread qui surveille le fichier config et met à jour l'ArcSwap.
///
/// Every reloaded config gets the command-line `overrides` layered on top
/// before it is published. The render loop picks it up between ticks.
///
/// Retourne le Watcher (doit rester vivant tant que l'app tourne).
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use arc_swap::ArcSwap;
/// use tumble_core::config::TumbleConfig;
/// use tumble_app::cli::Overrides;
/// use tumble_app::hotreload::spawn_config_watcher;
/// use std::path::Path;
///
/// let config = Arc::new(ArcSwap::from_pointee(TumbleConfig::default()));
/// let _watcher = spawn_config_watcher(Path::new("config/default.toml"), &config, Overrides::default());
/// ```
pub fn spawn_config_watcher(
    config_path: &Path,
    config: &Arc<ArcSwap<TumbleConfig>>,
    overrides: Overrides,
) -> Result<impl Watcher + use<>> {
    let config = Arc::clone(config);
    let path = config_path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res
            && matches!(event.kind, EventKind::Modify(_))
        {
            reload(&path, &config, &overrides);
        }
    })?;

    watcher.watch(config_path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Load `path`, apply `overrides` and publish. On error the old config stays.
///
/// Returns `true` when a new config was stored.
pub fn reload(path: &Path, config: &ArcSwap<TumbleConfig>, overrides: &Overrides) -> bool {
    match load_config(path) {
        Ok(mut new_config) => {
            overrides.apply(&mut new_config);
            config.store(Arc::new(new_config));
            log::info!("Config rechargée depuis {}", path.display());
            true
        }
        Err(e) => {
            // On garde l'ancienne config. Pas de panic.
            log::warn!("Erreur de rechargement config : {e:#}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_applies_file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tumble.toml");
        std::fs::write(&path, "[scene]\ncube_count = 5\npalette = \"xyz\"\n").unwrap();

        let config = ArcSwap::from_pointee(TumbleConfig::default());
        let overrides = Overrides {
            palette: Some("ab".into()),
            ..Overrides::default()
        };
        assert!(reload(&path, &config, &overrides));

        let current = config.load();
        assert_eq!(current.cube_count, 5);
        assert_eq!(current.palette, "ab");
    }

    #[test]
    fn broken_file_keeps_previous_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tumble.toml");
        std::fs::write(&path, "[scene\ncube_count = ").unwrap();

        let previous = TumbleConfig {
            cube_count: 7,
            ..TumbleConfig::default()
        };
        let config = ArcSwap::from_pointee(previous.clone());
        assert!(!reload(&path, &config, &Overrides::default()));
        assert_eq!(**config.load(), previous);
    }
}
