use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u16,
        /// Height value.
        height: u16,
    },

    /// Named preset that has no file under `config/presets/`.
    #[error("Preset inconnu : {name}")]
    UnknownPreset {
        /// The preset name as given.
        name: String,
    },
}
