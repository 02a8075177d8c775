/// Scene, rasterizer and configuration for tumble.
///
/// This crate holds the whole software pipeline: rotation math, the cube
/// scene, face sampling, lighting, the depth-buffered rasterizer and the
/// per-tick engine. It performs no terminal I/O.

pub mod config;
pub mod engine;
pub mod error;
pub mod palette;
pub mod raster;
pub mod sampler;
pub mod scene;
pub mod traits;
pub mod vector;

pub use config::TumbleConfig;
pub use engine::TumbleEngine;
pub use error::CoreError;
pub use palette::Palette;
pub use raster::{CharGrid, DepthBuffer};
pub use vector::Vec3;

/// Re-exports pour accès par chemin sémantique.
pub mod grid {
    pub use crate::raster::{CharGrid, DepthBuffer};
}
