//! Short-lived, physically-animated particle bursts (explosion, confetti,
//! fireworks) rasterized onto a 2D pixel surface.
//!
//! The embedding driver owns the frame loop: it spawns bursts with
//! [`ParticleManager::add_effect`] and calls [`ParticleManager::update`] then
//! [`ParticleManager::render`] once per frame. The resulting [`Canvas`] can be
//! presented to a truecolor terminal with [`Canvas::present`].

use thiserror::Error;

pub mod canvas;
pub mod effect;
pub mod manager;
pub mod options;
pub mod particle;

pub use canvas::{Canvas, Rgb};
pub use effect::{Effect, EffectKind};
pub use manager::ParticleManager;
pub use options::{EffectConfig, EffectOptions};
pub use particle::{Particle, Shape};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown effect type: {0}")]
    UnknownEffectType(String),
}
