use std::io::Write;
use std::time::Instant;

use log::{debug, trace};

use crate::Error;
use crate::canvas::{Canvas, Rgb};
use crate::effect::{Effect, EffectKind};
use crate::options::EffectConfig;
use crate::particle::Shape;

/// Owns the drawing surface and the active effects, and drives both the
/// per-frame simulation pass and the draw pass.
pub struct ParticleManager {
    canvas: Canvas,
    background: Rgb,
    effects: Vec<Effect>,
    epoch: Instant,
    /// Driver-toggled; the engine itself never draws diagnostics.
    pub debug: bool,
}

impl ParticleManager {
    pub fn new(width: usize, height: usize, background: Rgb) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            background,
            effects: Vec::new(),
            epoch: Instant::now(),
            debug: false,
        }
    }

    /// Milliseconds on the manager's monotonic clock.
    pub fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// Spawns a burst of `kind` at `position`. Unrecognized kind strings fail
    /// with [`Error::UnknownEffectType`].
    pub fn add_effect(
        &mut self,
        kind: &str,
        position: [f32; 2],
        cfg: &EffectConfig,
    ) -> Result<(), Error> {
        let kind: EffectKind = kind.parse()?;
        let [x, y] = position;
        let effect = Effect::new(kind, x, y, cfg, self.now_ms());
        debug!(
            "spawned {} with {} particles at ({x:.0}, {y:.0})",
            kind.name(),
            effect.particles.len()
        );
        self.effects.push(effect);
        Ok(())
    }

    /// Advances every particle by one tick and evicts the exhausted ones. A
    /// rule returning false discards its particle immediately; everything else
    /// lives until `age >= ttl`. Effects leave the list the moment they run
    /// out of particles.
    pub fn update(&mut self, delta_time: f32) {
        let now = self.now_ms();
        self.effects.retain_mut(|effect| {
            let kind = effect.kind;
            effect.particles.retain_mut(|particle| {
                if !kind.update_particle(particle, delta_time, now) {
                    return false;
                }
                particle.age(now) < particle.ttl
            });
            if effect.particles.is_empty() {
                trace!("{} exhausted", kind.name());
                return false;
            }
            true
        });
    }

    /// Rasterizes the active particles over the background fill. Paint state
    /// (color, alpha, glow) is computed per particle and passed by value, so
    /// it cannot leak between draws.
    pub fn render(&mut self) {
        let now = self.now_ms();
        self.canvas.clear(self.background);
        for effect in self.effects.iter().rev() {
            let glow_strength = effect.options.glow_strength;
            for p in effect.particles.iter().rev() {
                let alpha = p.alpha(now);
                let color = (p.r, p.g, p.b);
                let size = p.size.max(0.5);

                if glow_strength > 0.0 {
                    let blur = (size * glow_strength).round();
                    if blur > 0.0 {
                        self.canvas.add_glow(p.x, p.y, size + blur, color, alpha);
                    }
                }

                match p.shape {
                    Shape::Circle => self.canvas.fill_circle(p.x, p.y, size, color, alpha),
                    Shape::Square => self
                        .canvas
                        .fill_rotated_rect(p.x, p.y, size, size, p.angle, color, alpha),
                    Shape::Rect => self
                        .canvas
                        .fill_rotated_rect(p.x, p.y, size, size, p.angle, color, alpha),
                    Shape::Ribbon => self.canvas.fill_rotated_rect(
                        p.x,
                        p.y,
                        size * 1.5,
                        size,
                        p.angle,
                        color,
                        alpha,
                    ),
                    Shape::Star => self
                        .canvas
                        .fill_star(p.x, p.y, size * 1.6, size * 0.6, color, alpha),
                }
            }
        }
    }

    /// Drops every active effect and resets the surface to the background.
    pub fn clear(&mut self) {
        debug!("clearing {} effects", self.effects.len());
        self.effects.clear();
        self.canvas.clear(self.background);
    }

    /// Writes the current surface to `out` as truecolor half-block cells.
    pub fn present(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        self.canvas.present(out)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn particle_count(&self) -> usize {
        self.effects.iter().map(|e| e.particles.len()).sum()
    }
}
