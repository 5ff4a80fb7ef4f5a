use std::f32::consts::TAU;
use std::str::FromStr;

use crate::Error;
use crate::options::{EffectConfig, EffectOptions};
use crate::particle::{Particle, Shape, rand_range};

// Base amplitude of the confetti sway perturbation.
const SWAY_BASE: f32 = 0.02;

const CONFETTI_SHAPES: [Shape; 4] = [Shape::Square, Shape::Circle, Shape::Ribbon, Shape::Star];

/// The three built-in burst variants. Each kind carries its own per-particle
/// update rule; age-based eviction stays with the manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Explosion,
    Confetti,
    Fireworks,
}

impl EffectKind {
    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Explosion => "explosion",
            EffectKind::Confetti => "confetti",
            EffectKind::Fireworks => "fireworks",
        }
    }

    /// Advances one particle by one tick. Returns false to discard the
    /// particle immediately; the built-in rules always keep.
    pub fn update_particle(self, p: &mut Particle, delta_time: f32, now: f64) -> bool {
        match self {
            EffectKind::Explosion => {
                p.yv += p.gravity;
            }
            EffectKind::Confetti => {
                // Sinusoidal horizontal flutter, independent per particle.
                let t = now * 0.001;
                let frame_scale = (delta_time / 16.0).clamp(0.5, 2.0);
                let sway = (t * p.sway_freq as f64 + p.sway_phase as f64).sin() as f32;
                p.xv += sway * SWAY_BASE * p.sway * frame_scale;
                p.angle += p.angular_velocity;
                p.yv += p.gravity;
            }
            EffectKind::Fireworks => {
                p.yv += p.gravity;
                if p.gravity < 0.0 && !p.exploded {
                    if let Some(peak) = p.peak_y {
                        if p.y < peak {
                            // Past the peak: burst outward with a fresh velocity.
                            p.exploded = true;
                            let angle = fastrand::f32() * TAU;
                            let speed = rand_range(2.0, 6.0);
                            p.xv = angle.cos() * speed;
                            p.yv = angle.sin() * speed;
                        }
                    }
                }
            }
        }

        p.xv *= p.friction;
        p.yv *= p.friction;
        p.x += p.xv;
        p.y += p.yv;
        true
    }
}

impl FromStr for EffectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "explosion" => Ok(EffectKind::Explosion),
            "confetti" => Ok(EffectKind::Confetti),
            "fireworks" => Ok(EffectKind::Fireworks),
            other => Err(Error::UnknownEffectType(other.to_string())),
        }
    }
}

/// A named burst of particles sharing one spawn event, resolved options, and
/// update rule.
pub struct Effect {
    pub kind: EffectKind,
    pub options: EffectOptions,
    pub particles: Vec<Particle>,
}

impl Effect {
    pub fn new(kind: EffectKind, x: f32, y: f32, cfg: &EffectConfig, now: f64) -> Self {
        let options = EffectOptions::resolve(kind, cfg);
        let mut particles = Vec::with_capacity(options.particles_per_explosion);
        for _ in 0..options.particles_per_explosion {
            let mut p = Particle::new(x, y, &options, now);
            if kind == EffectKind::Confetti {
                p.shape = CONFETTI_SHAPES[fastrand::usize(0..CONFETTI_SHAPES.len())];
                p.angle = fastrand::f32() * TAU;
                p.angular_velocity = (fastrand::f32() - 0.5) * 0.2;
                // Independent amplitude, frequency and phase so pieces don't
                // move in lockstep.
                p.sway = 0.5 + fastrand::f32() * 1.5;
                p.sway_freq = 0.6 + fastrand::f32() * 1.6;
                p.sway_phase = fastrand::f32() * TAU;
            }
            particles.push(p);
        }
        Self {
            kind,
            options,
            particles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_particle() -> Particle {
        let mut p = Particle::new(0.0, 0.0, &EffectOptions::defaults(EffectKind::Explosion), 0.0);
        p.x = 10.0;
        p.y = 10.0;
        p.xv = 1.0;
        p.yv = 0.0;
        p.gravity = 0.5;
        p.friction = 0.9;
        p
    }

    #[test]
    fn kind_parses_known_names_only() {
        assert_eq!("explosion".parse::<EffectKind>(), Ok(EffectKind::Explosion));
        assert_eq!("confetti".parse::<EffectKind>(), Ok(EffectKind::Confetti));
        assert_eq!("fireworks".parse::<EffectKind>(), Ok(EffectKind::Fireworks));
        assert_eq!(
            "meteor".parse::<EffectKind>(),
            Err(Error::UnknownEffectType("meteor".to_string()))
        );
    }

    #[test]
    fn explosion_rule_applies_gravity_then_friction_then_integrates() {
        let mut p = still_particle();
        assert!(EffectKind::Explosion.update_particle(&mut p, 16.0, 0.0));
        assert!((p.xv - 0.9).abs() < 1e-6);
        assert!((p.yv - 0.45).abs() < 1e-6);
        assert!((p.x - 10.9).abs() < 1e-6);
        assert!((p.y - 10.45).abs() < 1e-6);
    }

    #[test]
    fn confetti_rule_spins_and_sways_within_bounds() {
        let mut p = still_particle();
        p.gravity = 0.0;
        p.friction = 1.0;
        p.xv = 0.0;
        p.angular_velocity = 0.05;
        p.sway = 2.0;
        let angle_before = p.angle;
        assert!(EffectKind::Confetti.update_particle(&mut p, 16.0, 2500.0));
        assert!((p.angle - angle_before - 0.05).abs() < 1e-6);
        // One tick of sway is bounded by base * amplitude * max frame scale.
        assert!(p.xv.abs() <= SWAY_BASE * 2.0 * 2.0 + 1e-6);
    }

    #[test]
    fn fireworks_rule_bursts_once_past_peak() {
        let mut p = still_particle();
        p.gravity = -0.05;
        p.friction = 1.0;
        p.xv = 0.0;
        p.yv = -1.0;
        p.peak_y = Some(9.0);
        p.y = 8.5; // already above the peak

        assert!(EffectKind::Fireworks.update_particle(&mut p, 16.0, 0.0));
        assert!(p.exploded);
        let speed = (p.xv * p.xv + p.yv * p.yv).sqrt();
        assert!((2.0..6.0).contains(&speed), "burst speed {speed}");
    }

    #[test]
    fn confetti_burst_assigns_shapes_and_flutter() {
        let effect = Effect::new(
            EffectKind::Confetti,
            0.0,
            0.0,
            &EffectConfig::default(),
            0.0,
        );
        assert_eq!(effect.particles.len(), 50);
        for p in &effect.particles {
            assert!(CONFETTI_SHAPES.contains(&p.shape));
            assert!((0.5..2.0).contains(&p.sway));
            assert!((0.6..2.2).contains(&p.sway_freq));
            assert!(p.angular_velocity.abs() <= 0.1);
        }
    }

    #[test]
    fn non_confetti_bursts_stay_circular() {
        let effect = Effect::new(
            EffectKind::Explosion,
            0.0,
            0.0,
            &EffectConfig::default(),
            0.0,
        );
        assert_eq!(effect.particles.len(), 30);
        assert!(effect.particles.iter().all(|p| p.shape == Shape::Circle));
    }
}
