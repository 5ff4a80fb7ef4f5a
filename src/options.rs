use crate::effect::EffectKind;

/// Fully resolved per-effect options: variant defaults overlaid with whatever
/// the caller supplied in an [`EffectConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectOptions {
    pub particles_per_explosion: usize,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub jitter: f32,
    pub friction_min: f32,
    pub friction_max: f32,
    pub gravity: f32,
    /// Explicit base lifetime; overrides the min/max range when set.
    pub lifetime_ms: Option<f32>,
    pub lifetime_min_ms: f32,
    pub lifetime_max_ms: f32,
    pub lifetime_jitter: f32,
    /// 0 disables glow entirely.
    pub glow_strength: f32,
    pub r_min: u8,
    pub r_max: u8,
    pub g_min: u8,
    pub g_max: u8,
    pub b_min: u8,
    pub b_max: u8,
}

/// Caller-side overrides for [`EffectOptions`]; unset fields fall back to the
/// effect variant's defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectConfig {
    pub particles_per_explosion: Option<usize>,
    pub particles_min_speed: Option<f32>,
    pub particles_max_speed: Option<f32>,
    pub particles_min_size: Option<f32>,
    pub particles_max_size: Option<f32>,
    pub jitter: Option<f32>,
    pub friction_min: Option<f32>,
    pub friction_max: Option<f32>,
    pub gravity: Option<f32>,
    pub lifetime_ms: Option<f32>,
    pub lifetime_min_ms: Option<f32>,
    pub lifetime_max_ms: Option<f32>,
    pub lifetime_jitter: Option<f32>,
    pub glow_strength: Option<f32>,
    pub r_min: Option<u8>,
    pub r_max: Option<u8>,
    pub g_min: Option<u8>,
    pub g_max: Option<u8>,
    pub b_min: Option<u8>,
    pub b_max: Option<u8>,
}

impl EffectOptions {
    pub fn defaults(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Explosion => Self {
                particles_per_explosion: 30,
                min_speed: 3.0,
                max_speed: 6.0,
                min_size: 1.0,
                max_size: 6.0,
                jitter: 1.0,
                friction_min: 0.96,
                friction_max: 0.995,
                gravity: 0.02,
                lifetime_ms: None,
                lifetime_min_ms: 600.0,
                lifetime_max_ms: 1400.0,
                lifetime_jitter: 0.5,
                glow_strength: 0.0,
                r_min: 113,
                r_max: 222,
                g_min: 0,
                g_max: 100,
                b_min: 105,
                b_max: 255,
            },
            EffectKind::Confetti => Self {
                particles_per_explosion: 50,
                min_speed: 1.0,
                max_speed: 4.0,
                min_size: 2.0,
                max_size: 8.0,
                jitter: 1.0,
                friction_min: 0.98,
                friction_max: 0.999,
                gravity: 0.01,
                lifetime_ms: None,
                lifetime_min_ms: 2000.0,
                lifetime_max_ms: 4000.0,
                lifetime_jitter: 0.5,
                glow_strength: 0.0,
                r_min: 200,
                r_max: 255,
                g_min: 100,
                g_max: 255,
                b_min: 50,
                b_max: 200,
            },
            EffectKind::Fireworks => Self {
                particles_per_explosion: 20,
                min_speed: 5.0,
                max_speed: 10.0,
                min_size: 2.0,
                max_size: 4.0,
                jitter: 0.5,
                friction_min: 0.99,
                friction_max: 0.999,
                gravity: -0.05,
                lifetime_ms: None,
                lifetime_min_ms: 1000.0,
                lifetime_max_ms: 2000.0,
                lifetime_jitter: 0.5,
                glow_strength: 0.0,
                r_min: 255,
                r_max: 255,
                g_min: 200,
                g_max: 255,
                b_min: 0,
                b_max: 100,
            },
        }
    }

    pub fn resolve(kind: EffectKind, cfg: &EffectConfig) -> Self {
        let mut o = Self::defaults(kind);
        if let Some(v) = cfg.particles_per_explosion {
            o.particles_per_explosion = v;
        }
        if let Some(v) = cfg.particles_min_speed {
            o.min_speed = v;
        }
        if let Some(v) = cfg.particles_max_speed {
            o.max_speed = v;
        }
        if let Some(v) = cfg.particles_min_size {
            o.min_size = v;
        }
        if let Some(v) = cfg.particles_max_size {
            o.max_size = v;
        }
        if let Some(v) = cfg.jitter {
            o.jitter = v;
        }
        if let Some(v) = cfg.friction_min {
            o.friction_min = v;
        }
        if let Some(v) = cfg.friction_max {
            o.friction_max = v;
        }
        if let Some(v) = cfg.gravity {
            o.gravity = v;
        }
        if cfg.lifetime_ms.is_some() {
            o.lifetime_ms = cfg.lifetime_ms;
        }
        if let Some(v) = cfg.lifetime_min_ms {
            o.lifetime_min_ms = v;
        }
        if let Some(v) = cfg.lifetime_max_ms {
            o.lifetime_max_ms = v;
        }
        if let Some(v) = cfg.lifetime_jitter {
            o.lifetime_jitter = v;
        }
        if let Some(v) = cfg.glow_strength {
            o.glow_strength = v;
        }
        if let Some(v) = cfg.r_min {
            o.r_min = v;
        }
        if let Some(v) = cfg.r_max {
            o.r_max = v;
        }
        if let Some(v) = cfg.g_min {
            o.g_min = v;
        }
        if let Some(v) = cfg.g_max {
            o.g_max = v;
        }
        if let Some(v) = cfg.b_min {
            o.b_min = v;
        }
        if let Some(v) = cfg.b_max {
            o.b_max = v;
        }
        o
    }
}
