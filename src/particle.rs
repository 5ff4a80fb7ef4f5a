use std::f32::consts::TAU;

use crate::options::EffectOptions;

/// Floor for a particle's time-to-live, in milliseconds.
pub const MIN_TTL_MS: f32 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Square,
    Rect,
    Ribbon,
    Star,
}

/// A single point-mass visual element with independent kinematics, color,
/// shape, and lifetime.
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub xv: f32,
    pub yv: f32,
    pub size: f32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub friction: f32,
    pub gravity: f32,
    /// Creation timestamp in milliseconds on the manager's clock.
    pub created: f64,
    /// Time-to-live in milliseconds, never below [`MIN_TTL_MS`].
    pub ttl: f32,
    pub shape: Shape,
    pub angle: f32,
    pub angular_velocity: f32,
    pub sway: f32,
    pub sway_freq: f32,
    pub sway_phase: f32,
    /// Burst altitude, set only for particles spawned with negative gravity.
    pub peak_y: Option<f32>,
    pub exploded: bool,
}

impl Particle {
    pub fn new(x: f32, y: f32, opts: &EffectOptions, now: f64) -> Self {
        let launch = fastrand::f32() * TAU;
        let base_speed = rand_range(opts.min_speed, opts.max_speed);
        // Secondary multiplicative jitter, roughly [0.5, 1.5)x.
        let speed = base_speed * (0.5 + fastrand::f32());

        // One jitter sample, applied identically to both axes.
        let pos_jitter = opts.jitter * (fastrand::f32() - 0.5);
        let x = x + pos_jitter;
        let y = y + pos_jitter;

        let gravity = opts.gravity;
        let peak_y = (gravity < 0.0).then(|| y - rand_range(50.0, 100.0));

        let base_lifetime = opts
            .lifetime_ms
            .unwrap_or_else(|| rand_range(opts.lifetime_min_ms, opts.lifetime_max_ms));
        let j = opts.lifetime_jitter.clamp(0.0, 1.0);
        let life_mul = fastrand::f32() * j + (1.0 - j);

        Self {
            x,
            y,
            xv: launch.cos() * speed,
            yv: launch.sin() * speed,
            size: rand_range(opts.min_size, opts.max_size),
            r: rand_range(opts.r_min as f32, opts.r_max as f32) as u8,
            g: rand_range(opts.g_min as f32, opts.g_max as f32) as u8,
            b: rand_range(opts.b_min as f32, opts.b_max as f32) as u8,
            friction: rand_range(opts.friction_min, opts.friction_max),
            gravity,
            created: now,
            ttl: (base_lifetime * life_mul).max(MIN_TTL_MS),
            shape: Shape::Circle,
            angle: 0.0,
            angular_velocity: 0.0,
            sway: 1.0,
            sway_freq: 1.0,
            sway_phase: 0.0,
            peak_y,
            exploded: false,
        }
    }

    pub fn age(&self, now: f64) -> f32 {
        (now - self.created) as f32
    }

    /// Lifetime fade, 1 at birth down to 0 at `age == ttl`.
    pub fn alpha(&self, now: f64) -> f32 {
        (1.0 - self.age(now) / self.ttl).clamp(0.0, 1.0)
    }
}

/// Uniform random float in `[min, max)`.
pub fn rand_range(min: f32, max: f32) -> f32 {
    min + fastrand::f32() * (max - min)
}

/// Uniform random integer in `[floor(min), floor(max)]`. Unlike
/// [`rand_range`], the upper bound is inclusive.
pub fn rand_range_int(min: f32, max: f32) -> i32 {
    fastrand::i32(min.floor() as i32..=max.floor() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectKind;
    use proptest::prelude::*;

    fn opts() -> EffectOptions {
        EffectOptions::defaults(EffectKind::Explosion)
    }

    #[test]
    fn speed_is_jittered_base_speed() {
        let mut o = opts();
        o.min_speed = 5.0;
        o.max_speed = 5.0;
        for _ in 0..200 {
            let p = Particle::new(100.0, 100.0, &o, 0.0);
            let speed = (p.xv * p.xv + p.yv * p.yv).sqrt();
            assert!((2.5..7.5).contains(&speed), "speed {speed} out of range");
        }
    }

    #[test]
    fn color_channels_stay_in_configured_ranges() {
        let o = opts();
        for _ in 0..200 {
            let p = Particle::new(0.0, 0.0, &o, 0.0);
            assert!((o.r_min..=o.r_max).contains(&p.r));
            assert!((o.g_min..=o.g_max).contains(&p.g));
            assert!((o.b_min..=o.b_max).contains(&p.b));
        }
    }

    #[test]
    fn negative_gravity_sets_peak_below_spawn() {
        let o = EffectOptions::defaults(EffectKind::Fireworks);
        for _ in 0..100 {
            let p = Particle::new(50.0, 500.0, &o, 0.0);
            let peak = p.peak_y.expect("rising particle needs a peak");
            assert!(peak >= p.y - 100.0 && peak < p.y - 50.0 + 1e-3);
            assert!(!p.exploded);
        }
        let mut o = opts();
        o.gravity = 0.02;
        let p = Particle::new(50.0, 500.0, &o, 0.0);
        assert!(p.peak_y.is_none());
    }

    #[test]
    fn alpha_fades_monotonically_to_zero() {
        let mut o = opts();
        o.lifetime_ms = Some(1000.0);
        o.lifetime_jitter = 0.0;
        let p = Particle::new(0.0, 0.0, &o, 0.0);
        assert_eq!(p.ttl, 1000.0);
        let mut prev = f32::INFINITY;
        for age in [0.0, 1.0, 250.0, 500.0, 999.0, 1000.0, 5000.0] {
            let a = p.alpha(age);
            assert!((0.0..=1.0).contains(&a));
            assert!(a <= prev, "alpha must not increase with age");
            prev = a;
        }
        assert_eq!(p.alpha(0.0), 1.0);
        assert_eq!(p.alpha(1000.0), 0.0);
    }

    proptest! {
        #[test]
        fn ttl_never_below_floor(base in 0.0f32..5000.0, jitter in -1.0f32..3.0) {
            let mut o = opts();
            o.lifetime_ms = Some(base);
            o.lifetime_jitter = jitter;
            let p = Particle::new(0.0, 0.0, &o, 0.0);
            prop_assert!(p.ttl >= MIN_TTL_MS);
        }

        #[test]
        fn rand_range_stays_half_open(a in -1000.0f32..1000.0, span in 0.001f32..1000.0) {
            let b = a + span;
            let v = rand_range(a, b);
            prop_assert!(v >= a && v < b);
        }

        #[test]
        fn rand_range_int_is_inclusive_of_floors(a in -100.0f32..100.0, span in 0.0f32..100.0) {
            let b = a + span;
            let v = rand_range_int(a, b);
            prop_assert!(v >= a.floor() as i32 && v <= b.floor() as i32);
        }
    }
}
