/// Confetti: the decorative particle simulator.
///
/// A burst is a batch of point-mass particles launched from the bottom
/// edge of the view. Each tick applies simple kinematics (position +=
/// velocity, vertical velocity += gravity) and counts down a per-particle
/// life budget. Starting a new burst replaces the current batch outright;
/// the simulator is "active" exactly while particles remain, so a drained
/// batch costs nothing and leaves no dangling state behind.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::ConfettiConfig;

/// Soft rose palette for the wish burst (all candles blown).
const WISH_PALETTE: [(u8, u8, u8); 4] = [
    (232, 121, 249),
    (244, 114, 182),
    (236, 72, 153),
    (190, 24, 93),
];

/// Gift burst: the wish palette plus gold and coral.
const GIFT_PALETTE: [(u8, u8, u8); 6] = [
    (232, 121, 249),
    (244, 114, 182),
    (236, 72, 153),
    (190, 24, 93),
    (255, 215, 0),
    (255, 107, 107),
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BurstKind {
    /// Smaller celebration when the last candle goes out.
    Wish,
    /// The big finale burst when the gift is accepted.
    Gift,
}

impl BurstKind {
    fn palette(self) -> &'static [(u8, u8, u8)] {
        match self {
            BurstKind::Wish => &WISH_PALETTE,
            BurstKind::Gift => &GIFT_PALETTE,
        }
    }

    pub fn count(self, cfg: &ConfettiConfig) -> usize {
        match self {
            BurstKind::Wish => cfg.wish_count,
            BurstKind::Gift => cfg.gift_count,
        }
    }

    pub fn life(self, cfg: &ConfettiConfig) -> u32 {
        match self {
            BurstKind::Wish => cfg.wish_life,
            BurstKind::Gift => cfg.gift_life,
        }
    }
}

/// One confetti fleck. Positions are fractional terminal cells; no
/// identity beyond membership in the current generation.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: (u8, u8, u8),
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    /// Remaining life as 0.0..=1.0, for render-side fading.
    pub fn brightness(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

pub struct Confetti {
    particles: Vec<Particle>,
    generation: u32,
    rng: Pcg32,
}

impl Confetti {
    pub fn new(seed: u64) -> Self {
        Confetti {
            particles: Vec::new(),
            generation: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Launch a burst across the bottom edge of a `view_w` x `view_h`
    /// field. Replaces any live particles from the previous burst.
    pub fn spawn_burst(&mut self, kind: BurstKind, cfg: &ConfettiConfig, view_w: f32, view_h: f32) {
        let count = kind.count(cfg);
        let life = kind.life(cfg);
        let palette = kind.palette();

        self.generation = self.generation.wrapping_add(1);
        self.particles.clear();
        self.particles.reserve(count);

        for _ in 0..count {
            let x = self.rng.random::<f32>() * view_w;
            let vx = (self.rng.random::<f32>() - 0.5) * 2.0 * cfg.drift;
            let vy = -(cfg.lift_min + self.rng.random::<f32>() * cfg.lift_span);
            let color = palette[self.rng.random_range(0..palette.len())];
            self.particles.push(Particle {
                x,
                y: view_h,
                vx,
                vy,
                color,
                life,
                max_life: life,
            });
        }
    }

    /// One fixed-interval step: integrate kinematics, expire spent
    /// particles. A no-op once the batch has drained.
    pub fn tick(&mut self, cfg: &ConfettiConfig) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.vy += cfg.gravity;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);
    }

    /// True while any particle from the current burst is alive.
    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Which burst the current batch belongs to. Bumped on every spawn.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Drop the current batch (restart path).
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CardConfig;

    fn cfg() -> crate::config::ConfettiConfig {
        CardConfig::default().confetti
    }

    #[test]
    fn wish_burst_has_configured_count_and_life() {
        let mut c = Confetti::new(1);
        c.spawn_burst(BurstKind::Wish, &cfg(), 80.0, 24.0);
        assert_eq!(c.particles().len(), 30);
        assert!(c.particles().iter().all(|p| p.life == 80));
        assert!(c.is_active());
    }

    #[test]
    fn gift_burst_is_larger_and_longer_lived() {
        let mut c = Confetti::new(1);
        c.spawn_burst(BurstKind::Gift, &cfg(), 80.0, 24.0);
        assert_eq!(c.particles().len(), 50);
        assert!(c.particles().iter().all(|p| p.life == 100));
    }

    #[test]
    fn particles_spawn_on_bottom_edge_within_width() {
        let mut c = Confetti::new(42);
        c.spawn_burst(BurstKind::Wish, &cfg(), 100.0, 30.0);
        for p in c.particles() {
            assert!(p.y == 30.0);
            assert!(p.x >= 0.0 && p.x <= 100.0);
            assert!(p.vy < 0.0, "initial velocity must point upward");
        }
    }

    #[test]
    fn burst_drains_after_life_ticks() {
        let cfg = cfg();
        let mut c = Confetti::new(7);
        c.spawn_burst(BurstKind::Wish, &cfg, 80.0, 24.0);
        for _ in 0..80 {
            assert!(c.is_active());
            c.tick(&cfg);
        }
        assert_eq!(c.particles().len(), 0);
        assert!(!c.is_active());
    }

    #[test]
    fn active_set_never_grows_without_a_new_burst() {
        let cfg = cfg();
        let mut c = Confetti::new(3);
        c.spawn_burst(BurstKind::Gift, &cfg, 80.0, 24.0);
        let mut prev = c.particles().len();
        for _ in 0..120 {
            c.tick(&cfg);
            let n = c.particles().len();
            assert!(n <= prev);
            prev = n;
        }
    }

    #[test]
    fn gravity_pulls_velocity_downward() {
        let cfg = cfg();
        let mut c = Confetti::new(5);
        c.spawn_burst(BurstKind::Wish, &cfg, 80.0, 24.0);
        let vy0: Vec<f32> = c.particles().iter().map(|p| p.vy).collect();
        c.tick(&cfg);
        for (p, &before) in c.particles().iter().zip(&vy0) {
            assert!((p.vy - (before + cfg.gravity)).abs() < 1e-6);
        }
    }

    #[test]
    fn new_burst_replaces_previous_batch() {
        let cfg = cfg();
        let mut c = Confetti::new(9);
        c.spawn_burst(BurstKind::Wish, &cfg, 80.0, 24.0);
        let gen1 = c.generation();
        for _ in 0..10 {
            c.tick(&cfg);
        }
        c.spawn_burst(BurstKind::Gift, &cfg, 80.0, 24.0);
        assert_eq!(c.generation(), gen1 + 1);
        // No survivors from the first batch: everyone is at full life.
        assert_eq!(c.particles().len(), 50);
        assert!(c.particles().iter().all(|p| p.life == 100));
    }

    #[test]
    fn tick_on_empty_batch_is_a_no_op() {
        let cfg = cfg();
        let mut c = Confetti::new(11);
        c.tick(&cfg);
        assert!(!c.is_active());
        assert_eq!(c.particles().len(), 0);
    }

    #[test]
    fn clear_empties_the_batch() {
        let cfg = cfg();
        let mut c = Confetti::new(13);
        c.spawn_burst(BurstKind::Gift, &cfg, 80.0, 24.0);
        c.clear();
        assert!(!c.is_active());
    }

    #[test]
    fn seeded_bursts_are_reproducible() {
        let cfg = cfg();
        let mut a = Confetti::new(99);
        let mut b = Confetti::new(99);
        a.spawn_burst(BurstKind::Wish, &cfg, 80.0, 24.0);
        b.spawn_burst(BurstKind::Wish, &cfg, 80.0, 24.0);
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.x, pb.x);
            assert_eq!(pa.vx, pb.vx);
            assert_eq!(pa.vy, pb.vy);
            assert_eq!(pa.color, pb.color);
        }
    }
}
