//! Procedural level generation
//!
//! A level is a left-to-right random walk of solid platforms. Each new
//! platform may host at most one of: a checkpoint, a run of spikes, or a single
//! enemy. That keeps every checkpoint a safe landing and every hazard
//! escapable.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Enemy, EnemyKind, Level, Platform};
use crate::consts::GROUND_Y;

/// Difficulty settings for one tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierConfig {
    /// Distance the walk must cover before the finish area
    pub length: f32,
    /// Widest horizontal gap between consecutive platforms
    pub max_gap: f32,
    /// Steepest climb between consecutive platforms (shrinks as the gap grows)
    pub max_rise: f32,
    pub min_platform_w: f32,
    pub max_platform_w: f32,
    pub spike_chance: f32,
    /// Horizontal distance between checkpoints
    pub checkpoint_every: f32,
    pub enemy_chance: f32,
    pub walker_speed: f32,
    /// 0 = all walkers, 1 = all flyers
    pub flyer_chance: f32,
    pub flyer_speed: f32,
    /// Inset of a flyer's patrol bounds from the platform edges
    pub flyer_margin: f32,
    /// Inset of a walker's left patrol bound from the platform edge
    pub walker_margin: f32,
}

#[allow(clippy::too_many_arguments)]
const fn tier(
    length: f32,
    max_gap: f32,
    max_rise: f32,
    min_platform_w: f32,
    max_platform_w: f32,
    spike_chance: f32,
    checkpoint_every: f32,
    enemy_chance: f32,
    walker_speed: f32,
    flyer_chance: f32,
    flyer_speed: f32,
) -> TierConfig {
    TierConfig {
        length,
        max_gap,
        max_rise,
        min_platform_w,
        max_platform_w,
        spike_chance,
        checkpoint_every,
        enemy_chance,
        walker_speed,
        flyer_chance,
        flyer_speed,
        flyer_margin: 50.0,
        walker_margin: 30.0,
    }
}

/// Ordered difficulty table; tiers past the end reuse the last entry
#[rustfmt::skip]
pub static TIERS: [TierConfig; TOTAL_TIERS] = [
    // Tutorial: no spikes, no enemies, huge platforms
    tier(2500.0,  50.0, 28.0, 180.0, 300.0, 0.00, 400.0, 0.00, 0.0, 0.00, 0.0),
    tier(3000.0,  60.0, 35.0, 160.0, 270.0, 0.03, 450.0, 0.00, 0.0, 0.00, 0.0),
    tier(3500.0,  70.0, 45.0, 145.0, 250.0, 0.06, 500.0, 0.00, 0.0, 0.00, 0.0),
    tier(4000.0,  82.0, 55.0, 130.0, 230.0, 0.09, 560.0, 0.00, 0.0, 0.00, 0.0),
    tier(4200.0,  92.0, 64.0, 115.0, 210.0, 0.12, 610.0, 0.00, 0.0, 0.00, 0.0),
    tier(4600.0, 102.0, 72.0, 100.0, 190.0, 0.15, 660.0, 0.00, 0.0, 0.00, 0.0),
    // Slow walkers introduced
    tier(5000.0, 112.0, 78.0,  90.0, 175.0, 0.17, 710.0, 0.15, 0.9, 0.00, 0.0),
    // Flyers introduced
    tier(5200.0, 120.0, 84.0,  82.0, 160.0, 0.20, 750.0, 0.22, 1.1, 0.15, 1.4),
    tier(5600.0, 127.0, 89.0,  76.0, 148.0, 0.23, 790.0, 0.28, 1.3, 0.30, 1.8),
    tier(6000.0, 135.0, 95.0,  70.0, 138.0, 0.26, 830.0, 0.35, 1.6, 0.40, 2.2),
];

pub const TOTAL_TIERS: usize = 10;

/// Shortest gap between platforms
pub const MIN_GAP: f32 = 30.0;
/// After a gap wider than this fraction of `max_gap`...
pub const LARGE_GAP_FRACTION: f32 = 0.65;
/// ...the next gap is capped at this fraction
pub const GAP_CAP_AFTER_LARGE: f32 = 0.55;
/// Largest drop between consecutive platforms
pub const MAX_DROP: f32 = 90.0;
/// Platform tops stay within this band above the ground
pub const TOP_BAND: f32 = 230.0;

pub const START_PLATFORM_W: f32 = 500.0;
pub const GROUND_THICKNESS: f32 = 60.0;
pub const PLATFORM_THICKNESS: f32 = 20.0;

pub const CHECKPOINT_W: f32 = 30.0;
pub const CHECKPOINT_H: f32 = 40.0;
pub const CHECKPOINT_MIN_PLATFORM_W: f32 = 50.0;

pub const SPIKE_SIZE: f32 = 20.0;
pub const SPIKE_MIN_PLATFORM_W: f32 = 80.0;
/// Spikes keep this far from either platform edge
pub const SPIKE_EDGE_MARGIN: f32 = 20.0;

pub const WALKER_W: f32 = 24.0;
pub const WALKER_H: f32 = 30.0;
pub const FLYER_W: f32 = 26.0;
pub const FLYER_H: f32 = 18.0;
/// Flyers hover this far above the platform
pub const FLYER_HOVER: f32 = 50.0;
/// Extra patrol room beyond the enemy's own width
pub const PATROL_SLACK: f32 = 10.0;
/// No enemies this close to the start...
pub const ENEMY_START_CLEARANCE: f32 = 400.0;
/// ...or this close to the end
pub const ENEMY_END_CLEARANCE: f32 = 200.0;

pub const FINISH_LANDING_OFFSET: f32 = 80.0;
pub const FINISH_LANDING_W: f32 = 300.0;
pub const FINISH_FLAG_OFFSET: f32 = 120.0;
pub const FINISH_W: f32 = 40.0;

/// Configuration for `tier`, clamped to the last entry
pub fn tier_config(tier: usize) -> &'static TierConfig {
    &TIERS[tier.min(TOTAL_TIERS - 1)]
}

/// Distance from start to finish area for `tier`
pub fn level_length(tier: usize) -> f32 {
    tier_config(tier).length
}

/// Steepest climb allowed after a gap of `gap`
pub fn rise_limit(cfg: &TierConfig, gap: f32) -> f32 {
    cfg.max_rise * (1.0 - gap / (cfg.max_gap * 1.5))
}

#[inline]
fn rand_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

/// Generate a reproducible level for `tier`
pub fn generate_level_seeded(tier: usize, seed: u64) -> Level {
    let mut rng = Pcg32::seed_from_u64(seed);
    generate_level(tier, &mut rng)
}

/// Generate a level for `tier`
pub fn generate_level<R: Rng + ?Sized>(tier: usize, rng: &mut R) -> Level {
    let cfg = tier_config(tier);
    let mut platforms = Vec::new();
    let mut enemies = Vec::new();

    platforms.push(Platform::solid(0.0, GROUND_Y, START_PLATFORM_W, GROUND_THICKNESS));

    let mut cur_right = START_PLATFORM_W;
    let mut cur_top = GROUND_Y;
    let mut checkpoint_next = cfg.checkpoint_every;
    let mut prev_gap_was_large = false;

    while cur_right < cfg.length {
        // Gap, capped after an unusually wide one
        let gap_cap = if prev_gap_was_large {
            (cfg.max_gap * GAP_CAP_AFTER_LARGE).max(MIN_GAP)
        } else {
            cfg.max_gap
        };
        let gap = rand_between(rng, MIN_GAP, gap_cap.max(MIN_GAP));
        prev_gap_was_large = gap > cfg.max_gap * LARGE_GAP_FRACTION;

        // Height change: wider gaps allow less climbing
        let climb = rise_limit(cfg, gap);
        let dy = rand_between(rng, -climb, MAX_DROP);
        let top = (cur_top + dy).clamp(GROUND_Y - TOP_BAND, GROUND_Y);

        let width = rand_between(rng, cfg.min_platform_w, cfg.max_platform_w);
        let x = cur_right + gap;
        platforms.push(Platform::solid(x, top, width, PLATFORM_THICKNESS));

        // Checkpoint first, so spikes and enemies can be skipped on this platform
        let has_checkpoint = cur_right > checkpoint_next && width >= CHECKPOINT_MIN_PLATFORM_W;
        if has_checkpoint {
            platforms.push(Platform::checkpoint(
                x + width / 2.0 - CHECKPOINT_W / 2.0,
                top - CHECKPOINT_H,
                CHECKPOINT_W,
                CHECKPOINT_H,
            ));
            checkpoint_next += cfg.checkpoint_every;
        }

        let mut has_spikes = false;
        if !has_checkpoint && width > SPIKE_MIN_PLATFORM_W && rng.random::<f32>() < cfg.spike_chance {
            has_spikes = true;
            place_spikes(&mut platforms, rng, x, top, width);
        }

        let enemy_zone = x > ENEMY_START_CLEARANCE && x < cfg.length - ENEMY_END_CLEARANCE;
        if cfg.enemy_chance > 0.0
            && !has_spikes
            && !has_checkpoint
            && enemy_zone
            && rng.random::<f32>() < cfg.enemy_chance
        {
            let want_flyer = rng.random::<f32>() < cfg.flyer_chance;
            if let Some(enemy) = place_enemy(cfg, rng, want_flyer, x, top, width) {
                enemies.push(enemy);
            }
        }

        cur_right = x + width;
        cur_top = top;
    }

    // Final landing platform, then a full-height finish volume
    let landing_x = cfg.length + FINISH_LANDING_OFFSET;
    platforms.push(Platform::solid(landing_x, GROUND_Y, FINISH_LANDING_W, GROUND_THICKNESS));
    platforms.push(Platform::finish(landing_x + FINISH_FLAG_OFFSET, 0.0, FINISH_W, GROUND_Y));

    log::debug!(
        "Tier {}: {} platforms, {} enemies, length {}",
        tier,
        platforms.len(),
        enemies.len(),
        cfg.length
    );

    Level {
        tier,
        platforms,
        enemies,
        length: cfg.length,
    }
}

/// Place one or two spikes that stay on the platform surface
fn place_spikes<R: Rng + ?Sized>(platforms: &mut Vec<Platform>, rng: &mut R, x: f32, top: f32, width: f32) {
    let fit = ((width - 3.0 * SPIKE_EDGE_MARGIN) / SPIKE_SIZE).floor().max(1.0) as usize;
    let count = 1 + (rng.random::<f32>() * fit.min(2) as f32) as usize;
    let count = count.min(2);
    let run = count as f32 * SPIKE_SIZE;
    let start = x + SPIKE_EDGE_MARGIN + rand_between(rng, 0.0, width - 2.0 * SPIKE_EDGE_MARGIN - run);
    for s in 0..count {
        platforms.push(Platform::spike(
            start + s as f32 * SPIKE_SIZE,
            top - SPIKE_SIZE,
            SPIKE_SIZE,
            SPIKE_SIZE,
        ));
    }
}

/// Build an enemy patrolling the platform, or `None` if it can't fit safely
///
/// A flyer that doesn't fit falls back to a walker.
fn place_enemy<R: Rng + ?Sized>(
    cfg: &TierConfig,
    rng: &mut R,
    want_flyer: bool,
    x: f32,
    top: f32,
    width: f32,
) -> Option<Enemy> {
    let flyer_left = x + cfg.flyer_margin;
    let flyer_right = x + width - cfg.flyer_margin;
    let flyer_fits = flyer_right - flyer_left >= FLYER_W + PATROL_SLACK;

    let walker_left = x + cfg.walker_margin;
    let walker_right = x + width - WALKER_W - 4.0;
    let walker_fits = walker_right - walker_left >= WALKER_W + PATROL_SLACK;

    let center = x + width / 2.0;
    if want_flyer && flyer_fits {
        let base_y = top - FLYER_H - FLYER_HOVER;
        Some(Enemy {
            kind: EnemyKind::Flyer,
            pos: Vec2::new(center - FLYER_W / 2.0, base_y),
            vel: Vec2::new(cfg.flyer_speed, 0.0),
            width: FLYER_W,
            height: FLYER_H,
            patrol_left: flyer_left,
            patrol_right: flyer_right,
            base_y,
            phase: rng.random::<f32>() * std::f32::consts::TAU,
            anim_timer: 0.0,
        })
    } else if walker_fits {
        let y = top - WALKER_H;
        Some(Enemy {
            kind: EnemyKind::Walker,
            pos: Vec2::new(center - WALKER_W / 2.0, y),
            vel: Vec2::new(cfg.walker_speed, 0.0),
            width: WALKER_W,
            height: WALKER_H,
            patrol_left: walker_left,
            patrol_right: walker_right,
            base_y: y,
            phase: 0.0,
            anim_timer: 0.0,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PlatformKind;
    use crate::sim::Rect;
    use proptest::prelude::*;

    /// Solid platforms forming the walk, in order (starting ground through final landing)
    fn path(level: &Level) -> Vec<Rect> {
        level.solids().map(|p| p.rect).collect()
    }

    #[test]
    fn test_tier_clamps_to_last() {
        assert_eq!(tier_config(99), &TIERS[TOTAL_TIERS - 1]);
        assert_eq!(level_length(0), 2500.0);
        assert_eq!(level_length(42), 6000.0);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_level_seeded(5, 777);
        let b = generate_level_seeded(5, 777);
        assert_eq!(a, b);
        let c = generate_level_seeded(5, 778);
        assert_ne!(a, c);
    }

    #[test]
    fn test_tutorial_tier_has_no_hazards() {
        for seed in 0..20 {
            let level = generate_level_seeded(0, seed);
            assert_eq!(level.count_kind(|k| *k == PlatformKind::Spike), 0);
            assert!(level.enemies.is_empty());
            assert!(level.count_kind(|k| matches!(k, PlatformKind::Checkpoint { .. })) > 0);
        }
    }

    #[test]
    fn test_starts_with_wide_ground() {
        let level = generate_level_seeded(3, 1);
        let start = level.start_platform().map(|p| p.rect);
        assert_eq!(start, Some(Rect::new(0.0, GROUND_Y, START_PLATFORM_W, GROUND_THICKNESS)));
    }

    #[test]
    fn test_late_tiers_spawn_both_enemy_kinds() {
        let mut walkers = 0;
        let mut flyers = 0;
        for tier in 7..TOTAL_TIERS {
            for seed in 0..50 {
                let level = generate_level_seeded(tier, seed);
                for e in &level.enemies {
                    match e.kind {
                        EnemyKind::Walker => walkers += 1,
                        EnemyKind::Flyer => flyers += 1,
                    }
                }
            }
        }
        assert!(walkers > 0);
        assert!(flyers > 0);
    }

    proptest! {
        #[test]
        fn prop_single_finish_beyond_length(tier in 0usize..12, seed in any::<u64>()) {
            let level = generate_level_seeded(tier, seed);
            let finishes: Vec<_> = level
                .platforms
                .iter()
                .filter(|p| p.kind == PlatformKind::Finish)
                .collect();
            prop_assert_eq!(finishes.len(), 1);
            let finish = finishes[0].rect;
            prop_assert!(finish.left() > level.length);
            // Spans the whole play area above the ground: cannot be jumped over
            prop_assert_eq!(finish.top(), 0.0);
            prop_assert_eq!(finish.bottom(), GROUND_Y);
        }

        #[test]
        fn prop_walk_is_reachable(tier in 0usize..TOTAL_TIERS, seed in any::<u64>()) {
            let level = generate_level_seeded(tier, seed);
            let cfg = tier_config(tier);
            let solids = path(&level);
            // Every step of the random walk, excluding the final landing
            for pair in solids[..solids.len() - 1].windows(2) {
                let (prev, next) = (pair[0], pair[1]);
                let gap = next.left() - prev.right();
                prop_assert!(gap >= MIN_GAP - 1e-3);
                prop_assert!(gap <= cfg.max_gap + 1e-3);
                let rise = prev.top() - next.top();
                prop_assert!(rise <= rise_limit(cfg, gap) + 1e-3);
                prop_assert!(next.top() >= GROUND_Y - TOP_BAND && next.top() <= GROUND_Y);
                prop_assert!(next.w >= cfg.min_platform_w && next.w <= cfg.max_platform_w);
            }
        }

        #[test]
        fn prop_one_feature_per_platform(tier in 0usize..TOTAL_TIERS, seed in any::<u64>()) {
            let level = generate_level_seeded(tier, seed);
            for solid in level.solids() {
                let r = solid.rect;
                let on_top = |other: &Rect| {
                    (other.bottom() - r.top()).abs() < 0.01 && other.left() >= r.left() && other.right() <= r.right()
                };

                let checkpoints = level
                    .platforms
                    .iter()
                    .filter(|p| matches!(p.kind, PlatformKind::Checkpoint { .. }) && on_top(&p.rect))
                    .count();
                let spikes = level
                    .platforms
                    .iter()
                    .filter(|p| p.kind == PlatformKind::Spike && on_top(&p.rect))
                    .count();
                let enemies = level
                    .enemies
                    .iter()
                    .filter(|e| e.patrol_left >= r.left() && e.patrol_right <= r.right())
                    .count();

                prop_assert!(checkpoints <= 1);
                prop_assert!(spikes <= 2);
                prop_assert!(enemies <= 1);
                let features = (checkpoints > 0) as u8 + (spikes > 0) as u8 + (enemies > 0) as u8;
                prop_assert!(features <= 1, "platform at {} hosts {} features", r.x, features);
            }
        }

        #[test]
        fn prop_enemies_patrol_inside_platform(tier in 6usize..TOTAL_TIERS, seed in any::<u64>()) {
            let level = generate_level_seeded(tier, seed);
            for e in &level.enemies {
                prop_assert!(e.patrol_right - e.patrol_left >= e.width + PATROL_SLACK);
                prop_assert!(e.pos.x >= e.patrol_left && e.pos.x + e.width <= e.patrol_right);
                let host = level
                    .solids()
                    .find(|p| e.patrol_left >= p.rect.left() && e.patrol_right <= p.rect.right());
                prop_assert!(host.is_some());
            }
        }
    }
}
