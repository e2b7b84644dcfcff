//! Engine state and core simulation types
//!
//! Everything the step function reads or writes lives here. The session
//! controller owns one `EngineState` at a time and lends it to the step
//! function by exclusive reference every frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::audio::SoundCue;
use crate::consts::*;

/// Which way the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    /// Resting on a solid surface (eligible to jump)
    pub grounded: bool,
    pub facing: Facing,
    /// Walk-cycle timer in frames; zero while airborne
    pub anim_timer: f32,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            width: PLAYER_W,
            height: PLAYER_H,
            grounded: false,
            facing: Facing::Right,
            anim_timer: 0.0,
        }
    }

    /// Bounding box
    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, self.width, self.height)
    }

    /// Forgiving box used for lethal contacts (spikes, enemies)
    pub fn hitbox(&self) -> Rect {
        self.rect().inset(HITBOX_INSET)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Midpoint of the bottom edge
    pub fn feet(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.width / 2.0, self.pos.y + self.height)
    }

    /// Walk-cycle frame for a 4-frame sprite strip
    pub fn walk_frame(&self) -> u32 {
        (self.anim_timer / 6.0) as u32 % 4
    }
}

/// Platform behaviour tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Blocks movement
    Solid,
    /// Lethal on contact with the player's hit-box
    Spike,
    /// Trigger volume moving the respawn point; inert once consumed
    Checkpoint { consumed: bool },
    /// Trigger volume ending the level
    Finish,
}

/// A platform or trigger volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn solid(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { rect: Rect::new(x, y, w, h), kind: PlatformKind::Solid }
    }

    pub fn spike(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { rect: Rect::new(x, y, w, h), kind: PlatformKind::Spike }
    }

    pub fn checkpoint(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            kind: PlatformKind::Checkpoint { consumed: false },
        }
    }

    pub fn finish(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { rect: Rect::new(x, y, w, h), kind: PlatformKind::Finish }
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        self.kind == PlatformKind::Solid
    }

    /// Checkpoint that can still fire
    #[inline]
    pub fn is_active_checkpoint(&self) -> bool {
        self.kind == PlatformKind::Checkpoint { consumed: false }
    }
}

/// Enemy behaviour tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Ground-bound, reverses at patrol bounds
    Walker,
    /// Hovers on a sine path around `base_y` while patrolling
    Flyer,
}

/// A patrolling enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    /// Only the x component is used; flyers derive y from time
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    /// Leftmost x of the enemy's left edge
    pub patrol_left: f32,
    /// Rightmost x of the enemy's right edge
    pub patrol_right: f32,
    /// Hover baseline for flyers
    pub base_y: f32,
    /// Bob phase offset so flyers don't move in lockstep
    pub phase: f32,
    pub anim_timer: f32,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, self.width, self.height)
    }

    /// Advance along the patrol route
    ///
    /// Flyer height is a pure function of `(sim_time, phase, base_y)` so it can
    /// never drift, no matter how the frame deltas are sliced.
    pub fn patrol(&mut self, dt: f32, sim_time: f32) {
        self.pos.x += self.vel.x * dt;
        self.anim_timer += dt;

        if self.pos.x <= self.patrol_left {
            self.pos.x = self.patrol_left;
            self.vel.x = self.vel.x.abs();
        }
        if self.pos.x + self.width >= self.patrol_right {
            self.pos.x = self.patrol_right - self.width;
            self.vel.x = -self.vel.x.abs();
        }

        if self.kind == EnemyKind::Flyer {
            self.pos.y = self.base_y + (sim_time * FLYER_BOB_RATE + self.phase).sin() * FLYER_BOB_AMPLITUDE;
        }
    }
}

/// A visual-only particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in frames
    pub life: f32,
    pub max_life: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub size: f32,
}

/// Maximum live particles; the oldest are dropped first
pub const MAX_PARTICLES: usize = 512;

/// One generated level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Difficulty tier this level was generated for
    pub tier: usize,
    /// Platforms and trigger volumes, in generation order
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    /// Distance from start to the finish area
    pub length: f32,
}

impl Level {
    /// The first platform (the wide starting ground)
    pub fn start_platform(&self) -> Option<&Platform> {
        self.platforms.first()
    }

    pub fn finish(&self) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.kind == PlatformKind::Finish)
    }

    pub fn solids(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter().filter(|p| p.is_solid())
    }

    pub fn count_kind(&self, pred: impl Fn(&PlatformKind) -> bool) -> usize {
        self.platforms.iter().filter(|p| pred(&p.kind)).count()
    }
}

/// Converts host timestamps into frame deltas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameClock {
    last_frame_ms: Option<f64>,
}

impl FrameClock {
    /// Elapsed wall-clock milliseconds since the previous call
    ///
    /// The first call reports one reference frame. Deltas are
    /// floored to `MIN_FRAME_MS` so a non-monotonic clock never stalls or
    /// reverses integration.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_frame_ms {
            Some(last) => (now_ms - last).max(MIN_FRAME_MS),
            None => REFERENCE_FRAME_MS,
        };
        self.last_frame_ms = Some(now_ms);
        delta
    }
}

/// Normalize a wall-clock delta to reference frames, clamped to `MAX_DT`
pub fn frame_dt(delta_ms: f64) -> f32 {
    ((delta_ms / REFERENCE_FRAME_MS) as f32).clamp(0.0, MAX_DT)
}

/// Complete engine state for one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineState {
    pub player: Player,
    pub level: Level,
    pub particles: Vec<Particle>,
    /// Horizontal scroll of the viewport
    pub camera_x: f32,
    /// Respawn point (x is the checkpoint progress marker)
    pub checkpoint: Vec2,
    pub score: u64,
    pub lives: u8,
    /// Tier index of the current level
    pub level_index: usize,
    /// Simulation time in reference frames
    pub sim_time: f32,
    /// Wall-clock run timer, carried across levels
    pub timer_ms: f64,
    pub clock: FrameClock,
    /// Sound cues raised this frame, drained by the session
    #[serde(skip)]
    pub cues: Vec<SoundCue>,
    /// Counter feeding particle hashes
    #[serde(default)]
    burst_seed: u32,
}

impl EngineState {
    /// Fresh state for `level` with the player on the starting platform
    pub fn new(level: Level, carry_timer_ms: f64) -> Self {
        let ground = level.start_platform().map(|p| p.rect.top()).unwrap_or(GROUND_Y);
        let spawn = Vec2::new(SPAWN_X, ground - PLAYER_H);
        Self {
            player: Player::new(spawn.x, spawn.y),
            level_index: level.tier,
            level,
            particles: Vec::new(),
            camera_x: 0.0,
            checkpoint: spawn,
            score: 0,
            lives: STARTING_LIVES,
            sim_time: 0.0,
            timer_ms: carry_timer_ms,
            clock: FrameClock::default(),
            cues: Vec::new(),
            burst_seed: 0,
        }
    }

    pub fn level_length(&self) -> f32 {
        self.level.length
    }

    /// Replace the player with a new one at the respawn point
    pub fn respawn(&mut self) {
        let mut player = Player::new(self.checkpoint.x, self.checkpoint.y - RESPAWN_LIFT);
        player.facing = Facing::Right;
        self.player = player;
    }

    /// Raise a sound cue for the audio collaborator
    pub fn cue(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    /// Take all cues raised since the last drain
    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    /// Spawn a radial burst of particles
    pub fn burst(&mut self, origin: Vec2, color: u32, count: usize) {
        self.burst_seed = self.burst_seed.wrapping_add(1);
        let seed = self.burst_seed.wrapping_mul(2654435761);

        for i in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            // Deterministic "random" spread using hash
            let hash = seed.wrapping_add(i as u32 * 7919).wrapping_mul(2654435761);
            let rand1 = (hash % 1000) as f32 / 1000.0;
            let rand2 = ((hash >> 10) % 1000) as f32 / 1000.0;
            let rand3 = ((hash >> 20) % 1000) as f32 / 1000.0;

            let angle = std::f32::consts::TAU * i as f32 / count as f32 + rand1 * 0.5;
            let speed = 2.0 + rand2 * 4.0;
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - 2.0),
                life: 30.0 + rand3 * 20.0,
                max_life: 50.0,
                color,
                size: 3.0 + rand1 * 4.0,
            });
        }
    }
}
