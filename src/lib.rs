//! Parkour Master - a quiz-gated side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Level generation and the per-frame simulation step
//! - `input`: Keyboard/touch state resolved to a movement intent
//! - `audio`: Sound cues emitted by the simulation
//! - `quiz`: Question bank consulted when the player dies
//! - `session`: Session controller (lives, quiz gating, level progression)
//! - `highscores`: Fastest-run leaderboard
//! - `settings`: Player profile and preferences

pub mod audio;
pub mod highscores;
pub mod input;
pub mod quiz;
pub mod session;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::Leaderboard;
pub use session::{GamePhase, Session};
pub use settings::Settings;

/// Game configuration constants
///
/// Velocities and accelerations are expressed per reference frame: one unit of
/// `dt` corresponds to one frame at 60 updates per second.
pub mod consts {
    /// Reference frame duration (60 updates per second)
    pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest normalized delta a single step may integrate
    pub const MAX_DT: f32 = 3.0;
    /// Smallest wall-clock delta accepted from the host clock
    pub const MIN_FRAME_MS: f64 = 0.001;

    /// Viewport dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 450.0;
    /// Top of the starting ground
    pub const GROUND_Y: f32 = CANVAS_HEIGHT - 60.0;
    /// Falling below this y kills the player
    pub const DEATH_Y: f32 = CANVAS_HEIGHT + 80.0;

    /// Player physics
    pub const GRAVITY: f32 = 0.6;
    pub const TERMINAL_VELOCITY: f32 = 18.0;
    pub const JUMP_FORCE: f32 = -13.0;
    pub const MOVE_SPEED: f32 = 6.0;
    /// Per-frame horizontal velocity retention once input is released
    pub const HORIZONTAL_DAMPING: f32 = 0.7;
    /// Velocity retained (and reflected) after bumping a ceiling
    pub const CEILING_BOUNCE: f32 = 0.3;
    pub const PLAYER_W: f32 = 28.0;
    pub const PLAYER_H: f32 = 44.0;
    /// Forgiving inset applied to the player's lethal hit-box
    pub const HITBOX_INSET: f32 = 4.0;
    /// Minimum speed for the walk cycle to advance
    pub const WALK_ANIM_THRESHOLD: f32 = 0.5;

    /// Where the player spawns on every level
    pub const SPAWN_X: f32 = 80.0;
    /// Respawns are dropped slightly above the checkpoint
    pub const RESPAWN_LIFT: f32 = 10.0;

    /// Camera keeps the player this fraction from the left edge
    pub const CAMERA_LEAD: f32 = 0.35;
    /// Per-frame remaining camera error
    pub const CAMERA_EASE: f32 = 0.9;

    /// Flyer hover oscillation
    pub const FLYER_BOB_RATE: f32 = 0.05;
    pub const FLYER_BOB_AMPLITUDE: f32 = 10.0;

    /// Particle gravity (per frame)
    pub const PARTICLE_GRAVITY: f32 = 0.15;

    /// Scoring
    pub const CHECKPOINT_BONUS: u64 = 50;
    pub const FINISH_BONUS: u64 = 200;
    pub const CORRECT_ANSWER_BONUS: u64 = 100;
    pub const STARTING_LIVES: u8 = 3;
}

/// Axis-aligned overlap test on raw coordinates (strict: touching edges do not overlap)
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn rects_overlap(ax: f32, ay: f32, aw: f32, ah: f32, bx: f32, by: f32, bw: f32, bh: f32) -> bool {
    ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
}
