//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform code:
//! - Variable timestep, normalized to 60 Hz and clamped
//! - Seedable RNG for level layouts, hashed "randomness" for effects
//! - Stable iteration order (platforms and enemies are never reordered)
//! - No rendering or audio playback, only cues

pub mod autopilot;
pub mod collision;
pub mod level;
pub mod rect;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_intent;
pub use collision::{Contact, OverlapDepths, resolve_min_axis, resolve_vertical};
pub use level::{TIERS, TOTAL_TIERS, TierConfig, generate_level, generate_level_seeded, level_length};
pub use rect::Rect;
pub use state::{
    EngineState, Enemy, EnemyKind, Facing, FrameClock, Level, MAX_PARTICLES, Particle, Platform,
    PlatformKind, Player,
};
pub use tick::{DeathCause, StepOutcome, advance, step};
