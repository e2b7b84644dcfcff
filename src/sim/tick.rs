//! Variable timestep simulation step
//!
//! Advances the engine state by the wall-clock time elapsed since the previous
//! call, normalized so `dt = 1.0` is one frame at 60 Hz. A step reports at most
//! one terminal outcome and does no further physics after it.

use glam::Vec2;

use super::collision::{Contact, resolve_min_axis, resolve_vertical};
use super::level::TOTAL_TIERS;
use super::state::{EngineState, Facing, PlatformKind, frame_dt};
use crate::audio::SoundCue;
use crate::consts::*;
use crate::input::Intent;

/// Particle colors (0xRRGGBB)
pub const JUMP_DUST_COLOR: u32 = 0xA8E6CF;
pub const DEATH_COLOR: u32 = 0xE74C3C;
pub const FALL_COLOR: u32 = 0x3498DB;
pub const CHECKPOINT_COLOR: u32 = 0xF39C12;
pub const FINISH_COLOR: u32 = 0xFFD700;

/// What killed the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Spike,
    Enemy,
    Fall,
}

/// Result of one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Nothing noteworthy happened
    Continue,
    /// Player died; the step stopped at the moment of death
    Death(DeathCause),
    /// A checkpoint fired and the rest of the step ran normally
    Checkpoint { score: u64 },
    /// Finish reached on a non-final tier
    LevelComplete { score: u64 },
    /// Finish reached on the final tier
    GameComplete { score: u64, timer_ms: f64 },
}

impl StepOutcome {
    /// Outcomes that end the level or require the controller to intervene
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StepOutcome::Continue | StepOutcome::Checkpoint { .. })
    }
}

/// Advance the engine by the time elapsed since the previous call
pub fn step(state: &mut EngineState, intent: &Intent, now_ms: f64) -> StepOutcome {
    let delta_ms = state.clock.tick(now_ms);
    advance(state, intent, frame_dt(delta_ms), delta_ms)
}

/// Advance the engine by an explicit normalized `dt`
///
/// `delta_ms` is the true wall-clock time added to the run timer.
pub fn advance(state: &mut EngineState, intent: &Intent, dt: f32, delta_ms: f64) -> StepOutcome {
    let dt = dt.clamp(0.0, MAX_DT);
    state.timer_ms += delta_ms;
    state.sim_time += dt;

    apply_intent(state, intent, dt);
    integrate(state, dt);

    if hits_spike(state) {
        let origin = state.player.center();
        return die(state, DeathCause::Spike, origin, DEATH_COLOR);
    }

    let sim_time = state.sim_time;
    for enemy in &mut state.level.enemies {
        enemy.patrol(dt, sim_time);
    }

    let hitbox = state.player.hitbox();
    if state.level.enemies.iter().any(|e| hitbox.overlaps(&e.rect())) {
        let origin = state.player.center();
        return die(state, DeathCause::Enemy, origin, DEATH_COLOR);
    }

    let mut outcome = StepOutcome::Continue;
    if let Some(score) = touch_checkpoint(state) {
        outcome = StepOutcome::Checkpoint { score };
    }

    if let Some(finished) = touch_finish(state) {
        return finished;
    }

    if state.player.pos.y > DEATH_Y {
        let origin = Vec2::new(state.player.center().x, CANVAS_HEIGHT - 20.0);
        return die(state, DeathCause::Fall, origin, FALL_COLOR);
    }

    animate(state, dt);
    follow_camera(state, dt);
    age_particles(state, dt);

    outcome
}

/// Horizontal control and jumping
fn apply_intent(state: &mut EngineState, intent: &Intent, dt: f32) {
    let player = &mut state.player;
    if intent.move_left {
        player.vel.x = -MOVE_SPEED;
        player.facing = Facing::Left;
    } else if intent.move_right {
        player.vel.x = MOVE_SPEED;
        player.facing = Facing::Right;
    } else {
        // Frame-rate independent decay toward zero
        player.vel.x *= HORIZONTAL_DAMPING.powf(dt);
    }

    if intent.jump && player.grounded {
        player.vel.y = JUMP_FORCE;
        player.grounded = false;
        let feet = player.feet();
        state.burst(feet, JUMP_DUST_COLOR, 6);
        state.cue(SoundCue::Jump);
    }
}

/// Gravity, movement and collision against solids
fn integrate(state: &mut EngineState, dt: f32) {
    let player = &mut state.player;
    player.vel.y = (player.vel.y + GRAVITY * dt).min(TERMINAL_VELOCITY);

    player.pos.x += player.vel.x * dt;
    if player.pos.x < 0.0 {
        player.pos.x = 0.0;
        player.vel.x = 0.0;
    }

    let was_grounded = player.grounded;
    player.grounded = false;

    // Solids only: consumed checkpoints are inert by tag, whatever their geometry
    for platform in state.level.platforms.iter().filter(|p| p.is_solid()) {
        resolve_min_axis(player, &platform.rect);
    }

    player.pos.y += player.vel.y * dt;

    for platform in state.level.platforms.iter().filter(|p| p.is_solid()) {
        if resolve_vertical(player, &platform.rect) == Contact::Landed {
            log::trace!("landed on platform at x={}", platform.rect.x);
        }
    }

    if !was_grounded && state.player.grounded {
        state.cue(SoundCue::Land);
    }
}

fn hits_spike(state: &EngineState) -> bool {
    let hitbox = state.player.hitbox();
    state
        .level
        .platforms
        .iter()
        .any(|p| p.kind == PlatformKind::Spike && hitbox.overlaps(&p.rect))
}

fn die(state: &mut EngineState, cause: DeathCause, origin: Vec2, color: u32) -> StepOutcome {
    state.burst(origin, color, 20);
    state.cue(SoundCue::Death);
    log::debug!("Player died ({:?}) at x={:.0}", cause, state.player.pos.x);
    StepOutcome::Death(cause)
}

/// Fire the first active checkpoint ahead of the current respawn point
fn touch_checkpoint(state: &mut EngineState) -> Option<u64> {
    let body = state.player.rect();
    let progress = state.checkpoint.x;
    let idx = state
        .level
        .platforms
        .iter()
        .position(|p| p.is_active_checkpoint() && p.rect.x > progress && body.overlaps(&p.rect))?;

    let volume = state.level.platforms[idx].rect;
    state.level.platforms[idx].kind = PlatformKind::Checkpoint { consumed: true };

    state.checkpoint = state.player.pos;
    state.score += CHECKPOINT_BONUS;
    state.burst(Vec2::new(volume.center().x, volume.top()), CHECKPOINT_COLOR, 15);
    state.cue(SoundCue::Checkpoint);
    log::debug!("Checkpoint at x={:.0}, score {}", volume.x, state.score);
    Some(state.score)
}

fn touch_finish(state: &mut EngineState) -> Option<StepOutcome> {
    let body = state.player.rect();
    let flag = state
        .level
        .platforms
        .iter()
        .find(|p| p.kind == PlatformKind::Finish && body.overlaps(&p.rect))?
        .rect;

    state.score += FINISH_BONUS;
    state.burst(flag.center(), FINISH_COLOR, 30);

    if state.level_index + 1 >= TOTAL_TIERS {
        state.cue(SoundCue::GameComplete);
        Some(StepOutcome::GameComplete {
            score: state.score,
            timer_ms: state.timer_ms,
        })
    } else {
        state.cue(SoundCue::LevelComplete);
        Some(StepOutcome::LevelComplete { score: state.score })
    }
}

/// Walk cycle runs only while grounded and moving
fn animate(state: &mut EngineState, dt: f32) {
    let player = &mut state.player;
    if player.grounded && player.vel.x.abs() > WALK_ANIM_THRESHOLD {
        player.anim_timer += dt;
    } else if !player.grounded {
        player.anim_timer = 0.0;
    }
}

/// Ease the camera toward keeping the player a third of the way in
fn follow_camera(state: &mut EngineState, dt: f32) {
    let target = state.player.pos.x - CANVAS_WIDTH * CAMERA_LEAD;
    state.camera_x += (target - state.camera_x) * (1.0 - CAMERA_EASE.powf(dt));
    state.camera_x = state.camera_x.max(0.0);
}

fn age_particles(state: &mut EngineState, dt: f32) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.vel.y += PARTICLE_GRAVITY * dt;
        particle.life -= dt;
    }
    state.particles.retain(|p| p.life > 0.0);
}
