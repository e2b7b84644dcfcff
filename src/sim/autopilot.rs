//! Demo autopilot
//!
//! Derives an `Intent` from the engine state alone: run right, jump at ledges
//! and in front of hazards, ease off mid-air to avoid overshooting a landing.
//! Used for headless runs and the attract screen. It is not a solver and will
//! sometimes die.

use super::rect::Rect;
use super::state::{EngineState, PlatformKind};
use crate::input::Intent;

/// Jump when the ground ends this close ahead of the player's front edge
const LEDGE_LOOKAHEAD: f32 = 14.0;
/// Jump when a spike or enemy starts this close ahead
const HAZARD_LOOKAHEAD: f32 = 70.0;
/// Vertical reach of the hazard scan above the feet
const HAZARD_SCAN_HEIGHT: f32 = 80.0;
/// Release right when this close to the far edge of the landing platform
const LANDING_MARGIN: f32 = 30.0;

pub fn autopilot_intent(state: &EngineState) -> Intent {
    let player = &state.player;
    let body = player.rect();
    let feet_y = body.bottom();

    if !player.grounded {
        return steer_airborne(state, &body);
    }

    let support = state
        .level
        .solids()
        .map(|p| p.rect)
        .filter(|r| (r.top() - feet_y).abs() < 0.5 && r.left() < body.right() && r.right() > body.left())
        .max_by(|a, b| a.right().total_cmp(&b.right()));

    let at_ledge = support.is_none_or(|r| r.right() - body.right() < LEDGE_LOOKAHEAD);

    let scan = Rect::new(body.right(), feet_y - HAZARD_SCAN_HEIGHT, HAZARD_LOOKAHEAD, HAZARD_SCAN_HEIGHT);
    let spike_ahead = state
        .level
        .platforms
        .iter()
        .any(|p| p.kind == PlatformKind::Spike && scan.overlaps(&p.rect));
    let enemy_ahead = state.level.enemies.iter().any(|e| scan.overlaps(&e.rect()));

    let wall_ahead = state.level.solids().any(|p| {
        let r = p.rect;
        r.top() < feet_y - 0.5
            && r.bottom() > body.top()
            && r.left() >= body.right() - 0.5
            && r.left() - body.right() < LEDGE_LOOKAHEAD
    });

    if at_ledge || spike_ahead || enemy_ahead || wall_ahead {
        Intent::right().with_jump()
    } else {
        Intent::right()
    }
}

/// Keep drifting right unless the platform below is about to run out
fn steer_airborne(state: &EngineState, body: &Rect) -> Intent {
    if state.player.vel.y <= 0.0 {
        return Intent::right();
    }

    let center_x = body.center().x;
    let below = state
        .level
        .solids()
        .map(|p| p.rect)
        .filter(|r| r.spans_x(center_x) && r.top() >= body.bottom())
        .min_by(|a, b| a.top().total_cmp(&b.top()));

    match below {
        Some(r) if r.right() - body.right() < LANDING_MARGIN => Intent::IDLE,
        _ => Intent::right(),
    }
}
