//! Collision detection and response against solid platforms
//!
//! The player is resolved against solids in two passes per step: a
//! minimum-overlap pass before the vertical position update (so a fast body
//! clipping a corner is pushed out along the shallow axis instead of catching
//! on it) and a vertical-only pass afterwards (so a high fall speed cannot
//! tunnel through a thin platform).

use super::rect::Rect;
use super::state::Player;
use crate::consts::CEILING_BOUNCE;

/// How far `mover` would have to travel in each direction to leave `solid`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapDepths {
    /// Push the mover left, out past the solid's left edge
    pub left: f32,
    /// Push the mover right, out past the solid's right edge
    pub right: f32,
    /// Push the mover up, on top of the solid
    pub top: f32,
    /// Push the mover down, below the solid
    pub bottom: f32,
}

impl OverlapDepths {
    pub fn between(mover: &Rect, solid: &Rect) -> Self {
        Self {
            left: mover.right() - solid.left(),
            right: solid.right() - mover.left(),
            top: mover.bottom() - solid.top(),
            bottom: solid.bottom() - mover.top(),
        }
    }

    #[inline]
    pub fn min_horizontal(&self) -> f32 {
        self.left.min(self.right)
    }

    #[inline]
    pub fn min_vertical(&self) -> f32 {
        self.top.min(self.bottom)
    }
}

/// What a resolution did to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// No overlap, or nothing to resolve
    None,
    /// Snapped on top of the solid
    Landed,
    /// Pushed below the solid and bounced down
    Ceiling,
    /// Snapped against a side of the solid
    Wall,
}

fn land_on(player: &mut Player, solid: &Rect) {
    player.pos.y = solid.top() - player.height;
    player.vel.y = 0.0;
    player.grounded = true;
}

fn bump_ceiling(player: &mut Player, solid: &Rect) {
    player.pos.y = solid.bottom();
    player.vel.y = player.vel.y.abs() * CEILING_BOUNCE;
}

/// Resolve along whichever axis has the smaller penetration
pub fn resolve_min_axis(player: &mut Player, solid: &Rect) -> Contact {
    let body = player.rect();
    if !body.overlaps(solid) {
        return Contact::None;
    }

    let depths = OverlapDepths::between(&body, solid);
    if depths.min_vertical() < depths.min_horizontal() {
        if depths.top < depths.bottom {
            land_on(player, solid);
            Contact::Landed
        } else {
            bump_ceiling(player, solid);
            Contact::Ceiling
        }
    } else {
        player.pos.x = if depths.left < depths.right {
            solid.left() - player.width
        } else {
            solid.right()
        };
        player.vel.x = 0.0;
        Contact::Wall
    }
}

/// Resolve strictly vertical penetration, in the direction of travel only
pub fn resolve_vertical(player: &mut Player, solid: &Rect) -> Contact {
    let body = player.rect();
    if !body.overlaps(solid) {
        return Contact::None;
    }

    let depths = OverlapDepths::between(&body, solid);
    if depths.top < depths.bottom && player.vel.y > 0.0 {
        land_on(player, solid);
        Contact::Landed
    } else if depths.bottom < depths.top && player.vel.y < 0.0 {
        bump_ceiling(player, solid);
        Contact::Ceiling
    } else {
        Contact::None
    }
}
