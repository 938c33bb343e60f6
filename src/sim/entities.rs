//! Game entity records - positioned data with no behavior of their own.
//!
//! Positions are box centers. Entity lists are owned by the active play
//! state and dropped with it; nothing survives across levels.

use crate::consts::*;
use crate::sim::collision::Box2;

/// The player's ship
#[derive(Debug, Clone)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Ship {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: SHIP_WIDTH,
            height: SHIP_HEIGHT,
        }
    }

    pub fn hitbox(&self) -> Box2 {
        Box2::centered(self.x, self.y, self.width, self.height)
    }
}

/// Fired by the ship; moves straight up.
#[derive(Debug, Clone)]
pub struct Rocket {
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
}

impl Rocket {
    pub fn new(x: f32, y: f32, velocity: f32) -> Self {
        Self { x, y, velocity }
    }
}

/// Dropped by invaders; moves straight down.
#[derive(Debug, Clone)]
pub struct Bomb {
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
}

impl Bomb {
    pub fn new(x: f32, y: f32, velocity: f32) -> Self {
        Self { x, y, velocity }
    }
}

/// One member of the formation grid. `rank`/`file` identify the grid row
/// and column and never change after creation; per file, the member with
/// the greatest rank is the "front" one, closest to the ship.
#[derive(Debug, Clone)]
pub struct Invader {
    pub x: f32,
    pub y: f32,
    pub rank: u32,
    pub file: u32,
    pub width: f32,
    pub height: f32,
}

impl Invader {
    pub fn new(x: f32, y: f32, rank: u32, file: u32) -> Self {
        Self {
            x,
            y,
            rank,
            file,
            width: INVADER_WIDTH,
            height: INVADER_HEIGHT,
        }
    }

    pub fn hitbox(&self) -> Box2 {
        Box2::centered(self.x, self.y, self.width, self.height)
    }
}

/// The roaming bonus target above the formation. `dir` is the current
/// horizontal direction sign, flipped when a play-area bound is reached.
#[derive(Debug, Clone)]
pub struct Saucer {
    pub x: f32,
    pub y: f32,
    pub dir: f32,
    pub width: f32,
    pub height: f32,
}

impl Saucer {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            dir: 1.0,
            width: SAUCER_WIDTH,
            height: SAUCER_HEIGHT,
        }
    }

    pub fn hitbox(&self) -> Box2 {
        Box2::centered(self.x, self.y, self.width, self.height)
    }
}
