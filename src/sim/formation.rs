//! Formation controller
//!
//! The invader grid moves as one rigid body: a single shared velocity is
//! applied to every member. A tick's move is all-or-nothing - if the
//! tentative step would push any member past the left, right, or bottom play
//! bound, nobody moves and the corresponding flag is raised instead.
//!
//! Hitting a side bound accelerates the formation and turns its motion into
//! a pure vertical drop; once the accumulated drop reaches the configured
//! distance, horizontal motion resumes in the opposite direction at the new
//! speed. Speed never decreases within a level.

use glam::Vec2;

use crate::WorldBounds;
use crate::sim::entities::Invader;

/// Bounds crossed by the tentative move this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundaryHit {
    pub left: bool,
    pub right: bool,
    pub bottom: bool,
}

impl BoundaryHit {
    pub fn any(&self) -> bool {
        self.left || self.right || self.bottom
    }
}

#[derive(Debug, Clone)]
pub struct Formation {
    /// Current speed magnitude; only ever incremented.
    speed: f32,
    velocity: Vec2,
    /// Horizontal vector to resume with once the drop completes.
    next_velocity: Option<Vec2>,
    acceleration: f32,
    drop_distance: f32,
    drop_travelled: f32,
    dropping: bool,
}

impl Formation {
    /// A new formation sweeps left at the initial speed.
    pub fn new(initial_speed: f32, acceleration: f32, drop_distance: f32) -> Self {
        Self {
            speed: initial_speed,
            velocity: Vec2::new(-initial_speed, 0.0),
            next_velocity: None,
            acceleration,
            drop_distance,
            drop_travelled: 0.0,
            dropping: false,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Advance the grid by one tick. Returns the boundary flags raised by
    /// the tentative move; when any flag is set no member has moved.
    pub fn advance(&mut self, invaders: &mut [Invader], bounds: &WorldBounds, dt: f32) -> BoundaryHit {
        let step = self.velocity * dt;

        // Detection pass first so a breach suppresses the whole move.
        let mut hit = BoundaryHit::default();
        for invader in invaders.iter() {
            let new_x = invader.x + step.x;
            let new_y = invader.y + step.y;
            if new_x < bounds.left {
                hit.left = true;
            } else if new_x > bounds.right {
                hit.right = true;
            } else if new_y > bounds.bottom {
                hit.bottom = true;
            }
        }

        if !hit.any() {
            for invader in invaders.iter_mut() {
                invader.x += step.x;
                invader.y += step.y;
            }
        }

        // Track drop progress and resume horizontal motion when done.
        if self.dropping {
            self.drop_travelled += self.velocity.y * dt;
            if self.drop_travelled >= self.drop_distance {
                self.dropping = false;
                self.drop_travelled = 0.0;
                if let Some(next) = self.next_velocity.take() {
                    self.velocity = next;
                }
            }
        }

        // Side hits reverse through a drop. Left and right raised in the
        // same tick can only happen with a degenerate play area; the later
        // (right) reaction wins, matching evaluation order.
        if hit.left {
            self.begin_drop(1.0);
        }
        if hit.right {
            self.begin_drop(-1.0);
        }

        hit
    }

    fn begin_drop(&mut self, next_dir: f32) {
        self.speed += self.acceleration;
        self.velocity = Vec2::new(0.0, self.speed);
        self.next_velocity = Some(Vec2::new(next_dir * self.speed, 0.0));
        self.dropping = true;
        self.drop_travelled = 0.0;
    }
}
