//! Active-play simulation
//!
//! One [`PlayState`] owns every entity of the current level and advances the
//! world by one fixed timestep per [`PlayState::update`] call. All
//! randomness (saucer drift, bomb trials, bomb velocities) flows through the
//! one seeded generator owned here, so a run is replayable from its seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::WorldBounds;
use crate::consts::*;
use crate::difficulty::LevelParams;
use crate::events::{FrameEvent, Sound};
use crate::game::Session;
use crate::render::{Align, SpriteKind, Surface};
use crate::sim::entities::{Bomb, Invader, Rocket, Saucer, Ship};
use crate::sim::formation::Formation;

/// What the simulator asks of the state machine after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Continue,
    /// Grid cleared; bonus awarded and the session level already advanced.
    LevelCleared,
    GameOver,
}

pub struct PlayState {
    level: u32,
    params: LevelParams,
    rng: Pcg32,
    ship: Ship,
    saucer: Option<Saucer>,
    invaders: Vec<Invader>,
    rockets: Vec<Rocket>,
    bombs: Vec<Bomb>,
    formation: Formation,
    /// Wall-clock time of the last rocket launch, for rate limiting.
    last_rocket_ms: Option<f64>,
}

impl PlayState {
    pub fn new(params: LevelParams, level: u32, seed: u64) -> Self {
        Self {
            level,
            params,
            rng: Pcg32::seed_from_u64(seed.wrapping_add(u64::from(level))),
            ship: Ship::new(0.0, 0.0),
            saucer: None,
            invaders: Vec::new(),
            rockets: Vec::new(),
            bombs: Vec::new(),
            formation: Formation::new(
                params.invader_velocity,
                params.invader_acceleration,
                params.invader_drop_distance,
            ),
            last_rocket_ms: None,
        }
    }

    /// Enter hook: place the ship and saucer and spawn the invader grid.
    pub fn enter(&mut self, bounds: &WorldBounds) {
        let center_x = bounds.width / 2.0;
        self.ship = Ship::new(center_x, bounds.bottom);
        self.saucer = Some(Saucer::new(center_x, bounds.top - SAUCER_TOP_OFFSET));

        self.invaders.clear();
        self.rockets.clear();
        self.bombs.clear();

        let files = self.params.files as f32;
        for rank in 0..self.params.ranks {
            for file in 0..self.params.files {
                let x = center_x + (files / 2.0 - file as f32) * FORMATION_WIDTH / files;
                let y = bounds.top + rank as f32 * RANK_SPACING;
                self.invaders.push(Invader::new(x, y, rank, file));
            }
        }
        log::debug!(
            "level {}: {} invaders ({}x{})",
            self.level,
            self.invaders.len(),
            self.params.ranks,
            self.params.files
        );
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn params(&self) -> &LevelParams {
        &self.params
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn saucer(&self) -> Option<&Saucer> {
        self.saucer.as_ref()
    }

    pub fn invaders(&self) -> &[Invader] {
        &self.invaders
    }

    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    /// Advance the world by one tick.
    pub fn update(
        &mut self,
        session: &mut Session,
        dt: f32,
        events: &mut Vec<FrameEvent>,
    ) -> PlayOutcome {
        let bounds = session.bounds;

        // Ship control. Movement is driven by the held set rather than key
        // events so the ship glides instead of stepping.
        if session.inputs.left {
            self.ship.x -= self.params.ship_speed * dt;
        }
        if session.inputs.right {
            self.ship.x += self.params.ship_speed * dt;
        }
        if session.inputs.fire {
            self.fire_rocket(session.now_ms, events);
        }
        self.ship.x = self.ship.x.clamp(bounds.left, bounds.right);

        // Saucer drift: random jitter magnitude, reflected at the play edges.
        if let Some(saucer) = &mut self.saucer {
            let jitter: f32 = self.rng.random_range(0.0..50.0);
            saucer.x += self.params.saucer_speed * dt * jitter * saucer.dir;
            if saucer.x <= bounds.left {
                saucer.x = bounds.left;
                saucer.dir = 1.0;
            } else if saucer.x >= bounds.right {
                saucer.x = bounds.right;
                saucer.dir = -1.0;
            }
        }

        // Projectile motion. The surface edge is off-screen: a rocket at
        // exactly y = 0 or a bomb at exactly y = height is culled.
        for rocket in &mut self.rockets {
            rocket.y -= rocket.velocity * dt;
        }
        self.rockets.retain(|rocket| rocket.y > 0.0);

        for bomb in &mut self.bombs {
            bomb.y += bomb.velocity * dt;
        }
        self.bombs.retain(|bomb| bomb.y < bounds.height);

        // Formation motion and boundary reaction. An invader reaching the
        // ship's line ends the game regardless of remaining lives.
        let hit = self.formation.advance(&mut self.invaders, &bounds, dt);
        if hit.bottom {
            session.lives = 0;
        }

        self.collide_rockets_with_saucer(session, events);
        self.collide_rockets_with_invaders(session, events);
        self.spawn_bombs(dt);
        self.collide_bombs_with_ship(session, events);

        // Invader/ship contact is instantly fatal.
        let ship_box = self.ship.hitbox();
        if self.invaders.iter().any(|invader| invader.hitbox().overlaps(&ship_box)) {
            session.lives = 0;
            events.push(FrameEvent::Sound(Sound::Explosion));
        }

        if session.lives == 0 {
            events.push(FrameEvent::GameOver {
                score: session.score,
                level: session.level,
            });
            return PlayOutcome::GameOver;
        }
        if self.invaders.is_empty() {
            let bonus = self.level * LEVEL_CLEAR_BONUS;
            session.score += bonus;
            session.level += 1;
            events.push(FrameEvent::LevelCleared {
                level: self.level,
                bonus,
            });
            return PlayOutcome::LevelCleared;
        }
        PlayOutcome::Continue
    }

    /// Launch a rocket from the ship's nose, unless one was launched less
    /// than the fire interval ago (wall-clock, not simulation time).
    pub(crate) fn fire_rocket(&mut self, now_ms: f64, events: &mut Vec<FrameEvent>) {
        let ready = match self.last_rocket_ms {
            None => true,
            Some(last) => now_ms - last > self.params.fire_interval_ms(),
        };
        if ready {
            self.rockets.push(Rocket::new(
                self.ship.x,
                self.ship.y - ROCKET_NOSE_OFFSET,
                self.params.rocket_velocity,
            ));
            self.last_rocket_ms = Some(now_ms);
            events.push(FrameEvent::Sound(Sound::Shoot));
        }
    }

    fn collide_rockets_with_saucer(&mut self, session: &mut Session, events: &mut Vec<FrameEvent>) {
        let Some(saucer) = &self.saucer else { return };
        let hitbox = saucer.hitbox();
        let Some(idx) = self
            .rockets
            .iter()
            .position(|rocket| hitbox.contains(rocket.x, rocket.y))
        else {
            return;
        };
        self.rockets.remove(idx);
        self.saucer = None;
        session.score += self.params.points_per_saucer;
        events.push(FrameEvent::SaucerKilled {
            points: self.params.points_per_saucer,
        });
        events.push(FrameEvent::Sound(Sound::Bang));
    }

    /// Each invader takes at most one hit per tick and each rocket scores at
    /// most one kill, so both lists are scanned against mark vectors and
    /// compacted afterwards (no removal mid-scan).
    fn collide_rockets_with_invaders(
        &mut self,
        session: &mut Session,
        events: &mut Vec<FrameEvent>,
    ) {
        let mut spent_rockets = vec![false; self.rockets.len()];
        let mut killed = vec![false; self.invaders.len()];

        for (i, invader) in self.invaders.iter().enumerate() {
            let hitbox = invader.hitbox();
            let hit = self
                .rockets
                .iter()
                .enumerate()
                .find(|(j, rocket)| !spent_rockets[*j] && hitbox.contains(rocket.x, rocket.y))
                .map(|(j, _)| j);
            if let Some(j) = hit {
                spent_rockets[j] = true;
                killed[i] = true;
                session.score += self.params.points_per_invader;
                events.push(FrameEvent::InvaderKilled {
                    points: self.params.points_per_invader,
                });
                events.push(FrameEvent::Sound(Sound::Bang));
            }
        }

        compact(&mut self.rockets, &spent_rockets);
        compact(&mut self.invaders, &killed);
    }

    /// Give the front-rank invader of each file a chance to drop a bomb.
    fn spawn_bombs(&mut self, dt: f32) {
        let mut front: Vec<Option<usize>> = vec![None; self.params.files as usize];
        for (i, invader) in self.invaders.iter().enumerate() {
            let slot = &mut front[invader.file as usize];
            match slot {
                Some(j) if self.invaders[*j].rank >= invader.rank => {}
                _ => *slot = Some(i),
            }
        }

        let chance = self.params.bomb_rate * dt;
        for i in front.into_iter().flatten() {
            if self.rng.random::<f32>() < chance {
                let velocity = self.params.bomb_min_velocity
                    + self.rng.random::<f32>()
                        * (self.params.bomb_max_velocity - self.params.bomb_min_velocity);
                let (x, y) = {
                    let invader = &self.invaders[i];
                    (invader.x, invader.y + invader.height / 2.0)
                };
                self.bombs.push(Bomb::new(x, y, velocity));
            }
        }
    }

    fn collide_bombs_with_ship(&mut self, session: &mut Session, events: &mut Vec<FrameEvent>) {
        let ship_box = self.ship.hitbox();
        self.bombs.retain(|bomb| {
            if ship_box.contains(bomb.x, bomb.y) {
                session.lives = session.lives.saturating_sub(1);
                events.push(FrameEvent::ShipHit {
                    lives_left: session.lives,
                });
                events.push(FrameEvent::Sound(Sound::Explosion));
                false
            } else {
                true
            }
        });
    }

    pub fn draw(&self, session: &Session, surface: &mut dyn Surface) {
        surface.clear();
        surface.sprite(
            SpriteKind::Ship,
            self.ship.x,
            self.ship.y,
            self.ship.width,
            self.ship.height,
        );
        if let Some(saucer) = &self.saucer {
            surface.sprite(SpriteKind::Saucer, saucer.x, saucer.y, saucer.width, saucer.height);
        }
        for invader in &self.invaders {
            surface.sprite(
                SpriteKind::Invader,
                invader.x,
                invader.y,
                invader.width,
                invader.height,
            );
        }
        for bomb in &self.bombs {
            surface.sprite(SpriteKind::Bomb, bomb.x, bomb.y, 2.0, 4.0);
        }
        for rocket in &self.rockets {
            surface.sprite(SpriteKind::Rocket, rocket.x, rocket.y, 2.0, 6.0);
        }

        let bounds = &session.bounds;
        let text_y = bounds.bottom + 20.0;
        surface.text(&format!("Score: {}", session.score), bounds.left, text_y, Align::Left);
        surface.text(&format!("Level: {}", session.level), bounds.right, text_y, Align::Right);
    }
}

/// Remove every element whose mark is set, visiting each exactly once.
fn compact<T>(items: &mut Vec<T>, remove: &[bool]) {
    let mut idx = 0;
    items.retain(|_| {
        let keep = !remove[idx];
        idx += 1;
        keep
    });
}
