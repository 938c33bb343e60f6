//! Game session and state machine
//!
//! The session (lives, score, level, bounds, held input) is passed
//! explicitly into every state hook; there is no ambient game object. The
//! state stack has exactly two disciplines:
//! - `replace_top` for sequential states (welcome -> intro -> play -> ...),
//! - `push_overlay`/`pop_overlay` for Pause, the only overlay.
//!
//! Only the top of the stack receives update/draw/key calls, which is the
//! whole pause mechanism: a covered Play state simply stops being ticked.

use crate::WorldBounds;
use crate::config::{ConfigError, GameConfig};
use crate::consts::COUNTDOWN_SECS;
use crate::difficulty::LevelParams;
use crate::events::FrameEvent;
use crate::render::{Align, Surface};
use crate::sim::play::{PlayOutcome, PlayState};

/// Keys the core understands. The driver translates whatever raw input it
/// has (keyboard, touch) into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Fire,
    Pause,
}

/// Currently held movement/fire keys, sampled by the play simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inputs {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Top-level mutable game record, persisting across levels.
#[derive(Debug, Clone)]
pub struct Session {
    pub lives: u32,
    pub score: u32,
    pub level: u32,
    pub bounds: WorldBounds,
    pub inputs: Inputs,
    /// Wall-clock milliseconds supplied by the driver each tick; consumed
    /// only by the rocket fire-rate limiter.
    pub now_ms: f64,
}

impl Session {
    pub fn new(bounds: WorldBounds) -> Self {
        Self {
            lives: 3,
            score: 0,
            level: 1,
            bounds,
            inputs: Inputs::default(),
            now_ms: 0.0,
        }
    }

    fn reset(&mut self) {
        self.lives = 3;
        self.score = 0;
        self.level = 1;
    }
}

/// The pre-level countdown.
#[derive(Debug, Clone)]
pub struct LevelIntro {
    level: u32,
    countdown: f32,
}

impl LevelIntro {
    pub fn new(level: u32) -> Self {
        Self {
            level,
            countdown: COUNTDOWN_SECS,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Countdown display string, stepping down as whole seconds elapse.
    pub fn message(&self) -> &'static str {
        if self.countdown < 1.0 {
            "1"
        } else if self.countdown < 2.0 {
            "2"
        } else {
            "3"
        }
    }

    /// Returns true once the countdown has run out.
    fn tick(&mut self, dt: f32) -> bool {
        self.countdown -= dt;
        self.countdown <= 0.0
    }
}

pub enum GameState {
    Welcome,
    LevelIntro(LevelIntro),
    Play(Box<PlayState>),
    Pause,
    GameOver,
}

impl GameState {
    pub fn name(&self) -> &'static str {
        match self {
            GameState::Welcome => "welcome",
            GameState::LevelIntro(_) => "level-intro",
            GameState::Play(_) => "play",
            GameState::Pause => "pause",
            GameState::GameOver => "game-over",
        }
    }

    fn on_enter(&mut self, session: &Session) {
        match self {
            GameState::Play(play) => play.enter(&session.bounds),
            // the other states carry no entities to set up
            _ => {}
        }
    }

    fn on_leave(&mut self, _session: &Session) {
        // no state needs teardown beyond dropping its data
    }
}

enum StateChange {
    Replace(GameState),
    PushPause,
    PopOverlay,
}

/// The state machine plus everything it dispatches over.
pub struct Game {
    config: GameConfig,
    pub session: Session,
    stack: Vec<GameState>,
    /// Session seed; each level's RNG is derived from it.
    seed: u64,
}

impl Game {
    /// Validates the configuration up front; a bad config never reaches the
    /// simulation.
    pub fn new(config: GameConfig, width: f32, height: f32, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        if width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::DegenerateSurface { width, height });
        }
        let bounds = WorldBounds::new(width, height);
        log::info!("new game session (seed {seed})");
        Ok(Self {
            config,
            session: Session::new(bounds),
            stack: vec![GameState::Welcome],
            seed,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn current(&self) -> Option<&GameState> {
        self.stack.last()
    }

    /// The live play state, if one exists anywhere on the stack (it may be
    /// covered by the pause overlay).
    pub fn play_state(&self) -> Option<&PlayState> {
        self.stack.iter().rev().find_map(|state| match state {
            GameState::Play(play) => Some(play.as_ref()),
            _ => None,
        })
    }

    /// One driver tick: update the current state, then apply whatever
    /// transition it requested.
    pub fn update(&mut self, dt: f32, now_ms: f64, events: &mut Vec<FrameEvent>) {
        self.session.now_ms = now_ms;
        let change = match self.stack.last_mut() {
            Some(GameState::LevelIntro(intro)) => {
                if intro.tick(dt) {
                    let level = intro.level();
                    let params = LevelParams::derive(&self.config, level);
                    let play = PlayState::new(params, level, self.seed);
                    Some(StateChange::Replace(GameState::Play(Box::new(play))))
                } else {
                    None
                }
            }
            Some(GameState::Play(play)) => {
                match play.update(&mut self.session, dt, events) {
                    PlayOutcome::Continue => None,
                    PlayOutcome::GameOver => Some(StateChange::Replace(GameState::GameOver)),
                    // the play simulation already advanced session.level
                    PlayOutcome::LevelCleared => Some(StateChange::Replace(GameState::LevelIntro(
                        LevelIntro::new(self.session.level),
                    ))),
                }
            }
            // Welcome, Pause and GameOver have no per-tick logic
            _ => None,
        };
        if let Some(change) = change {
            self.apply(change);
        }
    }

    pub fn draw(&self, _dt: f32, surface: &mut dyn Surface) {
        let session = &self.session;
        let center_x = session.bounds.width / 2.0;
        let center_y = session.bounds.height / 2.0;
        match self.stack.last() {
            Some(GameState::Welcome) => {
                surface.clear();
                surface.text("Welcome.", center_x, center_y - 50.0, Align::Center);
                surface.text("Press fire to start.", center_x, center_y + 40.0, Align::Center);
            }
            Some(GameState::LevelIntro(intro)) => {
                surface.clear();
                surface.text(&format!("Level {}", intro.level()), center_x, center_y, Align::Center);
                surface.text(
                    &format!("Ready in {}", intro.message()),
                    center_x,
                    center_y + 36.0,
                    Align::Center,
                );
            }
            Some(GameState::Play(play)) => play.draw(session, surface),
            Some(GameState::Pause) => {
                surface.clear();
                surface.text("Paused", center_x, center_y, Align::Center);
            }
            Some(GameState::GameOver) => {
                surface.clear();
                surface.text("Game Over!", center_x, center_y - 40.0, Align::Center);
                surface.text(
                    &format!("You scored {} and got to level {}", session.score, session.level),
                    center_x,
                    center_y,
                    Align::Center,
                );
                surface.text("Press fire to play again.", center_x, center_y + 40.0, Align::Center);
            }
            None => {}
        }
    }

    pub fn key_down(&mut self, key: Key, events: &mut Vec<FrameEvent>) {
        match key {
            Key::Left => self.session.inputs.left = true,
            Key::Right => self.session.inputs.right = true,
            Key::Fire => self.session.inputs.fire = true,
            Key::Pause => {}
        }

        let change = match (self.stack.last_mut(), key) {
            (Some(GameState::Welcome), Key::Fire) | (Some(GameState::GameOver), Key::Fire) => {
                self.session.reset();
                log::info!("starting over at level 1");
                Some(StateChange::Replace(GameState::LevelIntro(LevelIntro::new(1))))
            }
            (Some(GameState::Play(play)), Key::Fire) => {
                play.fire_rocket(self.session.now_ms, events);
                None
            }
            (Some(GameState::Play(_)), Key::Pause) => Some(StateChange::PushPause),
            (Some(GameState::Pause), Key::Pause) => Some(StateChange::PopOverlay),
            _ => None,
        };
        if let Some(change) = change {
            self.apply(change);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.session.inputs.left = false,
            Key::Right => self.session.inputs.right = false,
            Key::Fire => self.session.inputs.fire = false,
            Key::Pause => {}
        }
    }

    fn apply(&mut self, change: StateChange) {
        match change {
            StateChange::Replace(state) => self.replace_top(state),
            StateChange::PushPause => self.push_overlay(GameState::Pause),
            StateChange::PopOverlay => self.pop_overlay(),
        }
    }

    /// Swap the top of the stack: leave the old state, enter the new one.
    fn replace_top(&mut self, mut state: GameState) {
        if let Some(mut old) = self.stack.pop() {
            old.on_leave(&self.session);
        }
        state.on_enter(&self.session);
        log::info!("state -> {}", state.name());
        self.stack.push(state);
    }

    /// Push an overlay without disturbing the state beneath it.
    fn push_overlay(&mut self, mut state: GameState) {
        state.on_enter(&self.session);
        log::info!("overlay -> {}", state.name());
        self.stack.push(state);
    }

    /// Pop the overlay, resuming the state beneath it unchanged.
    fn pop_overlay(&mut self) {
        if let Some(mut old) = self.stack.pop() {
            old.on_leave(&self.session);
            log::info!("overlay <- {}", old.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    const DT: f32 = 0.02;

    fn game() -> Game {
        Game::new(GameConfig::default(), 800.0, 600.0, 42).unwrap()
    }

    /// Drive the game from Welcome into Play.
    fn start_playing(game: &mut Game, events: &mut Vec<FrameEvent>) {
        game.key_down(Key::Fire, events);
        game.key_up(Key::Fire);
        for _ in 0..200 {
            game.update(DT, 0.0, events);
            if matches!(game.current(), Some(GameState::Play(_))) {
                return;
            }
        }
        panic!("never reached play");
    }

    #[test]
    fn starts_in_welcome() {
        let game = game();
        assert!(matches!(game.current(), Some(GameState::Welcome)));
    }

    #[test]
    fn degenerate_surface_is_rejected() {
        assert!(matches!(
            Game::new(GameConfig::default(), 0.0, 600.0, 1),
            Err(ConfigError::DegenerateSurface { .. })
        ));
    }

    #[test]
    fn fire_on_welcome_resets_session_and_enters_intro() {
        let mut game = game();
        game.session.score = 999;
        game.session.level = 7;
        let mut events = Vec::new();

        game.key_down(Key::Fire, &mut events);

        assert!(matches!(game.current(), Some(GameState::LevelIntro(_))));
        assert_eq!(game.session.lives, 3);
        assert_eq!(game.session.score, 0);
        assert_eq!(game.session.level, 1);
    }

    #[test]
    fn countdown_runs_into_a_populated_play_state() {
        let mut game = game();
        let mut events = Vec::new();
        start_playing(&mut game, &mut events);

        let play = game.play_state().unwrap();
        let params = LevelParams::derive(game.config(), 1);
        assert_eq!(play.invaders().len(), (params.ranks * params.files) as usize);
        assert_eq!(play.level(), 1);
    }

    #[test]
    fn countdown_messages_step_down() {
        let mut intro = LevelIntro::new(1);
        assert_eq!(intro.message(), "3");
        intro.tick(1.1);
        assert_eq!(intro.message(), "2");
        intro.tick(1.0);
        assert_eq!(intro.message(), "1");
    }

    #[test]
    fn pause_freezes_play_and_resumes_it_unchanged() {
        let mut game = game();
        let mut events = Vec::new();
        start_playing(&mut game, &mut events);

        // a few live ticks so entities exist and have moved
        game.key_down(Key::Fire, &mut events);
        for tick in 0..5 {
            game.update(DT, tick as f64 * 20.0, &mut events);
        }
        let frozen_x = game.play_state().unwrap().invaders()[0].x;
        let frozen_rockets = game.play_state().unwrap().rockets().len();
        let frozen_score = game.session.score;

        game.key_down(Key::Pause, &mut events);
        assert!(matches!(game.current(), Some(GameState::Pause)));
        assert_eq!(game.stack.len(), 2);

        // paused: many ticks pass, nothing in the covered state moves
        for tick in 0..100 {
            game.update(DT, 1_000.0 + tick as f64 * 20.0, &mut events);
        }
        assert_eq!(game.play_state().unwrap().invaders()[0].x, frozen_x);
        assert_eq!(game.play_state().unwrap().rockets().len(), frozen_rockets);
        assert_eq!(game.session.score, frozen_score);

        // unpause: play is current again and simulation resumes
        game.key_down(Key::Pause, &mut events);
        assert!(matches!(game.current(), Some(GameState::Play(_))));
        assert_eq!(game.stack.len(), 1);
        game.update(DT, 5_000.0, &mut events);
        assert_ne!(game.play_state().unwrap().invaders()[0].x, frozen_x);
    }

    #[test]
    fn exhausted_lives_reach_game_over_and_fire_restarts() {
        let mut game = game();
        let mut events = Vec::new();
        start_playing(&mut game, &mut events);

        // the next play tick notices the empty life pool
        game.session.lives = 0;
        game.update(DT, 0.0, &mut events);
        assert!(matches!(game.current(), Some(GameState::GameOver)));
        assert!(events.iter().any(|e| matches!(e, FrameEvent::GameOver { .. })));

        game.key_down(Key::Fire, &mut events);
        assert!(matches!(game.current(), Some(GameState::LevelIntro(_))));
        assert_eq!(game.session.lives, 3);
        assert_eq!(game.session.score, 0);
    }

    #[test]
    fn cleared_level_moves_to_the_next_intro() {
        let mut game = game();
        let mut events = Vec::new();
        start_playing(&mut game, &mut events);

        // autopilot: hold fire and drift right; the level eventually clears
        // or the formation lands, and either way the machine must leave Play
        let mut ticks = 0u32;
        game.key_down(Key::Fire, &mut events);
        game.key_down(Key::Right, &mut events);
        while matches!(game.current(), Some(GameState::Play(_))) && ticks < 100_000 {
            game.update(DT, ticks as f64 * 20.0, &mut events);
            ticks += 1;
        }
        assert!(ticks < 100_000, "play never terminated");
        match game.current() {
            Some(GameState::LevelIntro(intro)) => {
                assert_eq!(intro.level(), 2);
                assert_eq!(game.session.level, 2);
                assert!(game.session.score >= crate::consts::LEVEL_CLEAR_BONUS);
            }
            Some(GameState::GameOver) => {
                // formation landed first; still a legal terminal outcome
                assert!(events.iter().any(|e| matches!(e, FrameEvent::GameOver { .. })));
            }
            other => panic!("unexpected state {:?}", other.map(|s| s.name())),
        }
    }

    #[test]
    fn draw_describes_the_current_state_only() {
        let mut game = game();
        let mut events = Vec::new();

        let mut surface = RecordingSurface::default();
        game.draw(DT, &mut surface);
        assert!(surface.texts.iter().any(|t| t.contains("Welcome")));
        assert!(surface.sprites.is_empty());

        start_playing(&mut game, &mut events);
        let mut surface = RecordingSurface::default();
        game.draw(DT, &mut surface);
        assert!(!surface.sprites.is_empty());
        assert!(surface.texts.iter().any(|t| t.starts_with("Score:")));

        game.key_down(Key::Pause, &mut events);
        let mut surface = RecordingSurface::default();
        game.draw(DT, &mut surface);
        assert_eq!(surface.texts, vec!["Paused".to_owned()]);
        assert!(surface.sprites.is_empty());
    }
}
