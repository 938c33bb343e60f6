//! Star Swarm headless driver
//!
//! Runs the fixed-tick game loop without a renderer: a scripted autopilot
//! holds fire and sweeps the ship while frame events are logged. Mostly a
//! smoke-test harness; a real front end supplies its own driver, surface
//! and audio sink.

use std::time::{SystemTime, UNIX_EPOCH};

use star_swarm::render::NullSurface;
use star_swarm::{FrameEvent, Game, GameConfig, GameState, Key};

/// Hard stop for the demo run (ten minutes of simulated time at 50 fps).
const MAX_TICKS: u64 = 30_000;

fn main() {
    env_logger::init();

    let config = GameConfig::default();
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut game = match Game::new(config, 800.0, 600.0, seed) {
        Ok(game) => game,
        Err(err) => {
            log::error!("bad configuration: {err}");
            std::process::exit(1);
        }
    };

    let dt = game.config().tick_dt();
    let mut surface = NullSurface;
    let mut events: Vec<FrameEvent> = Vec::new();

    log::info!("demo run, seed {seed}");

    // Start from the welcome screen the way a player would.
    game.key_down(Key::Fire, &mut events);
    game.key_up(Key::Fire);

    let mut now_ms = 0.0_f64;
    for tick in 0..MAX_TICKS {
        now_ms += f64::from(dt) * 1000.0;

        // Autopilot: always firing, drifting toward whichever half of the
        // play area holds more invaders.
        let steer_left = game.play_state().map(|play| {
            let center = play.ship().x;
            let left_count = play.invaders().iter().filter(|i| i.x < center).count();
            left_count * 2 > play.invaders().len()
        });
        if let Some(go_left) = steer_left {
            game.key_down(Key::Fire, &mut events);
            game.key_down(if go_left { Key::Left } else { Key::Right }, &mut events);
            game.key_up(if go_left { Key::Right } else { Key::Left });
        }

        game.update(dt, now_ms, &mut events);
        game.draw(dt, &mut surface);

        for event in events.drain(..) {
            match event {
                FrameEvent::Sound(sound) => log::trace!("sound: {}", sound.as_str()),
                FrameEvent::LevelCleared { level, bonus } => {
                    log::info!("level {level} cleared (+{bonus})")
                }
                FrameEvent::GameOver { score, level } => {
                    log::info!("game over at level {level} with {score} points")
                }
                other => log::debug!("{other:?}"),
            }
        }

        if matches!(game.current(), Some(GameState::GameOver)) {
            log::info!("demo finished after {tick} ticks");
            break;
        }
    }

    println!(
        "final score {} at level {} ({} lives left)",
        game.session.score, game.session.level, game.session.lives
    );
}
