//! Events emitted within a single tick, drained by the driver.
//!
//! Sounds are requests toward the audio collaborator; the core never learns
//! whether playback happened. The remaining variants exist for HUDs and logs.

/// Sound effects the core may request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// Rocket launched
    Shoot,
    /// Invader or saucer destroyed
    Bang,
    /// Ship hit or overrun
    Explosion,
}

impl Sound {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sound::Shoot => "shoot",
            Sound::Bang => "bang",
            Sound::Explosion => "explosion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    Sound(Sound),
    InvaderKilled { points: u32 },
    SaucerKilled { points: u32 },
    ShipHit { lives_left: u32 },
    LevelCleared { level: u32, bonus: u32 },
    GameOver { score: u32, level: u32 },
}
