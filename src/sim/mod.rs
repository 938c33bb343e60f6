//! Deterministic simulation module
//!
//! All active-play logic lives here. This module must be pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entities;
pub mod formation;
pub mod play;

pub use collision::Box2;
pub use entities::{Bomb, Invader, Rocket, Saucer, Ship};
pub use formation::{BoundaryHit, Formation};
pub use play::{PlayOutcome, PlayState};
