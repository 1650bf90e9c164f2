//! Wanderlens Core - Autonomous Exploration & Transition Scheduler
//!
//! A tick-driven "tour guide" for a partitioned virtual world. On every
//! tick the scheduler decides three things:
//! 1. **Which region** is active - a shuffled campaign order with a
//!    visited set, so every region gets seen before any repeats
//! 2. **Which room** inside it is on screen - gate corridors excluded,
//!    recent rooms held in a short history so the tour keeps moving
//! 3. **Where the camera rests** - per-room vantage anchors walked
//!    according to the configured camera mode, with eased glides between
//!
//! The world itself stays behind the [`wanderlens_world::WorldModel`]
//! seam; all randomness flows from a single seed, so a whole tour replays
//! exactly from `(config, seed)`.

pub mod config;
pub mod controller;
pub mod countdown;
pub mod directory;
pub mod error;
pub mod events;
pub mod rotation;
pub mod selector;
pub mod transition;

// Re-export key types for convenience
pub use config::{RotationTrigger, TourConfig};
pub use controller::TourController;
pub use error::TourError;
pub use events::TourEvent;
pub use selector::CameraMode;
