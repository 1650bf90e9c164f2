//! Wanderlens World Abstraction Layer
//!
//! This crate provides the seam between the tour scheduler and whatever
//! actually hosts the partitioned world: a live game process in production,
//! or a deterministic stand-in under test.
//!
//! # Core Concept: The World Seam
//!
//! The scheduler never touches the world directly. Everything it needs
//! flows through [`WorldModel`]:
//! - which region is loaded, and the rooms it contains
//! - realizing a room (loading it so its camera anchors exist)
//! - abstractizing a room (releasing it once the camera has left)
//! - the world's cycle clock and the camera itself
//!
//! Because the trait is synchronous and takes `&mut self`, a tour driven
//! against [`StaticWorld`] with a fixed seed replays exactly.

mod error;
mod model;
mod region;
mod static_world;

pub use error::WorldError;
pub use model::{CyclePhase, RoomStub, WorldModel, GATE_PREFIX};
pub use region::RegionCode;
pub use static_world::{RegionTemplate, StaticWorld};
