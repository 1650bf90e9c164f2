//! Wanderlens Deterministic Scenario Harness
//!
//! This crate drives the tour scheduler through long, fully
//! deterministic runs against synthetic worlds. Every source of
//! variation is seeded:
//! - **World**: regions, rooms, gates, and anchors generated from a seed
//! - **Time**: virtual, advanced tick by tick at a fixed rate
//! - **Tour**: the controller's own RNG derives from the same seed
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   ScenarioRunner                     │
//! │   picks configs, drives ticks, asserts invariants    │
//! └──────────┬──────────────────────────────┬────────────┘
//!            │ on_tick(world, dt)           │ tick(dt)
//!     ┌──────▼────────┐              ┌──────▼───────┐
//!     │ TourController│◄────────────►│   SimWorld   │
//!     │  (the tour)   │  WorldModel  │ (seeded fake)│
//!     └───────────────┘              └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use wanderlens_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let result = ScenarioRunner::new(42)
//!     .with_duration(600.0)
//!     .run(ScenarioId::StormChaser);
//! assert!(result.passed);
//! ```

mod runner;
pub mod scenarios;
mod world;

pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use world::{SimConfig, SimWorld};
