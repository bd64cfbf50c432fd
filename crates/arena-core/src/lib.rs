//! # arena-core
//!
//! Core types for the arena session lifecycle engine.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other arena crates. It provides:
//!
//! - Geometry types (WorldId, Position, squared distance)
//! - Zone types (ZoneShape containment tests, Zone)
//! - Lifecycle phases (SessionPhase and its legality table)
//! - Identity types (ActorId, SessionId)
//! - Transfer routing (TransferMap, TransferPoint)
//! - Error types
//! - Engine configuration
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other arena crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod actor;
pub mod config;
pub mod error;
pub mod geometry;
pub mod phase;
pub mod session;
pub mod zone;

pub use actor::ActorId;
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use geometry::{Position, WorldId};
pub use phase::SessionPhase;
pub use session::{SessionId, SessionSnapshot, TransferMap, TransferPoint};
pub use zone::{Zone, ZoneShape};
