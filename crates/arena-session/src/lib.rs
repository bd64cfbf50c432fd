//! # arena-session
//!
//! Session lifecycle management for the arena workspace.
//!
//! This crate provides:
//! - The [`GameLobby`] contract every concrete game type implements
//! - The shared lifecycle engine (open/close/tick/finish, zone scan,
//!   faction assignment)
//! - The [`SessionRegistry`] with its exclusive actor→session occupancy map
//! - Tick scheduling ([`TickScheduler`], [`ManualScheduler`]) and an optional
//!   tokio-driven runner
//!
//! ## Concurrency contract
//!
//! The engine is single-threaded and cooperative: all ticks and command
//! operations are expected to interleave on one logical thread, so nothing
//! here takes a lock. Hosts that drive the registry from an async runtime
//! should use a current-thread runtime (see [`runner`]).

#![warn(missing_docs)]
#![warn(clippy::all)]

mod engine;
pub mod event;
pub mod host;
pub mod lobby;
pub mod occupancy;
pub mod registry;
pub mod runner;
pub mod scheduler;
pub mod state;
pub mod testing;

// Re-export commonly used types
pub use event::{SessionEvent, SessionListener};
pub use host::Host;
pub use lobby::GameLobby;
pub use occupancy::Occupancy;
pub use registry::SessionRegistry;
pub use scheduler::{ManualScheduler, TaskHandle, TickScheduler};
pub use state::{Factions, SessionState};
