//! # Tank Architecture
//!
//! Tank keeps named fish records for a shared aquarium. Every fish is a
//! directory under a storage root holding a single JSON `info` document.
//! There is no database: uniqueness, atomicity and recovery from partial
//! failures all come from the filesystem protocol in [`store`].
//!
//! Tank is a library first. The `tank` binary is one thin client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (tank crate)                                           │
//! │  - Parses arguments, reads JSON input, prints envelopes     │
//! │  - The ONLY place that knows about stdout/exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Emits one operation log entry per call (oplog.rs)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Validation, normalization, merge rules                   │
//! │  - Holds the per-name lock across check-then-write          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DataStore trait over a StorageBackend                    │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values and returns
//! `Result<CmdResult>`. It never writes to stdout or stderr and never exits
//! the process. Diagnostics go through the `log` facade; whoever embeds the
//! library decides where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: Facade and operation log wiring
//! - [`commands`]: One module per operation
//! - [`config`]: Layered configuration (`tank.toml` + `TANK_*` environment)
//! - [`error`]: [`TankError`](error::TankError) and its classification
//! - [`model`]: [`Fish`](model::Fish) and its untrusted form [`RawFish`](model::RawFish)
//! - [`names`]: Fish name validation
//! - [`normalize`]: Canonicalization of untrusted attributes
//! - [`oplog`]: Operation log entries and sinks
//! - [`store`]: Directory-backed persistence

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod names;
pub mod normalize;
pub mod oplog;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
