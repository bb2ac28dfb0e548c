//! Argument parsing, context wiring and output for the `tank` binary.
//!
//! - `setup`: clap definitions
//! - `commands`: context initialization and dispatch
//! - `render`: JSON envelopes and status classes

mod commands;
mod render;
pub mod setup;

pub use commands::run;
