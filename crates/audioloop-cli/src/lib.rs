//! audioloop CLI library.
//!
//! Command implementations and output formatting for the `audioloop`
//! binary. The heavy lifting lives in `audioloop-render` (script
//! preparation and interpreter driving) and `audioloop-analysis`
//! (features, psychoacoustics, comparison, spectrograms); this crate wires
//! them into terminal-facing commands with human and JSON output modes.

pub mod commands;
pub mod layout;
pub mod output;
pub mod play;
