//! Command implementations.
//!
//! Every command returns `Result<ExitCode>`: `Ok` carries the exit code
//! for outcomes the command classified itself (0 success, 1 content
//! error), while `Err` bubbles up to `main` as a system error (exit 2).

pub mod analyze;
pub mod compare;
pub mod iterate;
pub mod play;
pub mod render;
