//! clwrap driver library: job file loading and logging setup for the
//! `clwrap` binary. The compute wrapper itself is the `clwrap-gpu` crate.

pub mod job;
pub mod logging;

pub use clwrap_gpu as gpu;
