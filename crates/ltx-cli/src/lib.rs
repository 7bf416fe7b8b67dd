//! Library side of the `ltx-precompute` binary.

pub mod logging;
pub mod pipeline;
