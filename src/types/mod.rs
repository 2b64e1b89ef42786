//! Core types for titan-invoke.

pub mod generation;
pub mod usage;

pub use generation::*;
pub use usage::*;
