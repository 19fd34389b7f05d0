//! Core logic — no terminal I/O, no rendering.
//!
//! Everything here is plain data plus the state transitions the
//! column-visibility control is built from.

pub mod anchor;
pub mod columns;
pub mod dataset;
pub mod dismissal;
pub mod placement;
pub mod pointer;
