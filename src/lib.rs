//! # lextet
//!
//! Isomorph-free lexicographic enumeration of triangulated 3-dimensional
//! normal pseudomanifolds, classified by the Euler characteristics and
//! orientability of their vertex links.

pub mod admissibility;
pub mod canonicity;
pub mod classify;
pub mod complex;
pub mod driver;
pub mod emit;
pub mod face_table;
pub mod limits;
pub mod search;
pub mod types;

pub use complex::ComplexState;
pub use driver::{run, RunSummary};
