//! # Utilities Module
//!
//! Bounded arithmetic shared by every coordinate type.

pub mod math;

pub use math::*;
