//! Package Pricing Module
//!
//! Tier resolution and package discount calculation for booking selections.

mod engine;
pub mod money;
mod tier;

pub use engine::*;
pub use tier::*;
