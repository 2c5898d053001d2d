//! Vitrine Demos
//!
//! The gallery's page catalog and the models behind its interactive demos.

pub mod catalog;
pub mod travel;

pub use catalog::{find_demo, source_ids, Demo, CATALOG};
pub use travel::{SliderSpec, TravelInputs, TravelTime, TravelTimeError};
