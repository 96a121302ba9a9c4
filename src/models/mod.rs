//! Data models for the HouseHunt backend.
//!
//! Field names serialize in camelCase to match the web client's documents.

mod media;
mod property;
mod shortlist;

pub use media::*;
pub use property::*;
pub use shortlist::*;
