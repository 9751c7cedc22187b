//! # Domain Models
//!
//! Pure types shared across the workspace, with `serde` as the only dependency.
//! No I/O, networking or business logic lives here.

pub mod config;
pub mod constants;
pub mod registry;
