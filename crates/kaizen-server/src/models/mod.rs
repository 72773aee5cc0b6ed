//! Kaizen API Models
//!
//! Request/response DTOs for the HTTP surface. Domain types stay in the
//! kaizen crate; everything here is wire shape only.

mod player;
mod quest;

pub use player::*;
pub use quest::*;
