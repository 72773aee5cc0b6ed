//! Value Objects
//!
//! Immutable value types shared across the domain.

mod category;
mod development_level;
mod difficulty;
mod feedback;
mod quest_status;

pub use category::*;
pub use development_level::*;
pub use difficulty::*;
pub use feedback::*;
pub use quest_status::*;
