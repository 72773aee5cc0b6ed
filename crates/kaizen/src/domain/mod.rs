//! Domain Layer
//!
//! Pure progression logic without infrastructure dependencies.
//! Contains entities, value objects, the fixed catalog, the completion
//! transition, and errors.

pub mod catalog;
pub mod entities;
pub mod errors;
pub mod progression;
pub mod value_objects;

// Re-exports for convenience
pub use entities::*;
pub use errors::*;
pub use progression::*;
pub use value_objects::*;
