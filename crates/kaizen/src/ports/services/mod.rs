//! Service Ports
//!
//! Abstract interfaces for external collaborators: the text generator
//! and the celebration notifier.

mod generator;
mod notifier;

pub use generator::*;
pub use notifier::*;
