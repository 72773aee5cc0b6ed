//! External Services
//!
//! Adapters for outbound concerns: the Anthropic quest generator, the
//! write-behind document flusher and the celebration log sink.

mod anthropic;
mod notify;
mod sync;

pub use anthropic::AnthropicGenerator;
pub use notify::LogNotifier;
pub use sync::SyncWriter;
