//! Lead notifications over WhatsApp
//!
//! `message` formats the human-readable lead summary; `relay` delivers it
//! through an Evolution API instance.

pub mod message;
pub mod relay;

pub use message::build_message;
pub use relay::RelayClient;
