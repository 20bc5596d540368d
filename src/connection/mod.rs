//! Connection management for the FTP engine
//!
//! Two independently-lived byte streams per session: the persistent
//! control connection carrying commands and replies, and the short-lived
//! passive-mode data connection carrying file and listing payloads.

pub mod control;
pub mod data;
pub mod passive;

// Re-export main types
pub use control::{ControlConnection, RESPONSE_BUFFER_SIZE, RawReply};
pub use data::DataConnection;
pub use passive::PassiveEndpoint;
