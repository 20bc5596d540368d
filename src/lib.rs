//! Minimal FTP client protocol engine.
//!
//! Drives a control connection through USER/PASS authentication, issues
//! FTP commands, classifies numeric reply codes, negotiates a passive-mode
//! data connection and moves bytes over it with bounded buffering.
//!
//! Every session operation reports its outcome as a [`Reply`] carrying the
//! server's 3-digit code; codes in `[400, 600)` are the error class,
//! everything else counts as success. Transport and configuration failures
//! surface through [`FtpClientError`] at the connection and config seams,
//! and are folded into synthetic reply codes at the session surface.

pub mod commands;
pub mod config;
pub mod connection;
pub mod error;
pub mod replies;
pub mod session;
pub mod transfer;

mod paths;

pub use commands::FtpCommand;
pub use config::SessionConfig;
pub use connection::passive::PassiveEndpoint;
pub use error::{FtpClientError, Result};
pub use replies::{Reply, codes};
pub use session::FtpSession;
