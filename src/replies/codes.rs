//! FTP reply code definitions
//!
//! The engine only discriminates success class from error class; the
//! constants below are the handful of codes it synthesizes itself or
//! branches on.

/// Synthetic code reported when the control connection is absent or a
/// reply read timed out with no data
pub const NOT_CONNECTED: u16 = 426;

/// Synthetic code reported when the passive data-socket connect fails
pub const DATA_CONNECTION_ERROR: u16 = 425;

/// Synthetic code reported when a locally-driven action completed
pub const ACTION_SUCCESS: u16 = 200;

/// Malformed server reply or contract violation
pub const SYNTAX_ERROR: u16 = 500;

/// Server is advertising a passive-mode data endpoint
pub const ENTERING_PASSIVE_MODE: u16 = 227;

/// Requested action not taken; also what servers answer to MKD when the
/// directory already exists
pub const FILE_UNAVAILABLE: u16 = 550;

/// Check whether a reply code signals operation failure.
///
/// Everything in `[400, 600)` is the error class; 1xx/2xx/3xx replies are
/// deliberately not told apart.
pub fn is_error_class(code: u16) -> bool {
    (400..600).contains(&code)
}
