//! Data-connection transfer mechanics
//!
//! Bounded-buffer upload chunking and drain-style reads for listings and
//! downloads. Everything here is generic over `Read`/`Write` so the
//! session can hand it the live data connection and tests can hand it
//! in-memory streams.

pub mod download;
pub mod listing;
pub mod writer;

// Re-export main entry points
pub use download::{read_into_buffer, read_to_string};
pub use listing::{LIST_MAX_ENTRIES, MLSD_MAX_ENTRIES, filename_from_list_entry, read_listing};
pub use writer::{BufferedWriter, TRANSFER_BUFFER_SIZE};
