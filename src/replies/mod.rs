//! FTP reply parsing module

pub mod codes;
pub mod parser;

// Re-export main types
pub use parser::{Reply, parse_mdtm_timestamp};
