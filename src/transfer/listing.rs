//! Directory listing readers
//!
//! Drains newline-delimited entries off the data connection into a
//! bounded list; entries past the cap are silently dropped. MLSD entries
//! are passed through for the caller to field-parse; LIST entries are
//! reduced to the filename after the last space of the listing line.

use log::{debug, info};
use std::io::Read;

use crate::transfer::download::drain_available;

/// Entry cap for MLSD-style listings
pub const MLSD_MAX_ENTRIES: usize = 256;

/// Entry cap for LIST-style listings
pub const LIST_MAX_ENTRIES: usize = 128;

/// Read newline-delimited entries from the data connection, keeping at
/// most `max_entries` of them
pub fn read_listing<R: Read>(source: &mut R, max_entries: usize) -> Vec<String> {
    let raw = drain_available(source);
    let text = String::from_utf8_lossy(&raw);

    let listing: Vec<String> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .take(max_entries)
        .map(String::from)
        .collect();

    for (i, entry) in listing.iter().enumerate() {
        debug!("{}:{}", i, entry);
    }
    info!("Read {} directory entries", listing.len());

    listing
}

/// Extract the filename from a multi-field LIST line: the substring after
/// the last space, or the whole line when there is none
pub fn filename_from_list_entry(entry: &str) -> &str {
    match entry.rfind(' ') {
        Some(idx) => &entry[idx + 1..],
        None => entry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_listing_splits_lines() {
        let mut source = Cursor::new("type=file; a.txt\r\ntype=dir; logs\r\n");
        let listing = read_listing(&mut source, MLSD_MAX_ENTRIES);
        assert_eq!(listing, vec!["type=file; a.txt", "type=dir; logs"]);
    }

    #[test]
    fn test_read_listing_skips_blank_lines() {
        let mut source = Cursor::new("a.txt\r\n\r\nb.txt\r\n");
        let listing = read_listing(&mut source, MLSD_MAX_ENTRIES);
        assert_eq!(listing, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_read_listing_drops_entries_past_cap() {
        let body: String = (0..10).map(|i| format!("file{i}.txt\r\n")).collect();
        let mut source = Cursor::new(body);
        let listing = read_listing(&mut source, 4);
        assert_eq!(listing.len(), 4);
        assert_eq!(listing[3], "file3.txt");
    }

    #[test]
    fn test_filename_after_last_space() {
        let entry = "-rw-r--r-- 1 ftp ftp 1048576 May 21 10:45 report.csv";
        assert_eq!(filename_from_list_entry(entry), "report.csv");
    }

    #[test]
    fn test_filename_without_spaces_is_whole_entry() {
        assert_eq!(filename_from_list_entry("report.csv"), "report.csv");
    }

    #[test]
    fn test_empty_listing() {
        let mut source = Cursor::new("");
        assert!(read_listing(&mut source, LIST_MAX_ENTRIES).is_empty());
    }
}
