//! Download drains
//!
//! No explicit end-of-data signal exists beyond the data connection
//! closing or going quiet, so reads continue until EOF or a timeout on
//! the underlying stream ends the drain.

use log::{debug, error};
use std::io::Read;

use crate::connection::control::is_timeout;

const READ_CHUNK_SIZE: usize = 8192;

/// Drain everything currently deliverable from `source`.
///
/// Stops on EOF, on a read timeout, or on any other read error; whatever
/// arrived before that is returned.
pub(crate) fn drain_available<R: Read>(source: &mut R) -> Vec<u8> {
    let mut out = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        match source.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                out.extend_from_slice(&chunk[..n]);
                debug!("Drained {} bytes, total {}", n, out.len());
            }
            Err(e) if is_timeout(&e) => break,
            Err(e) => {
                error!("Data connection read failed: {}", e);
                break;
            }
        }
    }

    out
}

/// Drain the data connection into a growable text accumulator
pub fn read_to_string<R: Read>(source: &mut R) -> String {
    String::from_utf8_lossy(&drain_available(source)).into_owned()
}

/// Drain the data connection into a fixed caller buffer, returning the
/// number of bytes stored; bytes past the buffer's end are read and
/// dropped so the stream is left drained either way
pub fn read_into_buffer<R: Read>(source: &mut R, buf: &mut [u8]) -> usize {
    let mut filled = 0;
    let mut scratch = [0u8; READ_CHUNK_SIZE];

    loop {
        if filled == buf.len() {
            match source.read(&mut scratch) {
                Ok(0) => break,
                Ok(n) => debug!("Dropped {} bytes past caller buffer", n),
                Err(_) => break,
            }
            continue;
        }

        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if is_timeout(&e) => break,
            Err(e) => {
                error!("Data connection read failed: {}", e);
                break;
            }
        }
    }

    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_to_string_drains_everything() {
        let mut source = Cursor::new("station,temp\nroof,21.5\n");
        assert_eq!(read_to_string(&mut source), "station,temp\nroof,21.5\n");
    }

    #[test]
    fn test_read_to_string_empty_stream() {
        let mut source = Cursor::new("");
        assert_eq!(read_to_string(&mut source), "");
    }

    #[test]
    fn test_read_into_buffer_fills_and_reports_length() {
        let mut source = Cursor::new(b"abcdef".to_vec());
        let mut buf = [0u8; 16];
        let n = read_into_buffer(&mut source, &mut buf);
        assert_eq!(n, 6);
        assert_eq!(&buf[..n], b"abcdef");
    }

    #[test]
    fn test_read_into_buffer_truncates_at_capacity() {
        let mut source = Cursor::new(vec![0x42; 100]);
        let mut buf = [0u8; 32];
        let n = read_into_buffer(&mut source, &mut buf);
        assert_eq!(n, 32);
        assert!(buf.iter().all(|&b| b == 0x42));
        // Stream was left drained
        assert_eq!(drain_available(&mut source), Vec::<u8>::new());
    }
}
