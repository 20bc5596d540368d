//! Control connection management
//!
//! Owns the TCP stream carrying FTP commands and numeric replies. Reply
//! reads are bounded two ways: the configured timeout caps how long we
//! wait for the first byte, and [`RESPONSE_BUFFER_SIZE`] caps how much of
//! a reply burst is kept; bytes past capacity are drained and dropped in
//! the same pass.

use log::{debug, info, warn};
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{FtpClientError, Result};

/// Capacity of the reply line buffer; longer replies are truncated
pub const RESPONSE_BUFFER_SIZE: usize = 1024;

/// Short timeout used to drain the tail of a reply burst after the first
/// read returned
const DRAIN_TIMEOUT: Duration = Duration::from_millis(50);

/// Raw bytes of one control-connection reply
#[derive(Debug)]
pub struct RawReply {
    pub bytes: Vec<u8>,
    pub truncated: bool,
}

/// Manages the FTP control connection (main command channel)
pub struct ControlConnection {
    stream: Option<TcpStream>,
    timeout: Duration,
}

impl ControlConnection {
    pub fn new(timeout: Duration) -> Self {
        Self {
            stream: None,
            timeout,
        }
    }

    /// Connect to the FTP server with the configured timeout
    pub fn connect(&mut self, host: &str, port: u16) -> Result<()> {
        let addr = resolve(host, port)?;

        let stream = TcpStream::connect_timeout(&addr, self.timeout).map_err(|e| match e.kind() {
            io::ErrorKind::TimedOut => {
                FtpClientError::ConnectionTimeout(format!("Connect to {addr} timed out"))
            }
            io::ErrorKind::ConnectionRefused => {
                FtpClientError::ConnectionRefused(format!("Connection refused to {addr}"))
            }
            _ => FtpClientError::Io(e),
        })?;

        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        self.stream = Some(stream);
        info!("Connected to FTP server at {}:{}", host, port);
        Ok(())
    }

    /// Check if the connection is open
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Send one command line, appending the CRLF terminator
    pub fn send_line(&mut self, line: &str) -> Result<()> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| FtpClientError::NotConnected("Control connection not open".to_string()))?;

        let result = stream
            .write_all(format!("{line}\r\n").as_bytes())
            .and_then(|_| stream.flush());

        match result {
            Ok(()) => {
                debug!("Sent command line ({} bytes)", line.len() + 2);
                Ok(())
            }
            Err(e) => match e.kind() {
                io::ErrorKind::BrokenPipe | io::ErrorKind::ConnectionAborted => {
                    self.stream = None;
                    Err(FtpClientError::ConnectionLost(
                        "Connection lost while sending".to_string(),
                    ))
                }
                _ => Err(FtpClientError::Io(e)),
            },
        }
    }

    /// Read one reply burst off the control connection.
    ///
    /// Blocks up to the configured timeout for the first byte; a silent
    /// server yields `ConnectionTimeout`, a closed peer `ConnectionLost`.
    /// Once data arrives, everything the server sent in the same burst is
    /// drained; at most [`RESPONSE_BUFFER_SIZE`] bytes are kept and the
    /// remainder is dropped with `truncated` set.
    pub fn read_raw_reply(&mut self) -> Result<RawReply> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| FtpClientError::NotConnected("Control connection not open".to_string()))?;

        let mut chunk = [0u8; RESPONSE_BUFFER_SIZE];
        let mut bytes = Vec::with_capacity(RESPONSE_BUFFER_SIZE);

        stream.set_read_timeout(Some(self.timeout))?;
        let n = match stream.read(&mut chunk) {
            Ok(0) => {
                self.stream = None;
                return Err(FtpClientError::ConnectionLost(
                    "Connection closed by server".to_string(),
                ));
            }
            Ok(n) => n,
            Err(e) if is_timeout(&e) => {
                warn!("No reply within {:?}", self.timeout);
                return Err(FtpClientError::ConnectionTimeout(
                    "Timed out waiting for reply".to_string(),
                ));
            }
            Err(e) => return Err(FtpClientError::Io(e)),
        };

        let mut truncated = push_capped(&mut bytes, &chunk[..n]);

        // Drain whatever else arrived in the same burst
        stream.set_read_timeout(Some(DRAIN_TIMEOUT))?;
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => truncated |= push_capped(&mut bytes, &chunk[..n]),
                Err(e) if is_timeout(&e) => break,
                Err(e) => return Err(FtpClientError::Io(e)),
            }
        }
        stream.set_read_timeout(Some(self.timeout))?;

        if truncated {
            warn!("Reply exceeded {} bytes, tail dropped", RESPONSE_BUFFER_SIZE);
        }

        Ok(RawReply { bytes, truncated })
    }

    /// Close the control connection, ignoring shutdown errors
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
            info!("Control connection closed");
        }
    }
}

impl Drop for ControlConnection {
    fn drop(&mut self) {
        self.close();
    }
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| FtpClientError::InvalidHost(format!("Cannot resolve '{host}': {e}")))?
        .next()
        .ok_or_else(|| FtpClientError::InvalidHost(format!("No address for '{host}'")))
}

/// Copy into `buf` up to the response capacity, reporting whether any
/// bytes were dropped
fn push_capped(buf: &mut Vec<u8>, incoming: &[u8]) -> bool {
    let room = RESPONSE_BUFFER_SIZE - buf.len();
    let take = room.min(incoming.len());
    buf.extend_from_slice(&incoming[..take]);
    incoming.len() > take
}

pub(crate) fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
