//! Data connection management
//!
//! The short-lived passive-mode stream carrying file and listing
//! payloads. At most one exists per session; the session owns it
//! exclusively between passive negotiation and `close_data_client`.

use log::{debug, info};
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use crate::connection::passive::PassiveEndpoint;
use crate::error::{FtpClientError, Result};

/// Passive-mode FTP data connection
pub struct DataConnection {
    stream: TcpStream,
}

impl DataConnection {
    /// Connect to the endpoint a 227 reply advertised
    pub fn connect(endpoint: &PassiveEndpoint, timeout: Duration) -> Result<Self> {
        let addr = SocketAddr::from((endpoint.addr, endpoint.port));
        debug!("Opening data connection to {}", addr);

        let stream = TcpStream::connect_timeout(&addr, timeout).map_err(|e| {
            FtpClientError::DataConnectionFailed(format!("Connect to {addr} failed: {e}"))
        })?;

        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;

        info!("Data connection established to {}", addr);
        Ok(Self { stream })
    }

    /// Shut the connection down, ignoring errors; the final control reply
    /// is the session's to collect
    pub fn shutdown(self) {
        let _ = self.stream.shutdown(Shutdown::Both);
        debug!("Data connection closed");
    }
}

impl Read for DataConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for DataConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}
