//! FTP command session
//!
//! The public surface of the engine. Sequences control-connection
//! commands through authentication, navigation and directory management,
//! and coordinates passive-mode negotiation and buffered data transfer.
//!
//! Every operation reports a [`Reply`]; codes in `[400, 600)` mean the
//! operation failed. The cached `connected` flag tracks the outcome of
//! the most recent reply: any error-class or unreadable reply clears it,
//! any successfully parsed non-error reply sets it. Operations guard on
//! that flag and answer the synthetic not-connected code (426) without
//! touching the network when it is clear.

use log::{debug, error, info, warn};
use std::thread;
use std::time::Duration;

use crate::commands::FtpCommand;
use crate::config::SessionConfig;
use crate::connection::{ControlConnection, DataConnection, PassiveEndpoint};
use crate::paths::cumulative_prefixes;
use crate::replies::{Reply, codes};
use crate::transfer::{
    BufferedWriter, LIST_MAX_ENTRIES, MLSD_MAX_ENTRIES, filename_from_list_entry, read_into_buffer,
    read_listing, read_to_string,
};

/// Maximum number of PASV commands sent while waiting for a 227 reply
const PASV_MAX_ATTEMPTS: usize = 5;

/// Delay between PASV re-sends
const PASV_RETRY_DELAY: Duration = Duration::from_secs(1);

/// An FTP session: one control connection, at most one live data
/// connection, and the credentials to authenticate with.
///
/// Reusable across connections: after [`close_connection`] a subsequent
/// [`open_connection`] starts over against the same server.
///
/// [`close_connection`]: FtpSession::close_connection
/// [`open_connection`]: FtpSession::open_connection
pub struct FtpSession {
    config: SessionConfig,
    control: ControlConnection,
    data: Option<DataConnection>,
    writer: BufferedWriter,
    connected: bool,
    ascii_mode: bool,
}

impl FtpSession {
    /// Create a session from the given configuration; no network traffic
    /// happens until [`open_connection`](FtpSession::open_connection)
    pub fn new(config: SessionConfig) -> Self {
        info!("Creating FTP session: {}", config);
        let timeout = config.timeout();

        Self {
            config,
            control: ControlConnection::new(timeout),
            data: None,
            writer: BufferedWriter::new(),
            connected: false,
            ascii_mode: false,
        }
    }

    /// Open the control connection and authenticate.
    ///
    /// Reads the greeting, then sends USER and PASS in turn. The first
    /// error-class reply aborts the sequence and is returned; otherwise
    /// the PASS reply is the overall result.
    pub fn open_connection(&mut self) -> Reply {
        info!("Connecting to {}:{}", self.config.host(), self.config.port());

        if let Err(e) = self.control.connect(self.config.host(), self.config.port()) {
            error!("Control connect failed: {}", e);
            self.connected = false;
            return Reply::offline();
        }

        let greeting = self.read_reply();
        if greeting.is_error() {
            return greeting;
        }

        let user = FtpCommand::User(self.config.username().to_string());
        let reply = self.command(&user);
        if reply.is_error() {
            return reply;
        }

        let pass = FtpCommand::Pass(self.config.password().to_string());
        self.command(&pass)
    }

    /// Send QUIT and release both connections; no reply is required
    pub fn close_connection(&mut self) {
        if self.control.is_open() {
            let _ = self.control.send_line(&FtpCommand::Quit.to_ftp_string());
        }
        self.control.close();
        if let Some(data) = self.data.take() {
            data.shutdown();
        }
        self.connected = false;
        self.ascii_mode = false;
        info!("Connection closed");
    }

    /// Cached connection state from the most recent reply; does not probe
    /// the network
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// True once TYPE A has been acknowledged for this connection
    pub fn is_ascii_mode(&self) -> bool {
        self.ascii_mode
    }

    /// CWD - change the server working directory
    pub fn change_work_dir(&mut self, dir: &str) -> Reply {
        if let Some(reply) = self.not_connected_guard("change_work_dir") {
            return reply;
        }
        self.command(&FtpCommand::Cwd(dir.to_string()))
    }

    /// MKD - create one directory
    pub fn make_dir(&mut self, dir: &str) -> Reply {
        if let Some(reply) = self.not_connected_guard("make_dir") {
            return reply;
        }
        self.command(&FtpCommand::Mkd(dir.to_string()))
    }

    /// Create a directory path one segment at a time.
    ///
    /// Issues MKD against each cumulative prefix of `path`. A 550 reply
    /// ("already exists") is tolerated and the walk continues; any other
    /// error-class reply aborts and is returned. Success means every
    /// segment was created or already present.
    pub fn make_dir_recursive(&mut self, path: &str) -> Reply {
        if let Some(reply) = self.not_connected_guard("make_dir_recursive") {
            return reply;
        }

        for prefix in cumulative_prefixes(path) {
            let reply = self.command(&FtpCommand::Mkd(prefix));
            if reply.is_error() && reply.code != codes::FILE_UNAVAILABLE {
                return reply;
            }
        }

        Reply::synthetic(codes::ACTION_SUCCESS, "Directory path created")
    }

    /// RMD - remove a directory
    pub fn remove_dir(&mut self, dir: &str) -> Reply {
        if let Some(reply) = self.not_connected_guard("remove_dir") {
            return reply;
        }
        self.command(&FtpCommand::Rmd(dir.to_string()))
    }

    /// DELE - delete a file
    pub fn delete_file(&mut self, file: &str) -> Reply {
        if let Some(reply) = self.not_connected_guard("delete_file") {
            return reply;
        }
        self.command(&FtpCommand::Dele(file.to_string()))
    }

    /// RNFR + RNTO - rename a file.
    ///
    /// RNTO is only attempted when the RNFR reply is success class;
    /// otherwise the RNFR reply is returned as-is.
    pub fn rename_file(&mut self, from: &str, to: &str) -> Reply {
        if let Some(reply) = self.not_connected_guard("rename_file") {
            return reply;
        }

        let reply = self.command(&FtpCommand::Rnfr(from.to_string()));
        if reply.is_error() {
            return reply;
        }

        self.command(&FtpCommand::Rnto(to.to_string()))
    }

    /// MDTM - query a file's last-modified time.
    ///
    /// The reply payload can be decoded with
    /// [`parse_mdtm_timestamp`](crate::replies::parse_mdtm_timestamp).
    pub fn last_modified_time(&mut self, file: &str) -> Reply {
        if let Some(reply) = self.not_connected_guard("last_modified_time") {
            return reply;
        }
        self.command(&FtpCommand::Mdtm(file.to_string()))
    }

    /// STOR - initiate an upload; the payload goes through
    /// [`write_data`](FtpSession::write_data) on the data connection
    pub fn new_file(&mut self, file: &str) -> Reply {
        if let Some(reply) = self.not_connected_guard("new_file") {
            return reply;
        }
        self.command(&FtpCommand::Stor(file.to_string()))
    }

    /// APPE - initiate an append; same data-path contract as
    /// [`new_file`](FtpSession::new_file)
    pub fn append_file(&mut self, file: &str) -> Reply {
        if let Some(reply) = self.not_connected_guard("append_file") {
            return reply;
        }
        self.command(&FtpCommand::Appe(file.to_string()))
    }

    /// Negotiate an ASCII-mode passive data connection.
    ///
    /// Sends TYPE A, then PASV until the server answers 227 (at most
    /// [`PASV_MAX_ATTEMPTS`] sends, one second apart; exhaustion reports
    /// the data-connection-error code). The 227 argument is parsed in
    /// either historical format; a malformed one closes the control
    /// connection and reports a syntax error. On success the data
    /// connection is open and 200 is returned.
    pub fn init_ascii_passive_mode(&mut self) -> Reply {
        if let Some(reply) = self.not_connected_guard("init_ascii_passive_mode") {
            return reply;
        }

        let reply = self.command(&FtpCommand::TypeAscii);
        if reply.is_error() {
            return reply;
        }
        self.ascii_mode = true;

        let mut reply = self.command(&FtpCommand::Pasv);
        let mut attempts = 1;
        while reply.code != codes::ENTERING_PASSIVE_MODE {
            if reply.is_error() {
                return reply;
            }
            if attempts >= PASV_MAX_ATTEMPTS {
                warn!("No 227 reply after {} PASV attempts", attempts);
                return Reply::synthetic(
                    codes::DATA_CONNECTION_ERROR,
                    "PASV retries exhausted",
                );
            }
            thread::sleep(PASV_RETRY_DELAY);
            reply = self.command(&FtpCommand::Pasv);
            attempts += 1;
        }

        let endpoint = match PassiveEndpoint::parse(&reply.text) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                error!("{}", e);
                self.close_connection();
                return Reply::synthetic(codes::SYNTAX_ERROR, "Bad PASV answer");
            }
        };
        info!("Passive endpoint: {}", endpoint);

        match DataConnection::connect(&endpoint, self.config.timeout()) {
            Ok(conn) => {
                self.data = Some(conn);
                Reply::synthetic(codes::ACTION_SUCCESS, "Data connection established")
            }
            Err(e) => {
                error!("{}", e);
                Reply::synthetic(codes::DATA_CONNECTION_ERROR, "Data connection not established")
            }
        }
    }

    /// Stream bytes to the open data connection through the bounded
    /// buffer; no single underlying write exceeds the buffer capacity
    pub fn write_data(&mut self, data: &[u8]) -> Reply {
        if let Some(reply) = self.not_connected_guard("write_data") {
            return reply;
        }
        let Some(conn) = self.data.as_mut() else {
            error!("write_data: No data connection");
            return Reply::synthetic(codes::DATA_CONNECTION_ERROR, "No data connection");
        };

        debug!("write_data: {} bytes", data.len());
        match self.writer.stream(conn, data) {
            Ok(()) => Reply::synthetic(codes::ACTION_SUCCESS, "Data written"),
            Err(e) => {
                error!("write_data failed: {}", e);
                Reply::synthetic(codes::DATA_CONNECTION_ERROR, "Data write failed")
            }
        }
    }

    /// Convenience wrapper over [`write_data`](FtpSession::write_data)
    pub fn write_str(&mut self, data: &str) -> Reply {
        self.write_data(data.as_bytes())
    }

    /// Close the data connection and collect the final transfer reply
    /// from the control connection
    pub fn close_data_client(&mut self) -> Reply {
        if let Some(reply) = self.not_connected_guard("close_data_client") {
            return reply;
        }

        if let Some(data) = self.data.take() {
            data.shutdown();
        }
        self.read_reply()
    }

    /// Append one text line to a remote file: negotiate ASCII passive
    /// mode, issue APPE, write `line` plus CRLF over the data connection,
    /// close it and return the final transfer reply.
    ///
    /// The first error-class intermediate reply short-circuits the
    /// remaining steps and is returned as the result.
    pub fn append_text_line(&mut self, path: &str, line: &str) -> Reply {
        let reply = self.init_ascii_passive_mode();
        if reply.is_error() {
            return reply;
        }

        let reply = self.append_file(path);
        if reply.is_error() {
            self.drop_data_connection();
            return reply;
        }

        let reply = self.write_str(&format!("{line}\r\n"));
        if reply.is_error() {
            self.drop_data_connection();
            return reply;
        }

        self.close_data_client()
    }

    /// MLSD - machine-readable listing of `dir`.
    ///
    /// Requires an open data connection from
    /// [`init_ascii_passive_mode`](FtpSession::init_ascii_passive_mode).
    /// Entries are passed through unparsed, at most
    /// [`MLSD_MAX_ENTRIES`] of them.
    pub fn content_list(&mut self, dir: &str) -> (Reply, Vec<String>) {
        if let Some(reply) = self.not_connected_guard("content_list") {
            return (reply, Vec::new());
        }
        let Some(mut data) = self.data.take() else {
            error!("content_list: No data connection");
            return (
                Reply::synthetic(codes::DATA_CONNECTION_ERROR, "No data connection"),
                Vec::new(),
            );
        };

        let reply = self.command(&FtpCommand::Mlsd(dir.to_string()));
        if reply.is_error() {
            data.shutdown();
            return (reply, Vec::new());
        }

        let listing = read_listing(&mut data, MLSD_MAX_ENTRIES);
        self.data = Some(data);
        (reply, listing)
    }

    /// LIST - human-readable listing of `dir`, reduced to filenames.
    ///
    /// Each listing line is cut down to the substring after its last
    /// space; at most [`LIST_MAX_ENTRIES`] entries are kept.
    pub fn content_list_with_list_command(&mut self, dir: &str) -> (Reply, Vec<String>) {
        if let Some(reply) = self.not_connected_guard("content_list_with_list_command") {
            return (reply, Vec::new());
        }
        let Some(mut data) = self.data.take() else {
            error!("content_list_with_list_command: No data connection");
            return (
                Reply::synthetic(codes::DATA_CONNECTION_ERROR, "No data connection"),
                Vec::new(),
            );
        };

        let reply = self.command(&FtpCommand::List(dir.to_string()));
        if reply.is_error() {
            data.shutdown();
            return (reply, Vec::new());
        }

        let listing = read_listing(&mut data, LIST_MAX_ENTRIES)
            .iter()
            .map(|entry| filename_from_list_entry(entry).to_string())
            .collect();
        self.data = Some(data);
        (reply, listing)
    }

    /// RETR - download a file into a growable string.
    ///
    /// The data connection stays open for
    /// [`close_data_client`](FtpSession::close_data_client) to collect
    /// the final transfer reply.
    pub fn download_string(&mut self, filename: &str) -> (Reply, String) {
        if let Some(reply) = self.not_connected_guard("download_string") {
            return (reply, String::new());
        }
        let Some(mut data) = self.data.take() else {
            error!("download_string: No data connection");
            return (
                Reply::synthetic(codes::DATA_CONNECTION_ERROR, "No data connection"),
                String::new(),
            );
        };

        let reply = self.command(&FtpCommand::Retr(filename.to_string()));
        if reply.is_error() {
            data.shutdown();
            return (reply, String::new());
        }

        let body = read_to_string(&mut data);
        self.data = Some(data);
        (reply, body)
    }

    /// RETR - download a file into a fixed caller buffer, returning the
    /// number of bytes stored; payload past the buffer's end is drained
    /// and dropped
    pub fn download_file(&mut self, filename: &str, buf: &mut [u8]) -> (Reply, usize) {
        if let Some(reply) = self.not_connected_guard("download_file") {
            return (reply, 0);
        }
        let Some(mut data) = self.data.take() else {
            error!("download_file: No data connection");
            return (
                Reply::synthetic(codes::DATA_CONNECTION_ERROR, "No data connection"),
                0,
            );
        };

        let reply = self.command(&FtpCommand::Retr(filename.to_string()));
        if reply.is_error() {
            data.shutdown();
            return (reply, 0);
        }

        let filled = read_into_buffer(&mut data, buf);
        self.data = Some(data);
        (reply, filled)
    }

    /// Send one command and read its reply; no connected guard, so the
    /// auth sequence can use it before the flag is set
    fn command(&mut self, cmd: &FtpCommand) -> Reply {
        info!("Send {}", cmd);
        if let Err(e) = self.control.send_line(&cmd.to_ftp_string()) {
            warn!("Send failed: {}", e);
            self.connected = false;
            return Reply::offline();
        }
        self.read_reply()
    }

    /// Read and classify the next reply, updating the connected flag.
    ///
    /// A timeout or dead connection is the offline case: the flag is
    /// cleared and the synthetic not-connected reply returned.
    fn read_reply(&mut self) -> Reply {
        match self.control.read_raw_reply() {
            Ok(raw) => {
                let reply = Reply::parse(&raw.bytes, raw.truncated);
                self.connected = reply.is_success();
                reply
            }
            Err(e) => {
                warn!("Reply read failed: {}", e);
                self.connected = false;
                Reply::offline()
            }
        }
    }

    fn not_connected_guard(&self, op: &str) -> Option<Reply> {
        if self.connected {
            None
        } else {
            error!("{op}: Not connected error");
            Some(Reply::offline())
        }
    }

    fn drop_data_connection(&mut self) {
        if let Some(data) = self.data.take() {
            data.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_session() -> FtpSession {
        FtpSession::new(SessionConfig::new("127.0.0.1", "u", "p").with_timeout_secs(1))
    }

    #[test]
    fn test_new_session_is_disconnected() {
        let session = offline_session();
        assert!(!session.is_connected());
        assert!(!session.is_ascii_mode());
    }

    #[test]
    fn test_operations_guard_on_connected_flag() {
        let mut session = offline_session();

        assert_eq!(session.change_work_dir("/x").code, codes::NOT_CONNECTED);
        assert_eq!(session.make_dir("/x").code, codes::NOT_CONNECTED);
        assert_eq!(session.make_dir_recursive("/a/b").code, codes::NOT_CONNECTED);
        assert_eq!(session.remove_dir("/x").code, codes::NOT_CONNECTED);
        assert_eq!(session.delete_file("f").code, codes::NOT_CONNECTED);
        assert_eq!(session.rename_file("a", "b").code, codes::NOT_CONNECTED);
        assert_eq!(session.last_modified_time("f").code, codes::NOT_CONNECTED);
        assert_eq!(session.new_file("f").code, codes::NOT_CONNECTED);
        assert_eq!(session.append_file("f").code, codes::NOT_CONNECTED);
        assert_eq!(session.write_data(b"x").code, codes::NOT_CONNECTED);
        assert_eq!(session.close_data_client().code, codes::NOT_CONNECTED);
        assert_eq!(session.init_ascii_passive_mode().code, codes::NOT_CONNECTED);

        let (reply, listing) = session.content_list("/");
        assert_eq!(reply.code, codes::NOT_CONNECTED);
        assert!(listing.is_empty());

        let (reply, body) = session.download_string("f");
        assert_eq!(reply.code, codes::NOT_CONNECTED);
        assert!(body.is_empty());
    }

    #[test]
    fn test_close_connection_is_idempotent_when_never_opened() {
        let mut session = offline_session();
        session.close_connection();
        assert!(!session.is_connected());
    }
}
