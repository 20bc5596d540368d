//! FTP command definitions
//!
//! Every command the session can place on the control connection, with its
//! wire rendering. Arguments are appended after the verb; the connection
//! layer adds the CRLF terminator.

/// FTP commands issued over the control connection
#[derive(Debug, Clone, PartialEq)]
pub enum FtpCommand {
    /// USER - Username for authentication
    User(String),

    /// PASS - Password for authentication
    Pass(String),

    /// QUIT - End the session
    Quit,

    /// TYPE A - Switch to ASCII transfer mode
    TypeAscii,

    /// PASV - Request a passive-mode data endpoint
    Pasv,

    /// CWD - Change working directory
    Cwd(String),

    /// MKD - Make directory
    Mkd(String),

    /// RMD - Remove directory
    Rmd(String),

    /// DELE - Delete file on server
    Dele(String),

    /// RNFR - Rename from (first half of a rename)
    Rnfr(String),

    /// RNTO - Rename to (second half of a rename)
    Rnto(String),

    /// MDTM - Query file last-modified time
    Mdtm(String),

    /// APPE - Append to file (data follows on the data connection)
    Appe(String),

    /// STOR - Store/upload file (data follows on the data connection)
    Stor(String),

    /// RETR - Retrieve/download file
    Retr(String),

    /// MLSD - Machine-readable directory listing
    Mlsd(String),

    /// LIST - Human-readable directory listing
    List(String),
}

impl FtpCommand {
    /// Convert command to its FTP protocol string (no line terminator)
    pub fn to_ftp_string(&self) -> String {
        match self {
            FtpCommand::User(username) => format!("USER {username}"),
            FtpCommand::Pass(password) => format!("PASS {password}"),
            FtpCommand::Quit => "QUIT".to_string(),
            FtpCommand::TypeAscii => "TYPE A".to_string(),
            FtpCommand::Pasv => "PASV".to_string(),
            FtpCommand::Cwd(path) => format!("CWD {path}"),
            FtpCommand::Mkd(path) => format!("MKD {path}"),
            FtpCommand::Rmd(path) => format!("RMD {path}"),
            FtpCommand::Dele(path) => format!("DELE {path}"),
            FtpCommand::Rnfr(path) => format!("RNFR {path}"),
            FtpCommand::Rnto(path) => format!("RNTO {path}"),
            FtpCommand::Mdtm(path) => format!("MDTM {path}"),
            FtpCommand::Appe(path) => format!("APPE {path}"),
            FtpCommand::Stor(path) => format!("STOR {path}"),
            FtpCommand::Retr(path) => format!("RETR {path}"),
            FtpCommand::Mlsd(path) => format!("MLSD {path}"),
            FtpCommand::List(path) => format!("LIST {path}"),
        }
    }
}

impl std::fmt::Display for FtpCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Never echo credentials into logs
            FtpCommand::Pass(_) => write!(f, "PASS [hidden]"),
            other => write!(f, "{}", other.to_ftp_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_rendering() {
        assert_eq!(
            FtpCommand::User("alice".to_string()).to_ftp_string(),
            "USER alice"
        );
        assert_eq!(FtpCommand::Quit.to_ftp_string(), "QUIT");
        assert_eq!(FtpCommand::TypeAscii.to_ftp_string(), "TYPE A");
        assert_eq!(FtpCommand::Pasv.to_ftp_string(), "PASV");
        assert_eq!(
            FtpCommand::Mkd("/logs/2024".to_string()).to_ftp_string(),
            "MKD /logs/2024"
        );
        assert_eq!(
            FtpCommand::Rnfr("/a/old.txt".to_string()).to_ftp_string(),
            "RNFR /a/old.txt"
        );
        assert_eq!(
            FtpCommand::Mlsd("/data".to_string()).to_ftp_string(),
            "MLSD /data"
        );
    }

    #[test]
    fn test_display_hides_password() {
        let cmd = FtpCommand::Pass("secret".to_string());
        assert_eq!(format!("{}", cmd), "PASS [hidden]");
        assert!(!format!("{}", cmd).contains("secret"));
    }
}
