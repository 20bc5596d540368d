use std::fmt;

/// Main error type for the FTP client engine
#[derive(Debug)]
pub enum FtpClientError {
    // Connection errors
    ConnectionRefused(String),
    ConnectionTimeout(String),
    ConnectionLost(String),
    NotConnected(String),
    InvalidHost(String),

    // Data channel errors
    DataConnectionFailed(String),

    // Protocol errors
    ResponseParseError(String),

    // Configuration errors
    ConfigFileNotFound(String),
    ConfigFileParseError(String),
    InvalidConfigValue(String),

    // IO errors
    Io(std::io::Error),
}

impl fmt::Display for FtpClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionRefused(msg) => write!(f, "Connection refused: {}", msg),
            Self::ConnectionTimeout(msg) => write!(f, "Connection timeout: {}", msg),
            Self::ConnectionLost(msg) => write!(f, "Connection lost: {}", msg),
            Self::NotConnected(msg) => write!(f, "Not connected: {}", msg),
            Self::InvalidHost(msg) => write!(f, "Invalid host: {}", msg),
            Self::DataConnectionFailed(msg) => write!(f, "Data connection failed: {}", msg),
            Self::ResponseParseError(msg) => write!(f, "Response parse error: {}", msg),
            Self::ConfigFileNotFound(msg) => write!(f, "Config file not found: {}", msg),
            Self::ConfigFileParseError(msg) => write!(f, "Config file parse error: {}", msg),
            Self::InvalidConfigValue(msg) => write!(f, "Invalid config value: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for FtpClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FtpClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, FtpClientError>;
