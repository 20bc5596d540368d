//! FTP reply parsing functionality

use chrono::NaiveDateTime;
use log::debug;

use crate::replies::codes;

/// Parsed FTP reply from the server
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// 3-digit reply code (e.g. 230, 530, 227)
    pub code: u16,

    /// Raw reply text as received, including the code prefix
    pub text: String,

    /// True when the reply was cut at the response-buffer capacity and
    /// trailing bytes were dropped
    pub truncated: bool,
}

impl Reply {
    /// Parse raw control-connection bytes into a reply.
    ///
    /// The code is the leading run of ASCII digits; anything after it is
    /// ignored for classification. A reply with no leading digits parses
    /// as code 0, which sits below 400 and therefore counts as success
    /// class. That permissiveness is intentional and matched by the
    /// session layer's connected-flag handling.
    pub fn parse(bytes: &[u8], truncated: bool) -> Self {
        let text = String::from_utf8_lossy(bytes).into_owned();
        let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
        let code = digits.parse::<u16>().unwrap_or(0);

        debug!("Parsed reply: code={}, text='{}'", code, text.trim_end());

        Self {
            code,
            text,
            truncated,
        }
    }

    /// Build a locally-originated reply that never came off the wire
    pub fn synthetic(code: u16, text: &str) -> Self {
        Self {
            code,
            text: text.to_string(),
            truncated: false,
        }
    }

    /// Reply reported when the control connection is absent or silent
    pub fn offline() -> Self {
        Self::synthetic(codes::NOT_CONNECTED, "Offline")
    }

    /// True when the code falls in the `[400, 600)` error class
    pub fn is_error(&self) -> bool {
        codes::is_error_class(self.code)
    }

    /// True when the code falls outside the error class
    pub fn is_success(&self) -> bool {
        !self.is_error()
    }
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text.trim_end())
    }
}

/// Decode the timestamp payload of an MDTM reply.
///
/// Servers answer `213 YYYYMMDDHHMMSS`; returns `None` for error replies
/// or payloads that do not match that shape.
pub fn parse_mdtm_timestamp(reply: &Reply) -> Option<NaiveDateTime> {
    if reply.is_error() {
        return None;
    }
    let stamp = reply.text.split_whitespace().nth(1)?;
    NaiveDateTime::parse_from_str(stamp, "%Y%m%d%H%M%S").ok()
}
