//! Passive-mode endpoint parsing
//!
//! A 227 reply advertises the data-connection endpoint in one of two
//! historical shapes:
//!
//! - `227 Entering Passive Mode (192,168,2,112,157,218)`: four address
//!   octets followed by the port split into high and low bytes;
//! - `227 Entering Passive Mode (3232236041, port 55600)`: a single
//!   32-bit address integer and a literal `port N`.
//!
//! The first numeric token after `(` disambiguates: a value above 255
//! cannot be an octet, so it is read as the packed address.

use std::net::Ipv4Addr;

use crate::error::{FtpClientError, Result};

/// Resolved data-connection endpoint extracted from a 227 reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassiveEndpoint {
    pub addr: Ipv4Addr,
    pub port: u16,
}

impl PassiveEndpoint {
    /// Parse the parenthesized argument of a 227 reply.
    ///
    /// Fails closed: missing delimiters, short octet lists or out-of-range
    /// numbers all yield `ResponseParseError`.
    pub fn parse(reply_text: &str) -> Result<Self> {
        let open = reply_text
            .find('(')
            .ok_or_else(|| syntax_error(reply_text, "no opening parenthesis"))?;
        let inner = &reply_text[open + 1..];
        let close = inner
            .find(')')
            .ok_or_else(|| syntax_error(reply_text, "no closing parenthesis"))?;
        let inner = &inner[..close];

        let first = leading_number(inner)
            .ok_or_else(|| syntax_error(reply_text, "no numeric token after '('"))?;

        if first <= 0xFF {
            Self::parse_octet_form(inner).ok_or_else(|| syntax_error(reply_text, "bad octet form"))
        } else {
            Self::parse_address_form(inner, first)
                .ok_or_else(|| syntax_error(reply_text, "bad address-integer form"))
        }
    }

    /// `h1,h2,h3,h4,p1,p2` with port `p1*256 + p2`
    fn parse_octet_form(inner: &str) -> Option<Self> {
        let mut fields = inner.split(',').map(str::trim);
        let mut octets = [0u8; 4];
        for slot in &mut octets {
            *slot = fields.next()?.parse().ok()?;
        }
        let hi: u16 = fields.next()?.parse().ok()?;
        let lo: u16 = fields.next()?.parse().ok()?;
        if hi > 0xFF || lo > 0xFF {
            return None;
        }

        Some(Self {
            addr: Ipv4Addr::from(octets),
            port: (hi << 8) | lo,
        })
    }

    /// `addr32, port N` where the integer is the big-endian packed address
    fn parse_address_form(inner: &str, first: u64) -> Option<Self> {
        let addr = Ipv4Addr::from(u32::try_from(first).ok()?);
        let after_port = inner.split("port").nth(1)?;
        let port = leading_number(after_port.trim_start())?;

        Some(Self {
            addr,
            port: u16::try_from(port).ok()?,
        })
    }
}

impl std::fmt::Display for PassiveEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

/// Parse the leading run of ASCII digits, `None` if there is none
fn leading_number(s: &str) -> Option<u64> {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn syntax_error(reply_text: &str, detail: &str) -> FtpClientError {
    FtpClientError::ResponseParseError(format!(
        "Bad PASV answer '{}': {}",
        reply_text.trim_end(),
        detail
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octet_form() {
        let ep =
            PassiveEndpoint::parse("227 Entering Passive Mode (192,168,2,112,157,218)").unwrap();
        assert_eq!(ep.addr, Ipv4Addr::new(192, 168, 2, 112));
        assert_eq!(ep.port, 157 * 256 + 218);
        assert_eq!(ep.port, 40410);
    }

    #[test]
    fn test_address_integer_form() {
        let ep =
            PassiveEndpoint::parse("227 Entering Passive Mode (3232236041, port 55600)").unwrap();
        assert_eq!(ep.addr, Ipv4Addr::from(3232236041u32));
        assert_eq!(ep.addr, Ipv4Addr::new(192, 168, 2, 137));
        assert_eq!(ep.port, 55600);
    }

    #[test]
    fn test_octet_form_with_spaces() {
        let ep = PassiveEndpoint::parse("227 Ok (127, 0, 0, 1, 8, 10)").unwrap();
        assert_eq!(ep.addr, Ipv4Addr::new(127, 0, 0, 1));
        assert_eq!(ep.port, 8 * 256 + 10);
    }

    #[test]
    fn test_missing_parenthesis_fails_closed() {
        assert!(PassiveEndpoint::parse("227 Entering Passive Mode").is_err());
        assert!(PassiveEndpoint::parse("227 Entering Passive Mode (1,2,3").is_err());
    }

    #[test]
    fn test_short_octet_list_fails_closed() {
        assert!(PassiveEndpoint::parse("227 Ok (192,168,2,112,157)").is_err());
    }

    #[test]
    fn test_non_numeric_argument_fails_closed() {
        assert!(PassiveEndpoint::parse("227 Ok (host,port)").is_err());
    }

    #[test]
    fn test_address_form_without_port_keyword_fails_closed() {
        assert!(PassiveEndpoint::parse("227 Ok (3232236041, 55600)").is_err());
    }

    #[test]
    fn test_address_form_with_oversized_port_fails_closed() {
        assert!(PassiveEndpoint::parse("227 Ok (3232236041, port 70000)").is_err());
    }

    #[test]
    fn test_display() {
        let ep = PassiveEndpoint {
            addr: Ipv4Addr::new(10, 0, 0, 2),
            port: 40410,
        };
        assert_eq!(ep.to_string(), "10.0.0.2:40410");
    }
}
