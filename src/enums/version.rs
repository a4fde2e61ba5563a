use std::fmt;

/// Enum representing the HTTP version of a request.
///
/// Responses are always emitted as HTTP/1.0 regardless of the request
/// version, since the engine implements the one-exchange-per-connection
/// model only.
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum Version {
    Http10,
    Http11,
}

impl Version {
    pub fn from_httparse(v: u8) -> Version {
        match v {
            0 => Version::Http10,
            1 => Version::Http11,
            x => panic!("unknown HTTP version 1.{}", x),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Version::Http10 => f.write_str("HTTP/1.0"),
            Version::Http11 => f.write_str("HTTP/1.1"),
        }
    }
}
