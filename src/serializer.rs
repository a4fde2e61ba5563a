//! Rendering of message heads into the output buffer
//!
//! The engine speaks HTTP/1.0 on the wire in both directions: responses
//! it generates and request heads it reconstructs for relaying.

use std::io::Write;

use netbuf::Buf;

use enums::Status;
use server::Head;

quick_error! {
    /// Error returned when an invalid header is supplied
    #[derive(Debug)]
    pub enum HeaderError {
        /// Header name contains a carriage return or line feed
        InvalidHeaderName {
            description("invalid header name")
        }
        /// Header value contains a carriage return or line feed
        InvalidHeaderValue {
            description("invalid header value")
        }
    }
}

/// Returns true when a header name or value would break the head framing
pub fn invalid_header(value: &[u8]) -> bool {
    value.iter().any(|&x| x == b'\r' || x == b'\n')
}

/// Write a response head, including the final empty line
pub fn render_response_head(buf: &mut Buf, status: &Status,
    headers: &[(String, Vec<u8>)])
{
    // writes into a memory buffer only fail on out-of-memory
    write!(buf, "HTTP/1.0 {} {}\r\n", status.code(), status.reason())
        .unwrap();
    for &(ref name, ref value) in headers {
        write!(buf, "{}: ", name).unwrap();
        buf.write_all(value).unwrap();
        buf.write_all(b"\r\n").unwrap();
    }
    buf.write_all(b"\r\n").unwrap();
}

/// Write a request head reconstructed from a parsed one
///
/// Used by the relay dispatcher to forward the request upstream.
pub fn render_request_head(buf: &mut Buf, head: &Head) {
    write!(buf, "{} {} HTTP/1.0\r\n", head.method(), head.path())
        .unwrap();
    for &(ref name, ref value) in head.headers() {
        write!(buf, "{}: ", name).unwrap();
        buf.write_all(value).unwrap();
        buf.write_all(b"\r\n").unwrap();
    }
    buf.write_all(b"\r\n").unwrap();
}
