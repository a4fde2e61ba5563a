use std::io;

use httparse;

quick_error! {
    /// Error type which is returned from the protocol handler
    #[derive(Debug)]
    pub enum Error {
        /// I/O error on the underlying stream
        Io(err: io::Error) {
            description("I/O error")
            display("I/O error: {}", err)
            from()
        }
        /// Request head could not be parsed
        ParseError(err: httparse::Error) {
            description("parse error")
            display("parse error: {:?}", err)
            from()
        }
        /// `Content-Length` header has a non-numeric value
        ContentLengthInvalid {
            description("invalid Content-Length header")
        }
        /// More than one `Content-Length` header in the request
        DuplicateContentLength {
            description("duplicate Content-Length header")
        }
        /// Request head exceeds the configured size limit
        HeadersTooLong {
            description("request headers are larger than the limit")
        }
        /// Peer closed the connection before the request was complete
        ConnectionReset {
            description("connection closed before request was complete")
        }
    }
}
