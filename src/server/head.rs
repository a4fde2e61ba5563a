//! Request head parsing
//!
//! Wraps `httparse` and extracts the few bits of metadata the engine
//! cares about. Headers are copied out of the input buffer so the
//! buffer can be consumed immediately after a successful parse.

use httparse;

use enums::Version;
use headers;
use super::Error;

const MIN_HEADERS: usize = 16;
const MAX_HEADERS: usize = 1024;

/// A parsed request head
///
/// Owned copy of the request line and headers, detached from the input
/// buffer. Accessible from a dispatcher via `headers_received` and later
/// from the codec via `Connection::head`.
#[derive(Debug)]
pub struct Head {
    method: String,
    path: String,
    version: Version,
    headers: Vec<(String, Vec<u8>)>,
    body_length: Option<u64>,
}

impl Head {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &[(String, Vec<u8>)] {
        &self.headers
    }

    /// Value of the first header with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers.iter()
            .find(|&&(ref n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, ref v)| &v[..])
    }

    /// Declared body length, `None` when no `Content-Length` was sent
    pub fn body_length(&self) -> Option<u64> {
        self.body_length
    }
}

fn build_head(req: &httparse::Request) -> Result<Head, Error> {
    let mut body_length = None;
    let mut headers = Vec::with_capacity(req.headers.len());
    for h in req.headers.iter() {
        if headers::is_content_length(h.name) {
            if body_length.is_some() {
                return Err(Error::DuplicateContentLength);
            }
            match headers::content_length(h.value) {
                Some(len) => body_length = Some(len),
                None => return Err(Error::ContentLengthInvalid),
            }
        }
        headers.push((h.name.to_string(), h.value.to_vec()));
    }
    Ok(Head {
        // fields are `Some` on Status::Complete
        method: req.method.unwrap().to_string(),
        path: req.path.unwrap().to_string(),
        version: Version::from_httparse(req.version.unwrap()),
        headers: headers,
        body_length: body_length,
    })
}

/// Try to parse a request head out of `buffer`
///
/// Returns the head and the number of bytes it occupied, or `None` when
/// more input is needed.
pub fn parse_head(buffer: &[u8]) -> Result<Option<(Head, usize)>, Error> {
    let mut vec;
    let mut headers = [httparse::EMPTY_HEADER; MIN_HEADERS];
    let (head, bytes) = {
        let mut raw = httparse::Request::new(&mut headers);
        let mut result = raw.parse(buffer);
        if matches!(result, Err(httparse::Error::TooManyHeaders)) {
            vec = vec![httparse::EMPTY_HEADER; MAX_HEADERS];
            raw = httparse::Request::new(&mut vec);
            result = raw.parse(buffer);
        }
        match result? {
            httparse::Status::Complete(bytes) => {
                (build_head(&raw)?, bytes)
            }
            httparse::Status::Partial => return Ok(None),
        }
    };
    Ok(Some((head, bytes)))
}
