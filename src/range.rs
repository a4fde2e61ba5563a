//! Byte-range resolution for `Range` request headers
//!
//! Only the `bytes` unit and a single range are supported; when a header
//! carries several comma-separated ranges only the first one is honored
//! (a multipart reply would be needed otherwise). Anything unparsable or
//! out of bounds degrades to "no range" so the caller falls back to a
//! full-content response.

use std::str;

/// A resolved inclusive `[from, to]` interval over a resource of known
/// total length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    from: u64,
    to: u64,
    total: u64,
}

impl ByteRange {
    /// Resolve a `Range` header value against a resource of `total` bytes
    ///
    /// Returns `None` for an unsupported unit, an unparsable spec, or an
    /// interval violating `0 <= from <= to < total`.
    pub fn parse(value: &[u8], total: u64) -> Option<ByteRange> {
        let value = match str::from_utf8(value) {
            Ok(s) => s.trim(),
            Err(_) => return None,
        };
        if !value.starts_with("bytes=") {
            return None;
        }
        let spec = &value["bytes=".len()..];
        // only the first comma-separated range is honored
        let first = match spec.find(',') {
            Some(idx) => &spec[..idx],
            None => spec,
        };
        let first = first.trim();
        let dash = match first.find('-') {
            Some(idx) => idx,
            None => return None,
        };
        let (start, end) = (&first[..dash], &first[dash + 1..]);
        if total == 0 {
            return None;
        }
        if start.is_empty() {
            // suffix form: "-N" means the last N bytes
            let suffix: u64 = match end.parse() {
                Ok(n) if n > 0 => n,
                _ => return None,
            };
            return Some(ByteRange {
                from: total.saturating_sub(suffix),
                to: total - 1,
                total: total,
            });
        }
        let from: u64 = match start.parse() {
            Ok(n) => n,
            Err(_) => return None,
        };
        let to: u64 = if end.is_empty() {
            total - 1
        } else {
            match end.parse() {
                Ok(n) => n,
                Err(_) => return None,
            }
        };
        if from > to || to >= total {
            return None;
        }
        Some(ByteRange { from: from, to: to, total: total })
    }

    pub fn from(&self) -> u64 {
        self.from
    }

    pub fn to(&self) -> u64 {
        self.to
    }

    /// Number of bytes the range covers
    pub fn len(&self) -> u64 {
        self.to - self.from + 1
    }

    /// Value for a `Content-Range` response header
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.from, self.to, self.total)
    }
}

#[cfg(test)]
mod test {
    use super::ByteRange;

    fn parse(value: &str, total: u64) -> Option<ByteRange> {
        ByteRange::parse(value.as_bytes(), total)
    }

    #[test]
    fn plain_interval() {
        let r = parse("bytes=200-499", 1000).unwrap();
        assert_eq!((r.from(), r.to()), (200, 499));
        assert_eq!(r.len(), 300);
        assert_eq!(r.content_range(), "bytes 200-499/1000");
    }

    #[test]
    fn open_ended() {
        let r = parse("bytes=500-", 1000).unwrap();
        assert_eq!((r.from(), r.to()), (500, 999));
        assert_eq!(r.len(), 500);
    }

    #[test]
    fn suffix() {
        let r = parse("bytes=-300", 1000).unwrap();
        assert_eq!((r.from(), r.to()), (700, 999));
        // a suffix longer than the resource covers the whole thing
        let r = parse("bytes=-5000", 1000).unwrap();
        assert_eq!((r.from(), r.to()), (0, 999));
    }

    #[test]
    fn first_of_many() {
        let r = parse("bytes=100-199,300-399", 1000).unwrap();
        assert_eq!((r.from(), r.to()), (100, 199));
    }

    #[test]
    fn degenerate_specs() {
        assert_eq!(parse("bytes=abc", 1000), None);
        assert_eq!(parse("bytes=2000-3000", 1000), None);
        assert_eq!(parse("bytes=500-200", 1000), None);
        assert_eq!(parse("bytes=0-1000", 1000), None);
        assert_eq!(parse("bytes=-0", 1000), None);
        assert_eq!(parse("bytes=", 1000), None);
        assert_eq!(parse("chairs=0-2", 1000), None);
        assert_eq!(parse("0-2", 1000), None);
        assert_eq!(parse("bytes=0-0", 0), None);
    }

    #[test]
    fn single_byte() {
        let r = parse("bytes=0-0", 1000).unwrap();
        assert_eq!(r.len(), 1);
        assert_eq!(r.content_range(), "bytes 0-0/1000");
    }
}
