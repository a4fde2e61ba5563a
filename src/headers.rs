use std::str;

pub fn is_content_length(val: &str) -> bool {
    val.eq_ignore_ascii_case("Content-Length")
}

pub fn is_range(val: &str) -> bool {
    val.eq_ignore_ascii_case("Range")
}

// header value is a byte sequence; leading/trailing whitespace is
// tolerated but anything else must be a plain decimal number
pub fn content_length(val: &[u8]) -> Option<u64> {
    let s = match str::from_utf8(val) {
        Ok(s) => s.trim(),
        Err(_) => return None,
    };
    if s.is_empty() {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod test {
    use super::{is_content_length, is_range, content_length};

    #[test]
    fn test_content_length_name() {
        assert!(is_content_length("Content-Length"));
        assert!(is_content_length("content-length"));
        assert!(is_content_length("CONTENT-LENGTH"));
        assert!(!is_content_length("Content-Range"));
    }

    #[test]
    fn test_range_name() {
        assert!(is_range("Range"));
        assert!(is_range("range"));
        assert!(is_range("RANGE"));
        assert!(!is_range("Content-Range"));
    }

    #[test]
    fn test_content_length_value() {
        assert_eq!(content_length(b"0"), Some(0));
        assert_eq!(content_length(b"1000"), Some(1000));
        assert_eq!(content_length(b"  42  "), Some(42));
        assert_eq!(content_length(b""), None);
        assert_eq!(content_length(b"-1"), None);
        assert_eq!(content_length(b"12abc"), None);
        assert_eq!(content_length(b"99999999999999999999999"), None);
    }
}
