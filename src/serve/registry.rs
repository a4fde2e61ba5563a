//! The id-to-path file registry
//!
//! Files are never served by filesystem path taken from the URL.
//! Instead each file is registered under a small integer id and
//! requested as `/<id>.<ext>`, where the extension has to match the
//! registered file. This makes path traversal a non-issue.

use std::fs;
use std::path::{Path, PathBuf};

/// Registry of the files the [`Files`] dispatcher is allowed to serve
///
/// [`Files`]: struct.Files.html
#[derive(Debug, Clone)]
pub struct FileMap {
    entries: Vec<PathBuf>,
}

impl FileMap {
    pub fn new() -> FileMap {
        FileMap { entries: Vec::new() }
    }

    /// Register a file, returning the id it is served under
    pub fn add<P: Into<PathBuf>>(&mut self, path: P) -> usize {
        self.entries.push(path.into());
        self.entries.len() - 1
    }

    /// Number of registered files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Map a request path to a registered file
    ///
    /// Returns the path and the current file size, or `None` when the
    /// id is unknown, the extension does not match, or the entry is
    /// not a regular file. The id is taken up to the first dot of the
    /// last path segment, the extension after its last dot.
    pub fn resolve(&self, request_path: &str) -> Option<(&Path, u64)> {
        let path = match request_path.find('?') {
            Some(idx) => &request_path[..idx],
            None => request_path,
        };
        let name = match path.rfind('/') {
            Some(idx) => &path[idx + 1..],
            None => path,
        };
        let (id_part, ext) = match name.find('.') {
            Some(first) => {
                // last dot cannot fail when the first one was found
                let last = name.rfind('.').unwrap();
                (&name[..first], &name[last + 1..])
            }
            None => (name, ""),
        };
        let id: usize = match id_part.parse() {
            Ok(id) => id,
            Err(_) => return None,
        };
        let entry = match self.entries.get(id) {
            Some(entry) => entry,
            None => return None,
        };
        let entry_ext = entry.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        if ext != entry_ext {
            return None;
        }
        match fs::metadata(entry) {
            Ok(ref meta) if meta.is_file() => Some((entry, meta.len())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use std::env;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;

    use super::FileMap;

    fn scratch_file(name: &str, data: &[u8]) -> PathBuf {
        let path = env::temp_dir()
            .join(format!("tk-http10-reg-{}-{}", ::std::process::id(), name));
        File::create(&path).unwrap().write_all(data).unwrap();
        path
    }

    #[test]
    fn resolve_by_id_and_extension() {
        let file = scratch_file("a.txt", b"hello");
        let mut map = FileMap::new();
        let id = map.add(&file);
        assert_eq!(id, 0);
        let (path, len) = map.resolve(&format!("/{}.txt", id)).unwrap();
        assert_eq!(path, file.as_path());
        assert_eq!(len, 5);
    }

    #[test]
    fn query_string_is_ignored() {
        let file = scratch_file("q.txt", b"hello");
        let mut map = FileMap::new();
        map.add(&file);
        assert!(map.resolve("/0.txt?download=1").is_some());
    }

    #[test]
    fn extension_must_match() {
        let file = scratch_file("e.txt", b"hello");
        let mut map = FileMap::new();
        map.add(&file);
        assert!(map.resolve("/0.png").is_none());
        assert!(map.resolve("/0").is_none());
    }

    #[test]
    fn id_before_first_dot_extension_after_last() {
        let file = scratch_file("d.tar.gz", b"data");
        let mut map = FileMap::new();
        map.add(&file);
        assert!(map.resolve("/0.tar.gz").is_some());
        assert!(map.resolve("/0.tar").is_none());
    }

    #[test]
    fn unknown_entries() {
        let mut map = FileMap::new();
        map.add("/definitely/not/there.txt");
        assert!(map.resolve("/0.txt").is_none(), "missing file");
        assert!(map.resolve("/7.txt").is_none(), "unknown id");
        assert!(map.resolve("/x.txt").is_none(), "non-numeric id");
    }
}
