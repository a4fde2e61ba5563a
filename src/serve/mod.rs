//! Serving registered files with range support
//!
//! The [`Files`] dispatcher resolves each request against a [`FileMap`]
//! and streams the file, honoring a `Range` header with a `206 Partial
//! Content` reply.
//!
//! [`Files`]: struct.Files.html
//! [`FileMap`]: struct.FileMap.html

pub mod mime;
mod registry;

pub use self::registry::FileMap;

use std::cmp::min;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::mem;
use std::sync::Arc;

use futures::Async;
use tokio_io::{AsyncRead, AsyncWrite};

use enums::Status;
use range::ByteRange;
use server::{Codec, Connection, Dispatcher, Error, Head};

const READ_CHUNK: usize = 65536;

/// Dispatcher serving files out of a [`FileMap`]
///
/// [`FileMap`]: struct.FileMap.html
pub struct Files {
    map: Arc<FileMap>,
    mime: fn(&str) -> &'static str,
}

enum FileState {
    /// Registry miss or open failure, reply with an empty error body
    Error(Status),
    Headers {
        file: File,
        total: u64,
        range: Option<ByteRange>,
        content_type: &'static str,
    },
    Body {
        file: File,
        remaining: u64,
    },
    Void,
}

/// Codec streaming a single file response
pub struct FileCodec {
    state: FileState,
}

impl Files {
    pub fn new(map: Arc<FileMap>) -> Files {
        Files {
            map: map,
            mime: mime::content_type,
        }
    }

    /// Replace the extension-based `Content-Type` lookup
    pub fn mime_resolver(mut self, resolver: fn(&str) -> &'static str)
        -> Files
    {
        self.mime = resolver;
        self
    }
}

impl<S: AsyncRead + AsyncWrite> Dispatcher<S> for Files {
    type Codec = FileCodec;

    fn headers_received(&mut self, head: &Head)
        -> Result<FileCodec, Error>
    {
        let state = match self.map.resolve(head.path()) {
            None => FileState::Error(Status::NotFound),
            Some((path, total)) => {
                let ext = path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("");
                let content_type = (self.mime)(ext);
                match File::open(path) {
                    Ok(file) => FileState::Headers {
                        file: file,
                        total: total,
                        range: head.header("Range")
                            .and_then(|v| ByteRange::parse(v, total)),
                        content_type: content_type,
                    },
                    Err(e) => {
                        info!("can't open {:?}: {}", path, e);
                        FileState::Error(Status::Forbidden)
                    }
                }
            }
        };
        Ok(FileCodec { state: state })
    }
}

impl<S: AsyncRead + AsyncWrite> Codec<S> for FileCodec {
    fn poll(&mut self, conn: &mut Connection<S>)
        -> Result<Async<()>, Error>
    {
        loop {
            match mem::replace(&mut self.state, FileState::Void) {
                FileState::Error(status) => {
                    conn.write_error(status);
                    return Ok(Async::Ready(()));
                }
                FileState::Headers { mut file, total, range,
                                     content_type } => {
                    // static names and numeric values always validate
                    conn.set_header("Content-Type", content_type)
                        .unwrap();
                    let remaining = match range {
                        Some(range) => {
                            conn.set_status(Status::PartialContent);
                            conn.set_header("Content-Length",
                                format!("{}", range.len())).unwrap();
                            conn.set_header("Content-Range",
                                range.content_range()).unwrap();
                            file.seek(SeekFrom::Start(range.from()))?;
                            range.len()
                        }
                        None => {
                            conn.set_header("Content-Length",
                                format!("{}", total)).unwrap();
                            total
                        }
                    };
                    conn.write_headers();
                    self.state = FileState::Body {
                        file: file,
                        remaining: remaining,
                    };
                }
                FileState::Body { mut file, remaining } => {
                    let mut remaining = remaining;
                    let watermark = conn.config().watermark();
                    while remaining > 0 &&
                        conn.output_pending() < watermark
                    {
                        let mut chunk = [0u8; READ_CHUNK];
                        let max = min(remaining, READ_CHUNK as u64)
                            as usize;
                        let bytes = file.read(&mut chunk[..max])?;
                        if bytes == 0 {
                            warn!("file truncated while being served");
                            conn.close();
                            return Ok(Async::Ready(()));
                        }
                        conn.write_bytes(&chunk[..bytes]);
                        remaining -= bytes as u64;
                    }
                    if remaining == 0 {
                        return Ok(Async::Ready(()));
                    }
                    self.state = FileState::Body {
                        file: file,
                        remaining: remaining,
                    };
                    return Ok(Async::NotReady);
                }
                FileState::Void => unreachable!(),
            }
        }
    }
}
