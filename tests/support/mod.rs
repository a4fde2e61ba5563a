//! An in-memory stream with scriptable input and write backpressure
#![allow(dead_code)]

use std::cell::RefCell;
use std::cmp::min;
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::rc::Rc;

use futures::{Async, Poll};
use tokio_io::{AsyncRead, AsyncWrite};

#[derive(Clone)]
pub struct MockStream {
    inner: Rc<RefCell<Inner>>,
}

struct Inner {
    input: VecDeque<Vec<u8>>,
    eof: bool,
    output: Vec<u8>,
    write_quota: usize,
}

impl MockStream {
    pub fn new() -> MockStream {
        MockStream::with_write_quota(usize::max_value())
    }

    /// A stream that accepts only `quota` bytes until `allow_write`
    pub fn with_write_quota(quota: usize) -> MockStream {
        MockStream {
            inner: Rc::new(RefCell::new(Inner {
                input: VecDeque::new(),
                eof: false,
                output: Vec::new(),
                write_quota: quota,
            })),
        }
    }

    pub fn push_input(&self, data: &[u8]) {
        self.inner.borrow_mut().input.push_back(data.to_vec());
    }

    /// Make reads return end-of-file once the input queue drains
    pub fn set_eof(&self) {
        self.inner.borrow_mut().eof = true;
    }

    pub fn allow_write(&self, bytes: usize) {
        let mut inner = self.inner.borrow_mut();
        inner.write_quota = inner.write_quota.saturating_add(bytes);
    }

    pub fn output(&self) -> Vec<u8> {
        self.inner.borrow().output.clone()
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut inner = self.inner.borrow_mut();
        if let Some(chunk) = inner.input.pop_front() {
            let bytes = min(buf.len(), chunk.len());
            buf[..bytes].copy_from_slice(&chunk[..bytes]);
            if bytes < chunk.len() {
                inner.input.push_front(chunk[bytes..].to_vec());
            }
            Ok(bytes)
        } else if inner.eof {
            Ok(0)
        } else {
            Err(io::Error::new(io::ErrorKind::WouldBlock, "no input"))
        }
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut inner = self.inner.borrow_mut();
        let bytes = min(buf.len(), inner.write_quota);
        if bytes == 0 {
            return Err(io::Error::new(io::ErrorKind::WouldBlock,
                "write quota exhausted"));
        }
        inner.write_quota -= bytes;
        inner.output.extend_from_slice(&buf[..bytes]);
        Ok(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl AsyncRead for MockStream {}

impl AsyncWrite for MockStream {
    fn shutdown(&mut self) -> Poll<(), io::Error> {
        Ok(Async::Ready(()))
    }
}
