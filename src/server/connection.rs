//! The connection state machine
//!
//! A `Connection` wraps the buffered stream and tracks two independent
//! machines: one for the inbound request and one for the outbound
//! response. The protocol handler in `proto.rs` drives I/O and turns
//! buffer changes into codec callbacks; the codec uses the methods here
//! to consume the body and to produce the response.

use std::cmp::min;
use std::sync::Arc;

use tokio_io::{AsyncRead, AsyncWrite};
use tk_bufstream::IoBuf;

use enums::Status;
use serializer::{self, HeaderError};
use super::head::{self, Head};
use super::{Config, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    /// Waiting for the request head to be complete
    Headers,
    /// Head parsed, body bytes still outstanding
    Data,
    /// The whole request has arrived
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteState {
    /// Nothing has been committed to the wire yet
    Idle,
    /// Head rendered, `remaining` of its bytes not yet on the wire
    Headers { remaining: u64 },
    /// Head fully flushed, body bytes flow through
    Data,
    /// Closed, no more writes
    Finished,
}

/// Inbound buffer changes the protocol handler reports to the codec
#[derive(Debug)]
pub(crate) enum ReadEvent {
    HeadersParsed,
    Data { available: usize, finished: bool },
}

pub struct Connection<S> {
    io: IoBuf<S>,
    config: Arc<Config>,
    read_state: ReadState,
    write_state: WriteState,
    head: Option<Head>,
    body_total: u64,
    body_read: u64,
    data_dirty: bool,
    status: Status,
    response_headers: Vec<(String, Vec<u8>)>,
    closed: bool,
}

impl<S: AsyncRead + AsyncWrite> Connection<S> {
    pub(crate) fn new(sock: S, config: &Arc<Config>) -> Connection<S> {
        Connection {
            io: IoBuf::new(sock),
            config: config.clone(),
            read_state: ReadState::Headers,
            write_state: WriteState::Idle,
            head: None,
            body_total: 0,
            body_read: 0,
            data_dirty: false,
            status: Status::Ok,
            response_headers: Vec::new(),
            closed: false,
        }
    }

    /// The parsed request head
    ///
    /// # Panics
    ///
    /// Panics when called before the head was parsed. Dispatchers and
    /// codecs only run after parsing, so they may call this freely.
    pub fn head(&self) -> &Head {
        self.head.as_ref().expect("request head is not parsed yet")
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of body bytes buffered and ready to be read
    pub fn bytes_available(&self) -> usize {
        if self.read_state == ReadState::Headers || self.closed {
            0
        } else {
            self.io.in_buf.len()
        }
    }

    /// Take up to `max` body bytes out of the inbound buffer
    ///
    /// Returns an empty vector while the head is still being received
    /// and after `close`.
    pub fn read_bytes(&mut self, max: usize) -> Vec<u8> {
        if self.read_state == ReadState::Headers || self.closed {
            return Vec::new();
        }
        let n = min(max, self.io.in_buf.len());
        let data = self.io.in_buf[..n].to_vec();
        self.io.in_buf.consume(n);
        self.body_read += n as u64;
        data
    }

    /// Set the response status line
    ///
    /// Ignored with a warning once the head is committed to the wire.
    pub fn set_status(&mut self, status: Status) {
        if self.write_state != WriteState::Idle {
            warn!("set_status after response headers were written");
            return;
        }
        self.status = status;
    }

    /// Set a response header, replacing an existing one of the same name
    ///
    /// Ignored with a warning once the head is committed to the wire.
    pub fn set_header<V: AsRef<[u8]>>(&mut self, name: &str, value: V)
        -> Result<(), HeaderError>
    {
        if serializer::invalid_header(name.as_bytes()) {
            return Err(HeaderError::InvalidHeaderName);
        }
        if serializer::invalid_header(value.as_ref()) {
            return Err(HeaderError::InvalidHeaderValue);
        }
        if self.write_state != WriteState::Idle {
            warn!("set_header after response headers were written");
            return Ok(());
        }
        let value = value.as_ref().to_vec();
        for &mut (ref n, ref mut v) in self.response_headers.iter_mut() {
            if n.eq_ignore_ascii_case(name) {
                *v = value;
                return Ok(());
            }
        }
        self.response_headers.push((name.to_string(), value));
        Ok(())
    }

    pub fn set_headers<V: AsRef<[u8]>>(&mut self,
        headers: &[(&str, V)])
        -> Result<(), HeaderError>
    {
        for &(name, ref value) in headers {
            self.set_header(name, value.as_ref())?;
        }
        Ok(())
    }

    /// Render the status line and headers into the output buffer
    ///
    /// Happens implicitly on the first `write_bytes` call; calling it
    /// again is a no-op.
    pub fn write_headers(&mut self) {
        if self.write_state != WriteState::Idle {
            return;
        }
        let before = self.io.out_buf.len();
        serializer::render_response_head(&mut self.io.out_buf,
            &self.status, &self.response_headers);
        let rendered = self.io.out_buf.len() - before;
        self.write_state = WriteState::Headers {
            remaining: rendered as u64,
        };
    }

    /// Append body bytes to the outbound buffer
    ///
    /// The response head is rendered first if it was not yet. Everything
    /// is always accepted since the buffer grows as needed; the caller
    /// is expected to pace itself on `output_pending`.
    pub fn write_bytes(&mut self, data: &[u8]) -> usize {
        if self.closed {
            return 0;
        }
        self.write_headers();
        self.io.out_buf.extend(data);
        data.len()
    }

    /// Respond with an empty body carrying an error status
    ///
    /// The connection is not closed here, the codec decides that.
    pub fn write_error(&mut self, status: Status) {
        self.set_status(status);
        // static value cannot fail validation
        self.set_header("Content-Length", "0").unwrap();
        self.write_headers();
    }

    /// Number of outbound bytes not yet written to the socket
    pub fn output_pending(&self) -> usize {
        self.io.out_buf.len()
    }

    /// Shut the exchange down
    ///
    /// Both machines are forced into their final state and buffered
    /// input is dropped. Outbound data already queued is still flushed
    /// by the protocol handler. Calling this twice is fine.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.read_state = ReadState::Finished;
        self.write_state = WriteState::Finished;
        let pending = self.io.in_buf.len();
        self.io.in_buf.consume(pending);
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn read_finished(&self) -> bool {
        self.read_state == ReadState::Finished
    }

    pub(crate) fn transport_eof(&self) -> bool {
        self.io.done()
    }

    /// Append bytes to the wire without response-head bookkeeping
    ///
    /// Used by the relay codec which forwards an upstream response
    /// verbatim, head included.
    pub(crate) fn write_raw(&mut self, data: &[u8]) {
        if self.closed {
            return;
        }
        if self.write_state == WriteState::Idle {
            self.write_state = WriteState::Data;
        }
        self.io.out_buf.extend(data);
    }

    /// Pull bytes from the socket into the inbound buffer
    ///
    /// Bytes beyond the declared body length are discarded right away
    /// so a chatty peer cannot grow the buffer.
    pub(crate) fn fill_input(&mut self) -> Result<usize, Error> {
        if self.closed {
            return Ok(0);
        }
        let n = self.io.read()?;
        if n > 0 {
            self.data_dirty = true;
        }
        if self.read_state != ReadState::Headers {
            self.truncate_excess_body();
        }
        Ok(n)
    }

    fn truncate_excess_body(&mut self) {
        let allowed = (self.body_total - self.body_read) as usize;
        if self.io.in_buf.len() > allowed {
            self.io.in_buf.remove_range(allowed..);
        }
    }

    /// Flush the outbound buffer, returning acknowledged body bytes
    ///
    /// Bytes belonging to the response head are swallowed by the
    /// accounting here so `bytes_flushed` only ever reports body
    /// progress to the codec.
    pub(crate) fn flush_output(&mut self) -> Result<u64, Error> {
        let before = self.io.out_buf.len();
        self.io.flush()?;
        let mut flushed = (before - self.io.out_buf.len()) as u64;
        if let WriteState::Headers { ref mut remaining } = self.write_state {
            let head_part = min(*remaining, flushed);
            *remaining -= head_part;
            flushed -= head_part;
        }
        if self.write_state == (WriteState::Headers { remaining: 0 }) {
            self.write_state = WriteState::Data;
        }
        Ok(flushed)
    }

    /// Advance the read machine, reporting at most one event
    ///
    /// The protocol handler calls this in a loop until it returns
    /// `None`, forwarding each event to the codec.
    pub(crate) fn advance_read(&mut self)
        -> Result<Option<ReadEvent>, Error>
    {
        if self.closed {
            return Ok(None);
        }
        match self.read_state {
            ReadState::Headers => {
                let parsed = {
                    let buf = &self.io.in_buf[..];
                    head::parse_head(buf)?
                };
                match parsed {
                    Some((head, bytes)) => {
                        self.io.in_buf.consume(bytes);
                        self.body_total = head.body_length().unwrap_or(0);
                        self.head = Some(head);
                        if self.body_total > 0 {
                            self.read_state = ReadState::Data;
                            self.data_dirty = true;
                        } else {
                            self.read_state = ReadState::Finished;
                        }
                        self.truncate_excess_body();
                        Ok(Some(ReadEvent::HeadersParsed))
                    }
                    None => {
                        if self.io.in_buf.len() >
                            self.config.max_request_header_size
                        {
                            return Err(Error::HeadersTooLong);
                        }
                        Ok(None)
                    }
                }
            }
            ReadState::Data => {
                if !self.data_dirty {
                    return Ok(None);
                }
                self.data_dirty = false;
                let available = self.io.in_buf.len();
                let arrived = self.body_read + available as u64;
                let finished = arrived >= self.body_total;
                if finished {
                    self.read_state = ReadState::Finished;
                }
                if available == 0 && !finished {
                    return Ok(None);
                }
                Ok(Some(ReadEvent::Data {
                    available: available,
                    finished: finished,
                }))
            }
            ReadState::Finished => Ok(None),
        }
    }
}
