//! The protocol handler future
//!
//! `Proto` owns the connection, the dispatcher and the current codec
//! and resolves when the exchange is over. Spawn one per accepted
//! socket.

use std::sync::Arc;

use futures::{Future, Async, Poll};
use tokio_io::{AsyncRead, AsyncWrite};

use super::connection::ReadEvent;
use super::{Config, Connection, Dispatcher, Codec, Error};

pub struct Proto<S, D: Dispatcher<S>> {
    conn: Connection<S>,
    dispatcher: D,
    codec: Option<D::Codec>,
}

impl<S, D> Proto<S, D>
    where S: AsyncRead + AsyncWrite,
          D: Dispatcher<S>,
{
    /// Create a protocol handler for an accepted stream
    pub fn new(sock: S, cfg: &Arc<Config>, dispatcher: D)
        -> Proto<S, D>
    {
        Proto {
            conn: Connection::new(sock, cfg),
            dispatcher: dispatcher,
            codec: None,
        }
    }
}

impl<S, D> Future for Proto<S, D>
    where S: AsyncRead + AsyncWrite,
          D: Dispatcher<S>,
{
    type Item = ();
    type Error = Error;

    fn poll(&mut self) -> Poll<(), Error> {
        loop {
            let mut progress = false;

            let out_before = self.conn.output_pending();
            let acked = self.conn.flush_output()?;
            if self.conn.output_pending() < out_before {
                progress = true;
            }
            if acked > 0 && !self.conn.is_closed() {
                if let Some(ref mut codec) = self.codec {
                    codec.bytes_flushed(&mut self.conn, acked)?;
                }
            }

            if self.conn.is_closed() {
                if self.conn.output_pending() == 0 {
                    return Ok(Async::Ready(()));
                }
                if !progress {
                    return Ok(Async::NotReady);
                }
                continue;
            }

            if self.conn.fill_input()? > 0 {
                progress = true;
            }

            while let Some(event) = self.conn.advance_read()? {
                progress = true;
                match event {
                    ReadEvent::HeadersParsed => {
                        let codec = {
                            let head = self.conn.head();
                            debug!("incoming request {} {}",
                                head.method(), head.path());
                            self.dispatcher.headers_received(head)?
                        };
                        self.codec = Some(codec);
                        if self.conn.read_finished() {
                            if let Some(ref mut codec) = self.codec {
                                codec.end_of_request(&mut self.conn)?;
                            }
                        }
                    }
                    ReadEvent::Data { available, finished } => {
                        if let Some(ref mut codec) = self.codec {
                            codec.data_received(&mut self.conn,
                                available, finished)?;
                            if finished {
                                codec.end_of_request(&mut self.conn)?;
                            }
                        }
                    }
                }
            }

            if self.conn.transport_eof() && !self.conn.read_finished() {
                // drops whatever the codec owns, e.g. an upstream socket
                self.codec = None;
                return Err(Error::ConnectionReset);
            }

            let mut response_done = false;
            if let Some(ref mut codec) = self.codec {
                let before = self.conn.output_pending();
                match codec.poll(&mut self.conn)? {
                    Async::Ready(()) => {
                        response_done = true;
                    }
                    Async::NotReady => {}
                }
                if self.conn.output_pending() != before {
                    progress = true;
                }
            }
            if response_done {
                trace!("response complete, closing");
                self.codec = None;
                self.conn.close();
                progress = true;
            }

            if !progress {
                return Ok(Async::NotReady);
            }
        }
    }
}
