//! Relaying requests to an upstream server
//!
//! The [`Proxy`] dispatcher opens a TCP connection per request,
//! forwards the request head and body and pipes the upstream response
//! back verbatim, without reparsing it.
//!
//! [`Proxy`]: struct.Proxy.html

use std::io;
use std::mem;
use std::net::SocketAddr;

use futures::{Async, Future};
use netbuf::Buf;
use tk_bufstream::IoBuf;
use tokio_core::net::{TcpStream, TcpStreamNew};
use tokio_core::reactor::Handle;
use tokio_io::{AsyncRead, AsyncWrite};

use enums::Status;
use serializer;
use server::{Codec, Connection, Dispatcher, Error, Head};

const RELAY_CHUNK: usize = 65536;

/// Dispatcher relaying every request to a fixed upstream address
pub struct Proxy {
    target: SocketAddr,
    handle: Handle,
}

enum RelayState<U, F> {
    /// Upstream connect in flight, the rendered request head waits
    Connect { future: F, head: Buf },
    /// Bytes flow in both directions until upstream closes
    Stream { upstream: IoBuf<U> },
    Void,
}

/// Codec relaying a single exchange
///
/// Generic over the upstream stream and the future producing it so
/// tests can substitute an in-memory pair.
pub struct ProxyCodec<U, F> {
    state: RelayState<U, F>,
}

impl Proxy {
    pub fn new(handle: &Handle, target: SocketAddr) -> Proxy {
        Proxy {
            target: target,
            handle: handle.clone(),
        }
    }
}

impl<S: AsyncRead + AsyncWrite> Dispatcher<S> for Proxy {
    type Codec = ProxyCodec<TcpStream, TcpStreamNew>;

    fn headers_received(&mut self, head: &Head)
        -> Result<Self::Codec, Error>
    {
        debug!("relaying {} {} to {}",
            head.method(), head.path(), self.target);
        Ok(ProxyCodec::new(
            TcpStream::connect(&self.target, &self.handle), head))
    }
}

impl<U, F> ProxyCodec<U, F> {
    /// Create a relay codec from a connect future and the parsed head
    pub fn new(future: F, head: &Head) -> ProxyCodec<U, F> {
        let mut buf = Buf::new();
        serializer::render_request_head(&mut buf, head);
        ProxyCodec {
            state: RelayState::Connect { future: future, head: buf },
        }
    }
}

impl<S, U, F> Codec<S> for ProxyCodec<U, F>
    where S: AsyncRead + AsyncWrite,
          U: AsyncRead + AsyncWrite,
          F: Future<Item=U, Error=io::Error>,
{
    fn poll(&mut self, conn: &mut Connection<S>)
        -> Result<Async<()>, Error>
    {
        loop {
            match mem::replace(&mut self.state, RelayState::Void) {
                RelayState::Connect { mut future, head } => {
                    match future.poll() {
                        Ok(Async::Ready(sock)) => {
                            let mut upstream = IoBuf::new(sock);
                            upstream.out_buf.extend(&head[..]);
                            self.state = RelayState::Stream {
                                upstream: upstream,
                            };
                        }
                        Ok(Async::NotReady) => {
                            self.state = RelayState::Connect {
                                future: future,
                                head: head,
                            };
                            return Ok(Async::NotReady);
                        }
                        Err(e) => {
                            warn!("upstream connect failed: {}", e);
                            conn.write_error(Status::BadGateway);
                            return Ok(Async::Ready(()));
                        }
                    }
                }
                RelayState::Stream { mut upstream } => {
                    loop {
                        let data = conn.read_bytes(RELAY_CHUNK);
                        if data.is_empty() {
                            break;
                        }
                        upstream.out_buf.extend(&data);
                    }
                    upstream.flush()?;
                    let watermark = conn.config().watermark();
                    loop {
                        if conn.output_pending() >= watermark {
                            break;
                        }
                        if upstream.read()? == 0 {
                            break;
                        }
                        let bytes = upstream.in_buf.len();
                        conn.write_raw(&upstream.in_buf[..]);
                        upstream.in_buf.consume(bytes);
                    }
                    if upstream.done() {
                        trace!("upstream closed, relay complete");
                        return Ok(Async::Ready(()));
                    }
                    self.state = RelayState::Stream {
                        upstream: upstream,
                    };
                    return Ok(Async::NotReady);
                }
                RelayState::Void => unreachable!(),
            }
        }
    }
}
