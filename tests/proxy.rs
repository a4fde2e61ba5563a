extern crate futures;
extern crate tokio_io;
#[macro_use] extern crate matches;
extern crate tk_http10;

mod support;

use std::io;

use futures::{Async, Future};
use futures::future::{self, FutureResult};

use tk_http10::proxy::ProxyCodec;
use tk_http10::server::{Config, Dispatcher, Error, Head, Proto};
use support::MockStream;

struct MockRelay {
    upstream: Result<MockStream, ()>,
}

impl Dispatcher<MockStream> for MockRelay {
    type Codec = ProxyCodec<MockStream,
        FutureResult<MockStream, io::Error>>;

    fn headers_received(&mut self, head: &Head)
        -> Result<Self::Codec, Error>
    {
        let future = match self.upstream {
            Ok(ref up) => future::ok(up.clone()),
            Err(()) => future::err(io::Error::new(
                io::ErrorKind::ConnectionRefused, "connection refused")),
        };
        Ok(ProxyCodec::new(future, head))
    }
}

fn poll_until_ready(proto: &mut Proto<MockStream, MockRelay>) {
    for _ in 0..100 {
        match proto.poll().unwrap() {
            Async::Ready(()) => return,
            Async::NotReady => {}
        }
    }
    panic!("relay did not finish");
}

#[test]
fn response_is_piped_back_verbatim() {
    let down = MockStream::new();
    let up = MockStream::new();
    let mut proto = Proto::new(down.clone(), &Config::new().done(),
        MockRelay { upstream: Ok(up.clone()) });
    down.push_input(b"GET /x HTTP/1.0\r\nHost: a\r\n\r\n");
    proto.poll().unwrap();
    assert_eq!(&up.output()[..],
        &b"GET /x HTTP/1.0\r\nHost: a\r\n\r\n"[..]);
    // a reply the engine itself would never generate, to prove the
    // bytes are not reframed on the way back
    let response: &[u8] =
        b"HTTP/1.1 200 OK\r\nX-Raw: \t odd\r\n\r\nupstream body";
    up.push_input(response);
    up.set_eof();
    poll_until_ready(&mut proto);
    assert_eq!(&down.output()[..], response);
}

#[test]
fn request_body_is_forwarded() {
    let down = MockStream::new();
    let up = MockStream::new();
    let mut proto = Proto::new(down.clone(), &Config::new().done(),
        MockRelay { upstream: Ok(up.clone()) });
    down.push_input(b"POST /p HTTP/1.0\r\nContent-Length: 4\r\n\r\nping");
    proto.poll().unwrap();
    assert_eq!(&up.output()[..],
        &b"POST /p HTTP/1.0\r\nContent-Length: 4\r\n\r\nping"[..]);
    up.push_input(b"HTTP/1.0 200 OK\r\n\r\n");
    up.set_eof();
    poll_until_ready(&mut proto);
    assert_eq!(&down.output()[..], &b"HTTP/1.0 200 OK\r\n\r\n"[..]);
}

#[test]
fn failed_connect_turns_into_bad_gateway() {
    let down = MockStream::new();
    let mut proto = Proto::new(down.clone(), &Config::new().done(),
        MockRelay { upstream: Err(()) });
    down.push_input(b"GET /x HTTP/1.0\r\n\r\n");
    poll_until_ready(&mut proto);
    assert_eq!(&down.output()[..],
        &b"HTTP/1.0 502 Bad Gateway\r\nContent-Length: 0\r\n\r\n"[..]);
}

#[test]
fn client_disconnect_aborts_the_relay() {
    let down = MockStream::new();
    let up = MockStream::new();
    let mut proto = Proto::new(down.clone(), &Config::new().done(),
        MockRelay { upstream: Ok(up.clone()) });
    down.push_input(b"POST /p HTTP/1.0\r\nContent-Length: 10\r\n\r\nabc");
    down.set_eof();
    assert!(matches!(proto.poll(), Err(Error::ConnectionReset)));
}
