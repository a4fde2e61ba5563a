//! Single-shot HTTP service based on `tokio` tools
//!
//! This crate implements just enough of HTTP/1.x to serve one request
//! and stream one response per connection (the HTTP/1.0 model): a dual
//! read/write state machine over a raw duplex stream, plus two services
//! built on top of it -- range-restricted file serving and raw TCP
//! relaying. Chunked encoding, keep-alive and pipelining are deliberately
//! not implemented.
#![recursion_limit="100"]

extern crate futures;
extern crate httparse;
extern crate tokio_core;
extern crate tokio_io;
extern crate tk_bufstream;
extern crate netbuf;
#[macro_use(quick_error)] extern crate quick_error;
#[macro_use] extern crate matches;
#[macro_use] extern crate log;

pub mod server;
pub mod serve;
pub mod proxy;
mod enums;
mod headers;
mod range;
mod serializer;

pub use enums::{Version, Status};
pub use range::ByteRange;
pub use serializer::HeaderError;
