//! Server side of the engine
//!
//! To handle connections implement a [`Dispatcher`] that creates a
//! [`Codec`] per request, then spawn a [`Proto`] for each accepted
//! stream.
//!
//! [`Dispatcher`]: trait.Dispatcher.html
//! [`Codec`]: trait.Codec.html
//! [`Proto`]: struct.Proto.html

mod codec;
mod config;
mod connection;
mod error;
mod head;
mod proto;

pub use self::codec::{Codec, Dispatcher};
pub use self::connection::Connection;
pub use self::error::Error;
pub use self::head::Head;
pub use self::proto::Proto;

/// Configuration of the protocol handler
///
/// Starts out with defaults, is adjusted by the mutating methods and
/// sealed with `done`.
#[derive(Debug, Clone)]
pub struct Config {
    max_request_header_size: usize,
    output_watermark: usize,
}
