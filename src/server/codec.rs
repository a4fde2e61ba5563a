use futures::Async;

use super::{Connection, Error, Head};

/// A handler which is responsible for a single request exchange
///
/// Created by a [`Dispatcher`] once the request head is parsed. All
/// callbacks receive the connection so they can read the body and
/// write the response.
///
/// [`Dispatcher`]: trait.Dispatcher.html
pub trait Codec<S> {
    /// Body bytes became available in the inbound buffer
    ///
    /// `available` is the total buffered amount, `end` is true when the
    /// last body byte has arrived. The codec is not required to consume
    /// anything here, `poll` runs right after.
    fn data_received(&mut self, _conn: &mut Connection<S>,
        _available: usize, _end: bool)
        -> Result<(), Error>
    {
        Ok(())
    }

    /// The whole request, body included, has been received
    fn end_of_request(&mut self, _conn: &mut Connection<S>)
        -> Result<(), Error>
    {
        Ok(())
    }

    /// `bytes` of the response body were written to the socket
    ///
    /// Head bytes are accounted for separately and never show up here.
    fn bytes_flushed(&mut self, _conn: &mut Connection<S>, _bytes: u64)
        -> Result<(), Error>
    {
        Ok(())
    }

    /// Make progress on producing the response
    ///
    /// Called on every protocol handler wakeup. Return `Async::Ready`
    /// when the response is complete; the connection is closed once
    /// the outbound buffer drains.
    fn poll(&mut self, conn: &mut Connection<S>)
        -> Result<Async<()>, Error>;
}

/// An object that creates a codec for each incoming request
pub trait Dispatcher<S> {
    type Codec: Codec<S>;

    /// Request head is parsed, decide how to handle the request
    ///
    /// Returning an error aborts the connection without a response.
    fn headers_received(&mut self, head: &Head)
        -> Result<Self::Codec, Error>;
}

impl<S> Codec<S> for Box<Codec<S>> {
    fn data_received(&mut self, conn: &mut Connection<S>,
        available: usize, end: bool)
        -> Result<(), Error>
    {
        (**self).data_received(conn, available, end)
    }
    fn end_of_request(&mut self, conn: &mut Connection<S>)
        -> Result<(), Error>
    {
        (**self).end_of_request(conn)
    }
    fn bytes_flushed(&mut self, conn: &mut Connection<S>, bytes: u64)
        -> Result<(), Error>
    {
        (**self).bytes_flushed(conn, bytes)
    }
    fn poll(&mut self, conn: &mut Connection<S>)
        -> Result<Async<()>, Error>
    {
        (**self).poll(conn)
    }
}
