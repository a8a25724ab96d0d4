//! Transport abstraction used by the clients
//!
//! Clients never touch sockets directly: they ask a [`Connector`] for a
//! [`Channel`] to an endpoint and exchange typed messages over it. The TCP
//! implementation lives in [`connection`](crate::connection); tests swap in a
//! scripted one.

use crate::Result;
use ainode_protocol::Endpoint;
use async_trait::async_trait;

/// An open request/response channel to one endpoint
///
/// A channel never retries internally; retry policy belongs to its owner.
#[async_trait]
pub trait Channel<Req: Sync, Resp>: Send {
    fn endpoint(&self) -> &Endpoint;

    /// Whether the channel is still usable, as last observed
    fn is_open(&self) -> bool;

    /// Send one request and wait for its response
    ///
    /// A transport-level failure (see [`Error::is_transport`](crate::Error::is_transport))
    /// leaves the channel closed.
    async fn call(&mut self, request: &Req) -> Result<Resp>;

    /// Release the channel. Safe to call more than once.
    async fn close(&mut self);
}

/// Opens channels to endpoints
#[async_trait]
pub trait Connector<Req: Sync, Resp>: Send + Sync {
    /// Fails with [`Error::ConnectFailure`](crate::Error::ConnectFailure) when
    /// the endpoint cannot be reached
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn Channel<Req, Resp>>>;
}
