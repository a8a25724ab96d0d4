//! Scripted in-memory transport for testing clients without a network
//!
//! Each endpoint gets a queue of scripted replies. Endpoints can be marked
//! unreachable, in which case `connect` fails. Every connect attempt and every
//! call is recorded for later assertions.

use crate::transport::{Channel, Connector};
use crate::{Error, Result};
use ainode_protocol::Endpoint;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// A scripted reply to the next call on an endpoint
#[derive(Debug, Clone)]
pub enum MockReply<Resp> {
    Respond(Resp),
    /// The connection drops mid-call
    Drop,
    /// The peer accepts the request and never answers
    Hang,
}

struct MockState<Req, Resp> {
    unreachable: HashSet<Endpoint>,
    replies: HashMap<Endpoint, VecDeque<MockReply<Resp>>>,
    connect_attempts: Vec<Endpoint>,
    calls: Vec<(Endpoint, Req)>,
}

/// Connector handing out [`MockChannel`]s that share one script
pub struct MockConnector<Req, Resp> {
    state: Arc<Mutex<MockState<Req, Resp>>>,
}

impl<Req, Resp> Clone for MockConnector<Req, Resp> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<Req, Resp> Default for MockConnector<Req, Resp> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Resp> MockConnector<Req, Resp> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                unreachable: HashSet::new(),
                replies: HashMap::new(),
                connect_attempts: Vec::new(),
                calls: Vec::new(),
            })),
        }
    }

    pub fn set_unreachable(&self, endpoint: &Endpoint, unreachable: bool) {
        let mut state = self.state.lock();
        if unreachable {
            state.unreachable.insert(endpoint.clone());
        } else {
            state.unreachable.remove(endpoint);
        }
    }

    pub fn push_response(&self, endpoint: &Endpoint, response: Resp) {
        self.push_reply(endpoint, MockReply::Respond(response));
    }

    pub fn push_drop(&self, endpoint: &Endpoint) {
        self.push_reply(endpoint, MockReply::Drop);
    }

    pub fn push_hang(&self, endpoint: &Endpoint) {
        self.push_reply(endpoint, MockReply::Hang);
    }

    pub fn push_reply(&self, endpoint: &Endpoint, reply: MockReply<Resp>) {
        self.state
            .lock()
            .replies
            .entry(endpoint.clone())
            .or_default()
            .push_back(reply);
    }

    /// Endpoints passed to `connect`, in order, including failed attempts
    pub fn connect_attempts(&self) -> Vec<Endpoint> {
        self.state.lock().connect_attempts.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Replies still queued for `endpoint`
    pub fn pending_replies(&self, endpoint: &Endpoint) -> usize {
        self.state
            .lock()
            .replies
            .get(endpoint)
            .map_or(0, VecDeque::len)
    }
}

impl<Req: Clone, Resp> MockConnector<Req, Resp> {
    /// Calls received, with the endpoint that received each
    pub fn calls(&self) -> Vec<(Endpoint, Req)> {
        self.state.lock().calls.clone()
    }
}

#[async_trait]
impl<Req, Resp> Connector<Req, Resp> for MockConnector<Req, Resp>
where
    Req: Clone + Send + Sync + 'static,
    Resp: Send + 'static,
{
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn Channel<Req, Resp>>> {
        let unreachable = {
            let mut state = self.state.lock();
            state.connect_attempts.push(endpoint.clone());
            state.unreachable.contains(endpoint)
        };
        if unreachable {
            return Err(Error::ConnectFailure {
                endpoint: endpoint.clone(),
                reason: "connection refused".into(),
            });
        }
        Ok(Box::new(MockChannel {
            endpoint: endpoint.clone(),
            open: true,
            state: Arc::clone(&self.state),
        }))
    }
}

/// One scripted connection
pub struct MockChannel<Req, Resp> {
    endpoint: Endpoint,
    open: bool,
    state: Arc<Mutex<MockState<Req, Resp>>>,
}

#[async_trait]
impl<Req, Resp> Channel<Req, Resp> for MockChannel<Req, Resp>
where
    Req: Clone + Send + Sync + 'static,
    Resp: Send + 'static,
{
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn is_open(&self) -> bool {
        self.open
    }

    async fn call(&mut self, request: &Req) -> Result<Resp> {
        if !self.open {
            return Err(Error::Transport(format!(
                "connection to {} is closed",
                self.endpoint
            )));
        }

        let reply = {
            let mut state = self.state.lock();
            state.calls.push((self.endpoint.clone(), request.clone()));
            state
                .replies
                .get_mut(&self.endpoint)
                .and_then(VecDeque::pop_front)
        };

        match reply {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Drop) => {
                self.open = false;
                Err(Error::Transport(format!(
                    "connection to {} reset by peer",
                    self.endpoint
                )))
            }
            Some(MockReply::Hang) => std::future::pending().await,
            None => {
                self.open = false;
                Err(Error::Transport(format!(
                    "no scripted reply for {}",
                    self.endpoint
                )))
            }
        }
    }

    async fn close(&mut self) {
        self.open = false;
    }
}
