//! Shared helpers for client integration tests
//!
//! [`TestNode`] is an in-process TCP server that speaks the real framing and
//! answers each request with a handler closure, in the wire format the
//! request arrived in.

#![allow(dead_code)]

use ainode_protocol::{decode_frame, encode_frame, Endpoint};
use anyhow::Result;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tracing::debug;

/// Initialize tracing for tests
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ainode_client=debug".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

/// Endpoint on localhost that refuses connections
pub async fn dead_endpoint() -> Result<Endpoint> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(Endpoint::new("127.0.0.1", port))
}

/// Node that accepts connections and reads requests without ever answering
pub async fn silent_node() -> Result<(Endpoint, JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let endpoint = Endpoint::new("127.0.0.1", listener.local_addr()?.port());
    let handle = tokio::spawn(async move {
        let mut sockets = Vec::new();
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            sockets.push(socket);
        }
    });
    Ok((endpoint, handle))
}

/// In-process node answering framed requests
pub struct TestNode {
    endpoint: Endpoint,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
    requests: Arc<AtomicUsize>,
}

impl TestNode {
    pub async fn start<Req, Resp, F>(handler: F) -> Result<Self>
    where
        Req: DeserializeOwned + Send + 'static,
        Resp: Serialize + Send + 'static,
        F: Fn(Req) -> Resp + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let endpoint = Endpoint::new("127.0.0.1", listener.local_addr()?.port());
        let tasks = Arc::new(Mutex::new(Vec::new()));
        let requests = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(handler);

        let accept_tasks = Arc::clone(&tasks);
        let accept_requests = Arc::clone(&requests);
        let accept = tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let handler = Arc::clone(&handler);
                let requests = Arc::clone(&accept_requests);
                let task = tokio::spawn(async move {
                    if let Err(e) = serve(socket, handler.as_ref(), &requests).await {
                        debug!(error = %e, "Test node connection ended");
                    }
                });
                accept_tasks.lock().push(task);
            }
        });
        tasks.lock().push(accept);

        Ok(Self {
            endpoint,
            tasks,
            requests,
        })
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint.clone()
    }

    /// Requests answered so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Stop listening and drop every open connection
    pub fn shutdown(&self) {
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
    }
}

impl Drop for TestNode {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn serve<Req, Resp, F>(mut socket: TcpStream, handler: &F, requests: &AtomicUsize) -> Result<()>
where
    Req: DeserializeOwned,
    Resp: Serialize,
    F: Fn(Req) -> Resp,
{
    loop {
        let mut len_buf = [0u8; 4];
        socket.read_exact(&mut len_buf).await?;
        let mut buf = vec![0u8; u32::from_be_bytes(len_buf) as usize];
        socket.read_exact(&mut buf).await?;

        let (request, format, correlation_id) = decode_frame::<Req>(&buf)?;
        let response = handler(request);
        requests.fetch_add(1, Ordering::SeqCst);

        let frame = encode_frame(format, correlation_id, &response)?;
        socket.write_all(&(frame.len() as u32).to_be_bytes()).await?;
        socket.write_all(&frame).await?;
    }
}
