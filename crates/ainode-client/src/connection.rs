use crate::config::{ClientConfig, TransportConfig};
use crate::transport::{Channel, Connector};
use crate::{Error, Result};
use ainode_protocol::{decode_frame, encode_frame, Endpoint, WireFormat};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

// ============================================================================
// Framed Stream
// ============================================================================

/// Buffered halves of one TCP stream
struct FramedStream {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl FramedStream {
    fn new(stream: TcpStream) -> Self {
        let (read, write) = stream.into_split();
        Self {
            reader: BufReader::new(read),
            writer: BufWriter::new(write),
        }
    }

    /// Write one length-prefixed frame and read one back
    async fn exchange(&mut self, frame: &[u8], max_frame_size: usize) -> Result<Vec<u8>> {
        // Write length prefix + frame
        let len = frame.len() as u32;
        self.writer.write_all(&len.to_be_bytes()).await?;
        self.writer.write_all(frame).await?;
        self.writer.flush().await?;

        // Read length prefix
        let mut len_buf = [0u8; 4];
        self.reader.read_exact(&mut len_buf).await?;
        let msg_len = u32::from_be_bytes(len_buf) as usize;

        if msg_len > max_frame_size {
            return Err(Error::ResponseTooLarge(msg_len, max_frame_size));
        }

        let mut response_buf = vec![0u8; msg_len];
        self.reader.read_exact(&mut response_buf).await?;
        Ok(response_buf)
    }
}

// ============================================================================
// Connection
// ============================================================================

/// A framed, buffered transport to a single endpoint
pub struct Connection {
    endpoint: Endpoint,
    stream: Option<FramedStream>,
    format: WireFormat,
    config: TransportConfig,
    next_correlation_id: u32,
}

impl Connection {
    /// Open a connection. Never retries.
    pub async fn open(
        endpoint: &Endpoint,
        config: &TransportConfig,
        format: WireFormat,
    ) -> Result<Self> {
        let connect_failure = |reason: String| {
            warn!(endpoint = %endpoint, reason = %reason, "Failed to connect");
            Error::ConnectFailure {
                endpoint: endpoint.clone(),
                reason,
            }
        };

        let stream = match timeout(config.connect_timeout, TcpStream::connect(endpoint.address())).await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(connect_failure(e.to_string())),
            Err(_) => {
                return Err(connect_failure(format!(
                    "connect timed out after {:?}",
                    config.connect_timeout
                )))
            }
        };
        stream
            .set_nodelay(config.tcp_nodelay)
            .map_err(|e| connect_failure(e.to_string()))?;

        info!(endpoint = %endpoint, format = ?format, "Connected");
        Ok(Self {
            endpoint: endpoint.clone(),
            stream: Some(FramedStream::new(stream)),
            format,
            config: config.clone(),
            next_correlation_id: 1,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Send a request and receive a response
    ///
    /// I/O failures, timeouts and out-of-sync responses close the connection.
    pub async fn send_request<Req, Resp>(&mut self, request: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let correlation_id = self.next_correlation_id;
        self.next_correlation_id = self.next_correlation_id.wrapping_add(1);
        let frame = encode_frame(self.format, correlation_id, request)?;

        let stream = self.stream.as_mut().ok_or_else(|| {
            Error::Transport(format!("connection to {} is closed", self.endpoint))
        })?;

        let exchanged = timeout(
            self.config.request_timeout,
            stream.exchange(&frame, self.config.max_frame_size),
        )
        .await;
        let response_buf = match exchanged {
            Ok(Ok(buf)) => buf,
            Ok(Err(e)) => {
                warn!(endpoint = %self.endpoint, error = %e, "Request failed, closing connection");
                self.close().await;
                return Err(e);
            }
            Err(_) => {
                warn!(endpoint = %self.endpoint, "Request timed out, closing connection");
                self.close().await;
                return Err(Error::Timeout(format!(
                    "no response from {} within {:?}",
                    self.endpoint, self.config.request_timeout
                )));
            }
        };

        let (response, format, response_id) = decode_frame::<Resp>(&response_buf)?;
        if format != self.format {
            self.close().await;
            return Err(Error::Transport(format!(
                "wire format mismatch from {}: expected {:?}, got {:?}",
                self.endpoint, self.format, format
            )));
        }
        if response_id != correlation_id {
            self.close().await;
            return Err(Error::Transport(format!(
                "correlation id mismatch from {}: expected {}, got {}",
                self.endpoint, correlation_id, response_id
            )));
        }
        Ok(response)
    }

    /// Close the connection. Idempotent.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.writer.shutdown().await {
                debug!(endpoint = %self.endpoint, error = %e, "Error during shutdown");
            }
            debug!(endpoint = %self.endpoint, "Connection closed");
        }
    }
}

#[async_trait]
impl<Req, Resp> Channel<Req, Resp> for Connection
where
    Req: Serialize + Send + Sync + 'static,
    Resp: DeserializeOwned + Send + 'static,
{
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    async fn call(&mut self, request: &Req) -> Result<Resp> {
        self.send_request(request).await
    }

    async fn close(&mut self) {
        Connection::close(self).await
    }
}

// ============================================================================
// TCP Connector
// ============================================================================

/// Opens [`Connection`]s with a fixed transport configuration and wire format
#[derive(Debug, Clone)]
pub struct TcpConnector {
    config: TransportConfig,
    format: WireFormat,
}

impl TcpConnector {
    pub fn new(config: TransportConfig, format: WireFormat) -> Self {
        Self { config, format }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.transport(), config.wire_format())
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }
}

#[async_trait]
impl<Req, Resp> Connector<Req, Resp> for TcpConnector
where
    Req: Serialize + Send + Sync + 'static,
    Resp: DeserializeOwned + Send + 'static,
{
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn Channel<Req, Resp>>> {
        let connection = Connection::open(endpoint, &self.config, self.format).await?;
        Ok(Box::new(connection))
    }
}
