//! Paginated query client for a single data node
//!
//! A query is opened with [`DataNodeClient::open_query`], which returns the
//! first page wrapped in a [`QuerySession`]. [`QuerySession::drain`] then pulls
//! the remaining pages until the server reports no more data. There is no
//! failover: a data node failure is reported to the caller, who decides
//! whether to re-issue the whole query.
//!
//! # Example
//!
//! ```rust,ignore
//! use ainode_client::{DataNodeClient, TcpConnector};
//!
//! let mut client = DataNodeClient::connect(&endpoint, &connector).await?;
//! let dataset = client.fetch_timeseries("SELECT * FROM root.sg.d1").await?;
//! println!("{} rows", dataset.len());
//! ```

use crate::config::{DEFAULT_FETCH_SIZE, DEFAULT_FETCH_TIMEOUT_MS};
use crate::dataset::{ColumnLayout, Dataset};
use crate::transport::{Channel, Connector};
use crate::{Error, Result};
use ainode_protocol::{DataRequest, DataResponse, Endpoint};
use std::time::Duration;
use tokio::time;
use tracing::{debug, info, warn};

/// Client for one data node. No retries, no failover.
pub struct DataNodeClient {
    channel: Box<dyn Channel<DataRequest, DataResponse>>,
    fetch_size: u32,
    fetch_timeout: Duration,
}

impl DataNodeClient {
    /// Connect to a data node
    ///
    /// Fails with [`Error::ConnectFailure`] if the node cannot be reached.
    pub async fn connect<C>(endpoint: &Endpoint, connector: &C) -> Result<Self>
    where
        C: Connector<DataRequest, DataResponse> + ?Sized,
    {
        let channel = connector.connect(endpoint).await?;
        info!(endpoint = %endpoint, "Connected to data node");
        Ok(Self {
            channel,
            fetch_size: DEFAULT_FETCH_SIZE,
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
        })
    }

    /// Override the page size and query timeout used by [`fetch_timeseries`](Self::fetch_timeseries)
    pub fn with_fetch_defaults(mut self, fetch_size: u32, fetch_timeout: Duration) -> Self {
        self.fetch_size = fetch_size;
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.channel.endpoint()
    }

    pub fn is_open(&self) -> bool {
        self.channel.is_open()
    }

    /// Run a query to completion with the default page size and timeout
    pub async fn fetch_timeseries(&mut self, query_body: &str) -> Result<Dataset> {
        let (fetch_size, timeout) = (self.fetch_size, self.fetch_timeout);
        self.fetch_timeseries_with(query_body, fetch_size, timeout)
            .await
    }

    /// Run a query to completion: open it, then drain every page
    pub async fn fetch_timeseries_with(
        &mut self,
        query_body: &str,
        fetch_size: u32,
        timeout: Duration,
    ) -> Result<Dataset> {
        self.open_query(query_body, fetch_size, timeout)
            .await?
            .drain()
            .await
    }

    /// Send the initial query request and decode its first page
    ///
    /// Fails with [`Error::QueryFailure`] on a non-success status and with
    /// [`Error::EmptyResult`] if the first page has no rows.
    pub async fn open_query(
        &mut self,
        query_body: &str,
        fetch_size: u32,
        timeout: Duration,
    ) -> Result<QuerySession<'_>> {
        let endpoint = self.channel.endpoint().clone();
        let request = DataRequest::FetchTimeseries {
            query_body: query_body.to_string(),
            fetch_size,
            timeout_ms: timeout.as_millis() as u64,
        };
        match self.first_page(&request, query_body, timeout).await {
            Ok((query_id, has_more, dataset)) => {
                debug!(
                    endpoint = %endpoint,
                    query_id,
                    rows = dataset.len(),
                    has_more,
                    "Opened query"
                );
                Ok(QuerySession {
                    channel: &mut self.channel,
                    query_id,
                    fetch_size,
                    timeout,
                    has_more,
                    dataset,
                    pages: 1,
                })
            }
            Err(e) => {
                warn!(
                    endpoint = %endpoint,
                    operation = request.operation(),
                    query = %query_body,
                    error = %e,
                    "Fail to fetch data with query"
                );
                Err(e)
            }
        }
    }

    async fn first_page(
        &mut self,
        request: &DataRequest,
        query_body: &str,
        timeout: Duration,
    ) -> Result<(i64, bool, Dataset)> {
        let resp = match call_within(&mut self.channel, request, timeout).await? {
            DataResponse::Timeseries(resp) => resp,
            DataResponse::MoreData(_) => return Err(Error::InvalidResponse),
        };
        if !resp.status.is_success() {
            return Err(Error::QueryFailure(resp.status));
        }
        if resp.rows.is_empty() {
            return Err(Error::EmptyResult {
                query: query_body.to_string(),
            });
        }

        let layout = ColumnLayout::new(resp.column_names, resp.column_types, resp.column_index)?;
        let mut dataset = Dataset::new(layout);
        dataset.append_page(&resp.rows)?;
        Ok((resp.query_id, resp.has_more, dataset))
    }

    /// Release the connection. Safe to call more than once.
    pub async fn close(&mut self) {
        self.channel.close().await;
    }
}

/// An open query whose remaining pages have not been fetched yet
pub struct QuerySession<'a> {
    channel: &'a mut Box<dyn Channel<DataRequest, DataResponse>>,
    query_id: i64,
    fetch_size: u32,
    /// Bounds each page request
    timeout: Duration,
    has_more: bool,
    dataset: Dataset,
    pages: usize,
}

impl QuerySession<'_> {
    pub fn query_id(&self) -> i64 {
        self.query_id
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Rows received so far
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Fetch pages until the server reports no more data
    ///
    /// Any failure aborts the whole query with [`Error::FetchFailure`]; rows
    /// already received are dropped.
    pub async fn drain(mut self) -> Result<Dataset> {
        let request = DataRequest::FetchMoreData {
            query_id: self.query_id,
            fetch_size: self.fetch_size,
        };
        while self.has_more {
            if let Err(e) = self.next_page(&request).await {
                warn!(
                    endpoint = %self.channel.endpoint(),
                    operation = request.operation(),
                    query_id = self.query_id,
                    pages = self.pages,
                    error = %e,
                    "Fail to fetch more data with query id"
                );
                return Err(Error::FetchFailure {
                    query_id: self.query_id,
                    source: Box::new(e),
                });
            }
        }

        debug!(
            query_id = self.query_id,
            pages = self.pages,
            rows = self.dataset.len(),
            "Query drained"
        );
        Ok(self.dataset)
    }

    async fn next_page(&mut self, request: &DataRequest) -> Result<()> {
        let resp = match call_within(&mut *self.channel, request, self.timeout).await? {
            DataResponse::MoreData(resp) => resp,
            DataResponse::Timeseries(_) => return Err(Error::InvalidResponse),
        };
        if !resp.status.is_success() {
            return Err(Error::QueryFailure(resp.status));
        }

        let added = self.dataset.append_page(&resp.rows)?;
        self.has_more = resp.has_more;
        self.pages += 1;
        debug!(query_id = self.query_id, rows = added, has_more = self.has_more, "Fetched page");
        Ok(())
    }
}

/// Call the channel, closing it if no response arrives within `timeout`
async fn call_within(
    channel: &mut Box<dyn Channel<DataRequest, DataResponse>>,
    request: &DataRequest,
    timeout: Duration,
) -> Result<DataResponse> {
    let outcome = time::timeout(timeout, channel.call(request)).await;
    match outcome {
        Ok(result) => result,
        Err(_) => {
            channel.close().await;
            Err(Error::Timeout(format!(
                "no response from {} within {:?}",
                channel.endpoint(),
                timeout
            )))
        }
    }
}
