//! Factory for data node and config node clients

use crate::config::ClientConfig;
use crate::config_node::{ConfigNodeClient, MembershipRefresher};
use crate::connection::TcpConnector;
use crate::data_node::DataNodeClient;
use crate::transport::Connector;
use crate::Result;
use ainode_protocol::{ConfigRequest, ConfigResponse, DataRequest, DataResponse};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Builds clients from one resolved [`ClientConfig`]
///
/// Construction is pure: nothing connects until a client is asked for, and
/// no client is cached.
pub struct ClientManager<C = TcpConnector> {
    config: ClientConfig,
    connector: C,
    refresher: Option<Arc<dyn MembershipRefresher>>,
}

impl ClientManager<TcpConnector> {
    /// Manager over TCP with the configured timeouts and wire format
    pub fn new(config: ClientConfig) -> Result<Self> {
        let connector = TcpConnector::from_config(&config);
        Self::with_connector(config, connector)
    }
}

impl<C> ClientManager<C>
where
    C: Connector<DataRequest, DataResponse> + Connector<ConfigRequest, ConfigResponse> + Clone,
{
    pub fn with_connector(config: ClientConfig, connector: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            connector,
            refresher: None,
        })
    }

    /// Membership source handed to every config node client
    pub fn with_refresher(mut self, refresher: Arc<dyn MembershipRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Connect to the configured data node
    pub async fn data_node_client(&self) -> Result<DataNodeClient> {
        let client = DataNodeClient::connect(&self.config.data_node, &self.connector).await?;
        Ok(client.with_fetch_defaults(
            self.config.fetch_size,
            Duration::from_millis(self.config.fetch_timeout_ms),
        ))
    }

    /// Client whose presumed leader is the first configured config node
    pub fn config_node_client(&self) -> Result<ConfigNodeClient<C>> {
        debug!(members = ?self.config.config_nodes, "Building config node client");
        let client = ConfigNodeClient::new(self.config.config_nodes.clone(), self.connector.clone())?
            .with_retry_policy(self.config.retry_policy());
        Ok(match &self.refresher {
            Some(refresher) => client.with_refresher(Arc::clone(refresher)),
            None => client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_node::{Leader, StaticSeedRefresher};
    use crate::mock::MockConnector;
    use crate::transport::Channel;
    use crate::Error;
    use ainode_protocol::{
        Endpoint, FetchMoreDataResp, FetchTimeseriesResp, NodeLocation, RawRow, Status, TypeTag,
    };
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::HashMap;

    /// One script per request family
    #[derive(Clone, Default)]
    struct SplitMock {
        data: MockConnector<DataRequest, DataResponse>,
        config: MockConnector<ConfigRequest, ConfigResponse>,
    }

    #[async_trait]
    impl Connector<DataRequest, DataResponse> for SplitMock {
        async fn connect(
            &self,
            endpoint: &Endpoint,
        ) -> Result<Box<dyn Channel<DataRequest, DataResponse>>> {
            self.data.connect(endpoint).await
        }
    }

    #[async_trait]
    impl Connector<ConfigRequest, ConfigResponse> for SplitMock {
        async fn connect(
            &self,
            endpoint: &Endpoint,
        ) -> Result<Box<dyn Channel<ConfigRequest, ConfigResponse>>> {
            self.config.connect(endpoint).await
        }
    }

    fn config() -> ClientConfig {
        ClientConfig::builder()
            .data_node(Endpoint::new("dn-1", 10730))
            .config_nodes(vec![Endpoint::new("cn-1", 10710), Endpoint::new("cn-2", 10710)])
            .fetch_size(7)
            .retry_max_attempts(2)
            .build()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ClientConfig {
            config_nodes: vec![],
            ..ClientConfig::default()
        };
        assert!(matches!(
            ClientManager::with_connector(config.clone(), SplitMock::default()),
            Err(Error::Config(_))
        ));
        assert!(ClientManager::new(config).is_err());
    }

    #[test]
    fn test_config_node_client_starts_at_first_member() {
        let manager = ClientManager::with_connector(config(), SplitMock::default()).unwrap();
        let client = manager.config_node_client().unwrap();
        assert_eq!(client.leader(), &Leader::Known(Endpoint::new("cn-1", 10710)));
        assert_eq!(client.config_nodes(), manager.config().config_nodes.as_slice());
        assert_eq!(client.cursor(), 0);
        assert!(client.connected_to().is_none());
    }

    #[tokio::test]
    async fn test_config_node_client_uses_configured_retry_budget() {
        let mock = SplitMock::default();
        mock.config.set_unreachable(&Endpoint::new("cn-1", 10710), true);
        mock.config.set_unreachable(&Endpoint::new("cn-2", 10710), true);

        let manager = ClientManager::with_connector(config(), mock.clone())
            .unwrap()
            .with_refresher(Arc::new(StaticSeedRefresher::new(vec![])));
        let mut client = manager.config_node_client().unwrap();
        let err = client
            .remove_node(NodeLocation::new(1, Endpoint::new("ainode-1", 10810)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ClusterUnreachable(_)));
        // leader, then two passes over two members per attempt, two attempts
        assert_eq!(mock.config.connect_attempts().len(), 1 + 2 * 2 * 2);
    }

    #[tokio::test]
    async fn test_data_node_client_uses_configured_fetch_size() {
        let mock = SplitMock::default();
        let dn = Endpoint::new("dn-1", 10730);
        mock.data.push_response(
            &dn,
            DataResponse::Timeseries(FetchTimeseriesResp {
                status: Status::success(),
                query_id: 1,
                column_names: vec!["s1".into()],
                column_types: vec![TypeTag::Int32],
                column_index: HashMap::from([("s1".to_string(), 0)]),
                rows: vec![RawRow::new(1, vec![Some(Bytes::copy_from_slice(&5i32.to_be_bytes()))])],
                has_more: true,
            }),
        );
        mock.data.push_response(
            &dn,
            DataResponse::MoreData(FetchMoreDataResp {
                status: Status::success(),
                rows: vec![],
                has_more: false,
            }),
        );

        let manager = ClientManager::with_connector(config(), mock.clone()).unwrap();
        let mut client = manager.data_node_client().await.unwrap();
        assert_eq!(client.endpoint(), &dn);
        let dataset = client.fetch_timeseries("SELECT s1 FROM root.sg.d1").await.unwrap();
        assert_eq!(dataset.len(), 1);

        let calls = mock.data.calls();
        assert!(matches!(
            calls[0].1,
            DataRequest::FetchTimeseries { fetch_size: 7, .. }
        ));
        assert_eq!(
            calls[1].1,
            DataRequest::FetchMoreData {
                query_id: 1,
                fetch_size: 7
            }
        );
    }

    #[tokio::test]
    async fn test_data_node_unreachable() {
        let mock = SplitMock::default();
        mock.data.set_unreachable(&Endpoint::new("dn-1", 10730), true);
        let manager = ClientManager::with_connector(config(), mock).unwrap();
        assert!(matches!(
            manager.data_node_client().await,
            Err(Error::ConnectFailure { .. })
        ));
    }
}
