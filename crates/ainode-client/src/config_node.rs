//! Leader-tracking client for the config node cluster
//!
//! Config nodes form a replicated group with a single leader that may move.
//! [`ConfigNodeClient`] keeps one connection to the node it presumes is the
//! leader and runs every operation through the same bounded retry loop:
//!
//! 1. Reuse the open connection if there is one.
//! 2. Otherwise resolve: try the presumed leader, then walk the known members
//!    round-robin starting just past the cursor, stopping at the first node
//!    that accepts a connection.
//! 3. Call. A dropped connection forgets the leader; a redirect status moves
//!    the presumed leader to the hinted node (or forgets it when there is no
//!    hint). Both consume one attempt. Any other status is final.
//!
//! When no node at all can be reached, the [`MembershipRefresher`] is asked
//! for a fresh member list and resolving is retried once within the attempt.

use crate::config::RetryPolicy;
use crate::transport::{Channel, Connector};
use crate::{Error, Result};
use ainode_protocol::{
    ConfigRequest, ConfigResponse, Endpoint, NodeConfiguration, NodeId, NodeLocation,
    NodeRegisterReq, NodeRestartReq, NodeVersionInfo, Status,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Message of the error returned when no config node answered definitively
pub const MSG_RECONNECTION_FAIL: &str =
    "Fail to connect to any config node. Please check status of ConfigNodes";

// ============================================================================
// Leader
// ============================================================================

/// Which config node the client believes is the leader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leader {
    Known(Endpoint),
    /// Pick the next member round-robin
    Unknown,
}

impl fmt::Display for Leader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leader::Known(endpoint) => write!(f, "{}", endpoint),
            Leader::Unknown => write!(f, "unknown"),
        }
    }
}

// ============================================================================
// Membership Refresh
// ============================================================================

/// Source of config node membership used when every known member is unreachable
#[async_trait]
pub trait MembershipRefresher: Send + Sync {
    /// Return a replacement member list, or `None` to keep the current one
    async fn refresh(&self, known: &[Endpoint]) -> Option<Vec<Endpoint>>;
}

/// Keeps the current membership
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRefresher;

#[async_trait]
impl MembershipRefresher for NoopRefresher {
    async fn refresh(&self, _known: &[Endpoint]) -> Option<Vec<Endpoint>> {
        None
    }
}

/// Falls back to a fixed seed list
#[derive(Debug, Clone)]
pub struct StaticSeedRefresher {
    seeds: Vec<Endpoint>,
}

impl StaticSeedRefresher {
    pub fn new(seeds: Vec<Endpoint>) -> Self {
        Self { seeds }
    }
}

#[async_trait]
impl MembershipRefresher for StaticSeedRefresher {
    async fn refresh(&self, known: &[Endpoint]) -> Option<Vec<Endpoint>> {
        if self.seeds.is_empty() || self.seeds.as_slice() == known {
            None
        } else {
            Some(self.seeds.clone())
        }
    }
}

// ============================================================================
// Config Node Client
// ============================================================================

/// Client for the config node cluster with leader tracking and failover
///
/// One operation runs at a time (`&mut self`). Share between tasks behind a
/// `tokio::sync::Mutex` if needed.
pub struct ConfigNodeClient<C> {
    connector: C,
    leader: Leader,
    config_nodes: Vec<Endpoint>,
    cursor: usize,
    channel: Option<Box<dyn Channel<ConfigRequest, ConfigResponse>>>,
    retry: RetryPolicy,
    refresher: Arc<dyn MembershipRefresher>,
}

impl<C> ConfigNodeClient<C>
where
    C: Connector<ConfigRequest, ConfigResponse>,
{
    /// Create a client for `config_nodes`; the first one is the initial
    /// presumed leader. No connection is opened until the first call.
    pub fn new(config_nodes: Vec<Endpoint>, connector: C) -> Result<Self> {
        let first = config_nodes
            .first()
            .cloned()
            .ok_or_else(|| Error::Config("at least one config node is required".into()))?;

        Ok(Self {
            connector,
            leader: Leader::Known(first),
            config_nodes,
            cursor: 0,
            channel: None,
            retry: RetryPolicy::default(),
            refresher: Arc::new(NoopRefresher),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_refresher(mut self, refresher: Arc<dyn MembershipRefresher>) -> Self {
        self.refresher = refresher;
        self
    }

    pub fn leader(&self) -> &Leader {
        &self.leader
    }

    /// Known config node members, as last reported by the cluster
    pub fn config_nodes(&self) -> &[Endpoint] {
        &self.config_nodes
    }

    /// Index into [`config_nodes`](Self::config_nodes) of the last
    /// round-robin pick
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Endpoint of the open connection, if any
    pub fn connected_to(&self) -> Option<&Endpoint> {
        self.channel
            .as_ref()
            .filter(|c| c.is_open())
            .map(|c| c.endpoint())
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Register this worker node; returns the assigned node ID
    pub async fn register_node(
        &mut self,
        cluster_name: &str,
        configuration: NodeConfiguration,
        version_info: NodeVersionInfo,
    ) -> Result<NodeId> {
        let request = ConfigRequest::RegisterNode(NodeRegisterReq {
            cluster_name: cluster_name.to_string(),
            configuration,
            version_info,
        });

        match self.execute(request).await? {
            ConfigResponse::Registered { node_id, .. } => {
                info!(node_id, cluster = %cluster_name, "Registered with config node");
                Ok(node_id)
            }
            _ => Err(Error::InvalidResponse),
        }
    }

    /// Announce that this worker node restarted
    pub async fn restart_node(
        &mut self,
        cluster_name: &str,
        configuration: NodeConfiguration,
        version_info: NodeVersionInfo,
    ) -> Result<Status> {
        let request = ConfigRequest::RestartNode(NodeRestartReq {
            cluster_name: cluster_name.to_string(),
            configuration,
            version_info,
        });

        match self.execute(request).await? {
            ConfigResponse::Restarted { status, .. } => Ok(status),
            _ => Err(Error::InvalidResponse),
        }
    }

    /// Remove a worker node from the cluster
    pub async fn remove_node(&mut self, location: NodeLocation) -> Result<Status> {
        let node_id = location.node_id;
        match self.execute(ConfigRequest::RemoveNode { location }).await? {
            ConfigResponse::Removed { status } => {
                info!(node_id, "Removed node");
                Ok(status)
            }
            _ => Err(Error::InvalidResponse),
        }
    }

    /// Fetch node configuration, keyed by node ID
    pub async fn get_node_configuration(
        &mut self,
        node_id: NodeId,
    ) -> Result<HashMap<NodeId, NodeConfiguration>> {
        match self
            .execute(ConfigRequest::GetNodeConfiguration { node_id })
            .await?
        {
            ConfigResponse::Configuration { configurations, .. } => Ok(configurations),
            _ => Err(Error::InvalidResponse),
        }
    }

    /// Release the connection. Safe to call more than once.
    pub async fn close(&mut self) {
        self.drop_channel().await;
    }

    // ========================================================================
    // Retry Loop
    // ========================================================================

    /// Run `request` until a definitive response or the retry budget is spent
    async fn execute(&mut self, request: ConfigRequest) -> Result<ConfigResponse> {
        let operation = request.operation();

        for attempt in 1..=self.retry.max_attempts {
            if attempt > 1 {
                sleep(self.retry.interval).await;
            }

            if let Err(e) = self.ensure_connected().await {
                warn!(operation, attempt, error = %e, "No config node reachable, refreshing membership");
                self.refresh_membership().await;
                if let Err(e) = self.ensure_connected().await {
                    warn!(operation, attempt, error = %e, "No config node reachable after membership refresh");
                    continue;
                }
            }

            let channel = match self.channel.as_mut() {
                Some(channel) => channel,
                None => continue,
            };
            let endpoint = channel.endpoint().clone();

            match channel.call(&request).await {
                Err(e) if e.is_transport() => {
                    warn!(
                        endpoint = %endpoint,
                        operation,
                        attempt,
                        error = %e,
                        "Failed to reach config node, trying next node"
                    );
                    self.leader = Leader::Unknown;
                    self.drop_channel().await;
                }
                Err(e) => {
                    warn!(endpoint = %endpoint, operation, error = %e, "Config node call failed");
                    return Err(e);
                }
                Ok(response) => {
                    let status = response.status();
                    if status.is_redirect() {
                        self.leader = match &status.redirect_node {
                            Some(leader) => Leader::Known(leader.clone()),
                            None => Leader::Unknown,
                        };
                        debug!(
                            endpoint = %endpoint,
                            operation,
                            attempt,
                            leader = %self.leader,
                            "Redirected by config node"
                        );
                        self.drop_channel().await;
                        continue;
                    }

                    if !status.is_success() {
                        warn!(endpoint = %endpoint, operation, status = %status, "Config node rejected request");
                        return Err(Error::OperationFailure {
                            operation,
                            status: status.clone(),
                        });
                    }

                    if let Some(members) = response.config_nodes() {
                        self.update_config_nodes(members);
                    }
                    return Ok(response);
                }
            }
        }

        warn!(
            operation,
            attempts = self.retry.max_attempts,
            leader = %self.leader,
            "Retry budget exhausted"
        );
        Err(Error::ClusterUnreachable(MSG_RECONNECTION_FAIL.to_string()))
    }

    async fn ensure_connected(&mut self) -> Result<()> {
        if self.channel.as_ref().is_some_and(|c| c.is_open()) {
            return Ok(());
        }
        self.resolve().await
    }

    /// Connect to the presumed leader, falling back to round-robin
    async fn resolve(&mut self) -> Result<()> {
        self.drop_channel().await;

        if let Leader::Known(leader) = &self.leader {
            let leader = leader.clone();
            match self.connector.connect(&leader).await {
                Ok(channel) => {
                    debug!(endpoint = %leader, "Connected to presumed leader");
                    self.channel = Some(channel);
                    return Ok(());
                }
                Err(e) => {
                    warn!(endpoint = %leader, error = %e, "The presumed leader may be down, trying next node");
                    self.leader = Leader::Unknown;
                }
            }
        }

        let members = self.config_nodes.len();
        for _ in 0..members {
            self.cursor = (self.cursor + 1) % members;
            let candidate = self.config_nodes[self.cursor].clone();
            match self.connector.connect(&candidate).await {
                Ok(channel) => {
                    info!(endpoint = %candidate, cursor = self.cursor, "Connected to config node");
                    self.channel = Some(channel);
                    return Ok(());
                }
                Err(e) => {
                    warn!(endpoint = %candidate, error = %e, "The config node may be down, trying next node");
                }
            }
        }

        Err(Error::ClusterUnreachable(MSG_RECONNECTION_FAIL.to_string()))
    }

    async fn refresh_membership(&mut self) {
        match self.refresher.refresh(&self.config_nodes).await {
            Some(members) if !members.is_empty() => {
                info!(members = ?members, "Config node membership refreshed");
                self.config_nodes = members;
                self.cursor %= self.config_nodes.len();
            }
            _ => debug!("Membership refresh returned no new members"),
        }
    }

    fn update_config_nodes(&mut self, members: &[Endpoint]) {
        if members.is_empty() {
            debug!("Ignoring empty config node list in response");
            return;
        }
        if members != self.config_nodes.as_slice() {
            debug!(members = ?members, "Config node membership updated");
            self.config_nodes = members.to_vec();
        }
        self.cursor %= self.config_nodes.len();
    }

    async fn drop_channel(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            channel.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockConnector;
    use ainode_protocol::{NodeResource, StatusCode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    type Mock = MockConnector<ConfigRequest, ConfigResponse>;

    fn cn(i: u16) -> Endpoint {
        Endpoint::new(format!("cn-{}", i), 10710)
    }

    fn registered(node_id: NodeId, members: Vec<Endpoint>) -> ConfigResponse {
        ConfigResponse::Registered {
            status: Status::success(),
            config_nodes: members,
            node_id,
        }
    }

    fn redirect(leader: Option<Endpoint>) -> ConfigResponse {
        ConfigResponse::Registered {
            status: Status::redirect(leader),
            config_nodes: vec![],
            node_id: -1,
        }
    }

    fn configuration() -> NodeConfiguration {
        NodeConfiguration::new(NodeLocation::unregistered(Endpoint::new("ainode-1", 10810)))
            .with_resource(4, 1 << 30)
    }

    fn version() -> NodeVersionInfo {
        NodeVersionInfo::new("1.3.0", "abc123")
    }

    fn client(members: Vec<Endpoint>, mock: &Mock) -> ConfigNodeClient<Mock> {
        ConfigNodeClient::new(members, mock.clone()).unwrap()
    }

    async fn register(client: &mut ConfigNodeClient<Mock>) -> Result<NodeId> {
        client.register_node("defaultCluster", configuration(), version()).await
    }

    struct CountingRefresher {
        calls: AtomicUsize,
        members: Option<Vec<Endpoint>>,
    }

    #[async_trait]
    impl MembershipRefresher for CountingRefresher {
        async fn refresh(&self, _known: &[Endpoint]) -> Option<Vec<Endpoint>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.members.clone()
        }
    }

    #[tokio::test]
    async fn test_redirect_chain_moves_leader() {
        let mock = Mock::new();
        mock.push_response(&cn(1), redirect(Some(cn(2))));
        mock.push_response(&cn(2), redirect(Some(cn(3))));
        mock.push_response(&cn(3), registered(7, vec![cn(1), cn(2), cn(3)]));

        let mut client = client(vec![cn(1), cn(2), cn(3)], &mock);
        assert_eq!(register(&mut client).await.unwrap(), 7);
        assert_eq!(client.leader(), &Leader::Known(cn(3)));
        assert_eq!(mock.connect_attempts(), vec![cn(1), cn(2), cn(3)]);

        // the open connection to the leader is reused
        mock.push_response(&cn(3), registered(8, vec![cn(1), cn(2), cn(3)]));
        assert_eq!(register(&mut client).await.unwrap(), 8);
        assert_eq!(mock.connect_attempts().len(), 3);

        // after a reconnect the leader is tried first
        client.close().await;
        mock.push_response(&cn(3), registered(9, vec![cn(1), cn(2), cn(3)]));
        assert_eq!(register(&mut client).await.unwrap(), 9);
        assert_eq!(mock.connect_attempts().last(), Some(&cn(3)));
    }

    #[tokio::test]
    async fn test_redirect_without_hint_goes_round_robin() {
        let mock = Mock::new();
        mock.push_response(&cn(1), redirect(None));
        mock.push_response(&cn(2), registered(3, vec![cn(1), cn(2)]));

        let mut client = client(vec![cn(1), cn(2)], &mock);
        assert_eq!(register(&mut client).await.unwrap(), 3);
        assert_eq!(client.leader(), &Leader::Unknown);
        assert_eq!(client.cursor(), 1);
        assert_eq!(mock.connect_attempts(), vec![cn(1), cn(2)]);
    }

    #[tokio::test]
    async fn test_endless_redirects_exhaust_budget() {
        let mock = Mock::new();
        for _ in 0..6 {
            mock.push_response(&cn(1), redirect(Some(cn(1))));
        }

        let mut client = client(vec![cn(1)], &mock);
        let err = register(&mut client).await.unwrap_err();
        assert!(matches!(err, Error::ClusterUnreachable(ref msg) if msg == MSG_RECONNECTION_FAIL));
        assert_eq!(mock.call_count(), 5);
        assert_eq!(mock.pending_replies(&cn(1)), 1);
    }

    #[tokio::test]
    async fn test_all_unreachable_exhausts_budget_and_refreshes() {
        let mock = Mock::new();
        for i in 1..=3 {
            mock.set_unreachable(&cn(i), true);
        }
        let refresher = Arc::new(CountingRefresher {
            calls: AtomicUsize::new(0),
            members: None,
        });

        let mut client = client(vec![cn(1), cn(2), cn(3)], &mock).with_refresher(refresher.clone());
        let err = client.remove_node(NodeLocation::new(4, cn(9))).await.unwrap_err();

        assert!(matches!(err, Error::ClusterUnreachable(_)));
        assert_eq!(mock.call_count(), 0);
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 5);
        // leader once, then two full round-robin passes per attempt
        assert_eq!(mock.connect_attempts().len(), 1 + 5 * 2 * 3);
        assert_eq!(client.leader(), &Leader::Unknown);
    }

    #[tokio::test]
    async fn test_round_robin_starts_past_cursor() {
        let mock = Mock::new();
        mock.set_unreachable(&cn(1), true);
        mock.set_unreachable(&cn(2), true);
        let members = vec![cn(1), cn(2), cn(3), cn(4)];
        mock.push_response(&cn(3), registered(1, members.clone()));

        let mut client = client(members.clone(), &mock);
        register(&mut client).await.unwrap();
        // leader cn-1, then cursor 1 (cn-2), then cursor 2 (cn-3)
        assert_eq!(mock.connect_attempts(), vec![cn(1), cn(2), cn(3)]);
        assert_eq!(client.cursor(), 2);

        // cn-3 drops mid-call: the next candidate is (2 + 1) % 4
        mock.push_drop(&cn(3));
        mock.push_response(&cn(4), registered(2, members));
        assert_eq!(register(&mut client).await.unwrap(), 2);
        assert_eq!(mock.connect_attempts(), vec![cn(1), cn(2), cn(3), cn(4)]);
        assert_eq!(client.cursor(), 3);
        assert_eq!(client.connected_to(), Some(&cn(4)));
    }

    #[tokio::test]
    async fn test_round_robin_wraps_to_first_member() {
        let mock = Mock::new();
        mock.set_unreachable(&cn(1), true);
        mock.set_unreachable(&cn(2), true);
        let members = vec![cn(1), cn(2), cn(3)];
        mock.push_response(&cn(3), registered(1, members.clone()));

        let mut client = client(members.clone(), &mock);
        register(&mut client).await.unwrap();
        assert_eq!(client.cursor(), 2);

        // cursor sits on the last member: the next candidate is index 0
        mock.set_unreachable(&cn(1), false);
        mock.push_drop(&cn(3));
        mock.push_response(&cn(1), registered(2, members));
        assert_eq!(register(&mut client).await.unwrap(), 2);
        assert_eq!(mock.connect_attempts(), vec![cn(1), cn(2), cn(3), cn(1)]);
        assert_eq!(client.cursor(), 0);
        assert_eq!(client.connected_to(), Some(&cn(1)));
    }

    #[tokio::test]
    async fn test_register_against_partially_down_cluster() {
        let mock = Mock::new();
        mock.set_unreachable(&cn(1), true);
        mock.set_unreachable(&cn(2), true);
        let reported = vec![cn(3), cn(4), cn(5)];
        mock.push_response(&cn(3), registered(7, reported.clone()));

        let mut client = client(vec![cn(1), cn(2), cn(3)], &mock);
        assert_eq!(register(&mut client).await.unwrap(), 7);
        assert_eq!(client.config_nodes(), reported.as_slice());
        // cursor stays a valid index into the new list
        assert!(client.cursor() < client.config_nodes().len());
    }

    #[tokio::test]
    async fn test_transport_drop_clears_leader_and_retries() {
        let mock = Mock::new();
        mock.push_drop(&cn(1));
        mock.push_response(&cn(2), registered(5, vec![cn(1), cn(2)]));

        let mut client = client(vec![cn(1), cn(2)], &mock);
        assert_eq!(register(&mut client).await.unwrap(), 5);
        assert_eq!(client.leader(), &Leader::Unknown);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_definitive_error_is_not_retried() {
        let mock = Mock::new();
        let status = Status::error(StatusCode::IncompatibleVersion, "version mismatch");
        mock.push_response(
            &cn(1),
            ConfigResponse::Registered {
                status: status.clone(),
                config_nodes: vec![cn(7)],
                node_id: -1,
            },
        );

        let mut client = client(vec![cn(1), cn(2)], &mock);
        match register(&mut client).await {
            Err(Error::OperationFailure { operation, status: got }) => {
                assert_eq!(operation, "register_node");
                assert_eq!(got, status);
            }
            other => panic!("expected OperationFailure, got {:?}", other),
        }
        assert_eq!(mock.call_count(), 1);
        // membership from a failed response is not trusted
        assert_eq!(client.config_nodes(), &[cn(1), cn(2)]);
    }

    #[tokio::test]
    async fn test_refresher_supplies_new_members() {
        let mock = Mock::new();
        mock.set_unreachable(&cn(1), true);
        mock.push_response(
            &cn(2),
            ConfigResponse::Removed {
                status: Status::success(),
            },
        );

        let mut client = client(vec![cn(1)], &mock)
            .with_refresher(Arc::new(StaticSeedRefresher::new(vec![cn(2)])));
        let status = client.remove_node(NodeLocation::new(4, cn(9))).await.unwrap();
        assert!(status.is_success());
        assert_eq!(client.config_nodes(), &[cn(2)]);
        assert_eq!(mock.connect_attempts(), vec![cn(1), cn(1), cn(2)]);
    }

    #[tokio::test]
    async fn test_restart_and_get_configuration() {
        let mock = Mock::new();
        mock.push_response(
            &cn(1),
            ConfigResponse::Restarted {
                status: Status::success(),
                config_nodes: vec![cn(1), cn(2)],
            },
        );
        let expected = HashMap::from([(3, configuration())]);
        mock.push_response(
            &cn(1),
            ConfigResponse::Configuration {
                status: Status::success(),
                configurations: expected.clone(),
            },
        );

        let mut client = client(vec![cn(1)], &mock);
        let status = client
            .restart_node("defaultCluster", configuration(), version())
            .await
            .unwrap();
        assert!(status.is_success());
        assert_eq!(client.config_nodes(), &[cn(1), cn(2)]);

        let configs = client.get_node_configuration(3).await.unwrap();
        assert_eq!(configs, expected);
        assert_eq!(configs[&3].resource, NodeResource { cpu_cores: 4, memory_bytes: 1 << 30 });

        let calls = mock.calls();
        assert_eq!(calls[1].1, ConfigRequest::GetNodeConfiguration { node_id: 3 });
    }

    #[tokio::test]
    async fn test_empty_membership_is_ignored() {
        let mock = Mock::new();
        mock.push_response(&cn(1), registered(1, vec![]));

        let mut client = client(vec![cn(1), cn(2)], &mock);
        register(&mut client).await.unwrap();
        assert_eq!(client.config_nodes(), &[cn(1), cn(2)]);
    }

    #[tokio::test]
    async fn test_mismatched_response_kind() {
        let mock = Mock::new();
        mock.push_response(
            &cn(1),
            ConfigResponse::Removed {
                status: Status::success(),
            },
        );

        let mut client = client(vec![cn(1)], &mock);
        assert!(matches!(
            register(&mut client).await,
            Err(Error::InvalidResponse)
        ));
    }

    #[tokio::test]
    async fn test_custom_retry_policy() {
        let mock = Mock::new();
        mock.set_unreachable(&cn(1), true);

        let mut client = client(vec![cn(1)], &mock).with_retry_policy(RetryPolicy {
            max_attempts: 2,
            interval: Duration::from_millis(5),
        });
        assert!(matches!(
            client.get_node_configuration(1).await,
            Err(Error::ClusterUnreachable(_))
        ));
        // leader + 2 round-robin per attempt
        assert_eq!(mock.connect_attempts().len(), 1 + 2 * 2);
    }

    #[test]
    fn test_new_requires_members() {
        assert!(matches!(
            ConfigNodeClient::new(vec![], Mock::new()),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_static_seed_refresher() {
        let refresher = StaticSeedRefresher::new(vec![cn(1)]);
        assert_eq!(refresher.refresh(&[cn(2)]).await, Some(vec![cn(1)]));
        assert_eq!(refresher.refresh(&[cn(1)]).await, None);
        assert_eq!(StaticSeedRefresher::new(vec![]).refresh(&[]).await, None);
        assert_eq!(NoopRefresher.refresh(&[cn(1)]).await, None);
    }
}
