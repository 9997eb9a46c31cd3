use log::{debug, info};

use crate::config::{NodeConfig, Role};
use crate::errors::{Error, Result};
use crate::routing::connector::Connector;
use crate::routing::load_balancing::BalanceContext;
use crate::routing::strategy_registry::StrategyRegistry;

/// Identity metadata for one physical database endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeInfo {
    pub host: String,
}

impl From<&NodeConfig> for NodeInfo {
    fn from(config: &NodeConfig) -> Self {
        NodeInfo {
            host: config.host.clone(),
        }
    }
}

/// One opaque connection handle together with its identity. The handle is
/// never inspected, only stored and cloned out.
#[derive(Debug)]
struct Node<T> {
    info: NodeInfo,
    handle: T,
}

/// The ordered nodes of one role plus that pool's selection cursor.
///
/// Node order is the configuration order and defines the index meaning for
/// every strategy. The node set is fixed for the lifetime of the manager.
#[derive(Debug)]
pub(crate) struct Pool<T> {
    role: Role,
    nodes: Vec<Node<T>>,
    cursor: usize,
}

impl<T> Pool<T> {
    fn new(role: Role) -> Self {
        Pool {
            role,
            nodes: Vec::new(),
            cursor: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Drops every node, releasing the owned handles.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.cursor = 0;
    }
}

impl<T: Clone> Pool<T> {
    /// Chooses a node for the current request and returns its handle.
    ///
    /// The cursor read, the strategy decision and the cursor update happen
    /// in one call; the caller serializes concurrent selections.
    pub(crate) fn select(&mut self, strategies: &StrategyRegistry) -> Result<T> {
        if self.nodes.is_empty() {
            return Err(Error::EmptyPool(self.role));
        }
        let ctx = BalanceContext::new(
            self.nodes.iter().map(|node| node.info.clone()).collect(),
            self.cursor,
        );
        let index = strategies.choose(&ctx).ok_or(Error::EmptyPool(self.role))?;
        debug!("selected {} node {} at index {index}", self.role, self.nodes[index].info.host);
        self.cursor = index;
        Ok(self.nodes[index].handle.clone())
    }
}

/// Connects every configured node and partitions the results by role.
///
/// A connector failure for any node aborts the whole construction; the
/// manager never starts with a node it could not connect to.
pub(crate) async fn build_pools<T, C>(
    configs: &[NodeConfig],
    connector: &C,
) -> Result<(Pool<T>, Pool<T>)>
where
    C: Connector<T> + ?Sized,
{
    let mut masters = Pool::new(Role::Master);
    let mut replicas = Pool::new(Role::Replica);

    for config in configs {
        debug!("connecting to {} node {}", config.role, config.host);
        let handle =
            connector
                .connect(&config.dsn())
                .await
                .map_err(|source| Error::NodeConstruction {
                    host: config.host.clone(),
                    source: Box::new(source),
                })?;
        let node = Node {
            info: NodeInfo::from(config),
            handle,
        };
        match config.role {
            Role::Master => masters.nodes.push(node),
            Role::Replica => replicas.nodes.push(node),
        }
    }

    info!(
        "connected {} master and {} replica nodes",
        masters.len(),
        replicas.len()
    );
    Ok((masters, replicas))
}
