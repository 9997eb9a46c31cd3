use std::sync::{Arc, RwLock, RwLockWriteGuard};

use log::debug;

use crate::config::{Config, Role};
use crate::errors::{Error, Result};
use crate::routing::connector::Connector;
use crate::routing::load_balancing::BalanceStrategy;
use crate::routing::node_registry::{build_pools, Pool};
use crate::routing::strategy_registry::StrategyRegistry;

/// The routing façade over one replicated database.
///
/// Holds the master and replica pools, the registered balance strategies
/// and both selection cursors behind a single lock. Every operation takes
/// the exclusive guard because selection updates a cursor, so master and
/// replica selections serialize against each other and against strategy
/// registration; two concurrent selections never observe the same cursor
/// value.
///
/// Each manager owns its state exclusively, any number of managers can
/// coexist in one process.
pub struct RoutedDbManager<T> {
    state: RwLock<ManagerState<T>>,
}

struct ManagerState<T> {
    masters: Pool<T>,
    replicas: Pool<T>,
    strategies: StrategyRegistry,
    closed: bool,
}

impl<T: Clone> RoutedDbManager<T> {
    /// Connects every configured node through `connector` and partitions
    /// the handles into the master and replica pools.
    ///
    /// Construction is fail-fast: the first connector failure aborts with
    /// [`Error::NodeConstruction`] and no manager is returned.
    pub async fn connect<C>(config: Config, connector: C) -> Result<Self>
    where
        C: Connector<T>,
    {
        let (masters, replicas) = build_pools(&config.nodes, &connector).await?;
        Ok(RoutedDbManager {
            state: RwLock::new(ManagerState {
                masters,
                replicas,
                strategies: StrategyRegistry::new(),
                closed: false,
            }),
        })
    }

    /// Returns a handle to a master node, chosen by the registered
    /// strategies or the round-robin default.
    ///
    /// Fails with [`Error::EmptyPool`] when no masters are configured and
    /// with [`Error::ManagerClosed`] after [`RoutedDbManager::close`].
    pub fn master(&self) -> Result<T> {
        self.select(Role::Master)
    }

    /// Returns a handle to a replica node, chosen by the registered
    /// strategies or the round-robin default.
    ///
    /// Fails with [`Error::EmptyPool`] when no replicas are configured and
    /// with [`Error::ManagerClosed`] after [`RoutedDbManager::close`].
    pub fn replica(&self) -> Result<T> {
        self.select(Role::Replica)
    }

    fn select(&self, role: Role) -> Result<T> {
        let mut state = self.write();
        if state.closed {
            return Err(Error::ManagerClosed);
        }
        let ManagerState {
            masters,
            replicas,
            strategies,
            ..
        } = &mut *state;
        let pool = match role {
            Role::Master => masters,
            Role::Replica => replicas,
        };
        pool.select(strategies)
    }

    /// Registers a balance strategy under a unique name.
    ///
    /// Strategies are tried in registration order on every selection, so a
    /// strategy that should take precedence must be registered first. Fails
    /// with [`Error::DuplicateStrategy`] when the name is taken; the
    /// existing strategy stays active.
    pub fn register_strategy(
        &self,
        name: impl Into<String>,
        strategy: impl BalanceStrategy + 'static,
    ) -> Result<()> {
        let mut state = self.write();
        if state.closed {
            return Err(Error::ManagerClosed);
        }
        state.strategies.register(name, Arc::new(strategy))
    }

    /// Removes a registered strategy; removing an unknown name is a no-op.
    pub fn remove_strategy(&self, name: &str) {
        let mut state = self.write();
        if state.closed {
            return;
        }
        state.strategies.remove(name);
    }

    /// Releases every owned connection handle and marks the manager closed.
    ///
    /// The transition is one-way: every later selection or registration
    /// fails with [`Error::ManagerClosed`]. Closing an already closed
    /// manager is a no-op.
    pub fn close(&self) -> Result<()> {
        let mut state = self.write();
        if state.closed {
            return Ok(());
        }
        debug!(
            "closing manager, releasing {} master and {} replica handles",
            state.masters.len(),
            state.replicas.len()
        );
        state.masters.clear();
        state.replicas.clear();
        state.closed = true;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.state.read().unwrap().closed
    }

    /// Number of master nodes the manager was constructed with.
    pub fn master_count(&self) -> usize {
        self.state.read().unwrap().masters.len()
    }

    /// Number of replica nodes the manager was constructed with.
    pub fn replica_count(&self) -> usize {
        self.state.read().unwrap().replicas.len()
    }

    fn write(&self) -> RwLockWriteGuard<'_, ManagerState<T>> {
        self.state.write().unwrap()
    }
}

const _: () = {
    const fn assert_send_sync<T: ?Sized + Send + Sync>() {}
    assert_send_sync::<RoutedDbManager<()>>();
};
