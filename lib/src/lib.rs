//! Connection routing for replicated SQL databases.
//!
//! A [`RoutedDbManager`] sits in front of a fixed set of database nodes and
//! hands out an already constructed connection handle for every read or
//! write, choosing the node through pluggable, named balance strategies
//! with a built-in round-robin fallback.
//!
//! * the node set is partitioned into masters and replicas at construction
//!   and never changes afterwards
//! * connection handles are opaque: any cloneable type works, the router
//!   never inspects it
//! * handles are produced by a [`Connector`], which owns connection
//!   establishment, liveness checking and socket-level pooling
//!
//! # Examples
//!
//! ```
//! use futures::future::BoxFuture;
//! use replica_router::{config, NodeConfig, Result, Role, RoutedDbManager};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = config()
//!         .node(NodeConfig::new("db-master", Role::Master))
//!         .node(NodeConfig::new("db-replica-1", Role::Replica))
//!         .node(NodeConfig::new("db-replica-2", Role::Replica))
//!         .build();
//!
//!     // The connector stands in for a real driver; the handle it returns
//!     // is opaque to the router. Here it is just the connection string.
//!     let connector = |dsn: &str| -> BoxFuture<'static, Result<String>> {
//!         let dsn = dsn.to_owned();
//!         Box::pin(async move { Ok(dsn) })
//!     };
//!
//!     let manager = RoutedDbManager::connect(config, connector).await.unwrap();
//!
//!     // Reads rotate over the replicas, writes over the masters.
//!     assert!(manager.replica().unwrap().contains("db-replica-2"));
//!     assert!(manager.replica().unwrap().contains("db-replica-1"));
//!     assert!(manager.master().unwrap().contains("db-master"));
//!
//!     manager.close().unwrap();
//! }
//! ```
//!
//! ## Custom balance strategies
//!
//! Strategies are registered under a unique name and tried in registration
//! order on every selection; the first one to commit to an index wins, and
//! the round-robin default decides when all of them decline.
//!
//! ```
//! use futures::future::BoxFuture;
//! use replica_router::{config, BalanceContext, NodeConfig, Result, Role, RoutedDbManager};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = config()
//!         .nodes((0..3).map(|i| NodeConfig::new(format!("replica-{i}"), Role::Replica)))
//!         .build();
//!     let connector = |dsn: &str| -> BoxFuture<'static, Result<String>> {
//!         let dsn = dsn.to_owned();
//!         Box::pin(async move { Ok(dsn) })
//!     };
//!     let manager = RoutedDbManager::connect(config, connector).await.unwrap();
//!
//!     // Pin every read to the first replica.
//!     manager
//!         .register_strategy("pin-first", |ctx: &BalanceContext| {
//!             ctx.nodes().first().map(|_| 0)
//!         })
//!         .unwrap();
//!
//!     assert!(manager.replica().unwrap().contains("replica-0"));
//!     assert!(manager.replica().unwrap().contains("replica-0"));
//!
//!     // Dropping the strategy falls back to the built-in round robin.
//!     manager.remove_strategy("pin-first");
//!     assert!(manager.replica().unwrap().contains("replica-1"));
//! }
//! ```
//!
//! ## Connectors
//!
//! Real deployments wrap the driver of their choice in a [`Connector`] and
//! usually add [`Backoff`] so transient failures during startup are retried
//! before construction gives up; construction is fail-fast once the
//! connector reports a final error.

mod config;
mod errors;
mod routing;

pub use crate::config::{config, Config, ConfigBuilder, NodeConfig, Role};
pub use crate::errors::*;
pub use crate::routing::{
    Backoff, BalanceContext, BalanceStrategy, Connector, NodeInfo, RoundRobinStrategy,
    RoutedDbManager,
};
