mod connector;
mod load_balancing;
mod node_registry;
mod routed_db_manager;
mod strategy_registry;

pub use connector::{Backoff, Connector};
pub use load_balancing::round_robin_strategy::RoundRobinStrategy;
pub use load_balancing::{BalanceContext, BalanceStrategy};
pub use node_registry::NodeInfo;
pub use routed_db_manager::RoutedDbManager;
