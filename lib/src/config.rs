use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

pub use crate::errors::*;

const DEFAULT_PORT: u16 = 3306;
const DEFAULT_CHARSET: &str = "utf8mb4";

/// The role a configured node plays in the replica set.
///
/// A node whose configured role string is exactly `"master"` joins the
/// master pool; every other value is treated as a replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Master,
    Replica,
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        if role == "master" {
            Role::Master
        } else {
            Role::Replica
        }
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(role: &str) -> Result<Self, Self::Err> {
        Ok(Role::from(role))
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Role::Master => write!(f, "master"),
            Role::Replica => write!(f, "replica"),
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let role = String::deserialize(deserializer)?;
        Ok(Role::from(role.as_str()))
    }
}

/// A single configured database endpoint.
///
/// Instances usually come from an external configuration loader; the
/// `Deserialize` impl accepts the same field names as the struct. This crate
/// does not validate the fields, malformed values surface as connector
/// failures during [`crate::RoutedDbManager::connect`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub database: String,
    #[serde(default = "default_charset")]
    pub charset: String,
    pub role: Role,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_charset() -> String {
    DEFAULT_CHARSET.to_owned()
}

impl NodeConfig {
    /// Creates a node config for `host` with default port and charset and
    /// empty credentials. Combine with struct update syntax to fill in the
    /// rest.
    pub fn new(host: impl Into<String>, role: Role) -> Self {
        NodeConfig {
            host: host.into(),
            port: DEFAULT_PORT,
            user: String::new(),
            password: String::new(),
            database: String::new(),
            charset: DEFAULT_CHARSET.to_owned(),
            role,
        }
    }

    /// Formats the connection string handed to the connector.
    ///
    /// The field order and separators are fixed, drivers consuming this
    /// shape depend on them.
    pub fn dsn(&self) -> String {
        format!(
            "{}:{}@{}:{}/{}?charset={}&parseTime=true&locale=local",
            self.user, self.password, self.host, self.port, self.database, self.charset
        )
    }
}

/// The set of nodes used to construct a [`crate::RoutedDbManager`],
/// see [`ConfigBuilder`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub(crate) nodes: Vec<NodeConfig>,
}

/// A builder collecting node configurations into a [`Config`].
///
/// Node order is preserved and significant: it defines the index every
/// selection strategy sees for the resulting pools.
#[derive(Default)]
pub struct ConfigBuilder {
    nodes: Vec<NodeConfig>,
}

/// Creates a new [`ConfigBuilder`].
pub fn config() -> ConfigBuilder {
    ConfigBuilder::default()
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single node.
    pub fn node(mut self, node: NodeConfig) -> Self {
        self.nodes.push(node);
        self
    }

    /// Appends every node from `nodes`, preserving their order.
    pub fn nodes(mut self, nodes: impl IntoIterator<Item = NodeConfig>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    /// An empty node list is legal; the resulting pools are empty and any
    /// selection against them fails with [`Error::EmptyPool`].
    pub fn build(self) -> Config {
        Config { nodes: self.nodes }
    }
}
