use crate::config::Role;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("an IO error occurred: {detail}")]
    IOError {
        #[from]
        detail: std::io::Error,
    },

    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error("failed to connect to node `{host}`: {source}")]
    NodeConstruction {
        host: String,
        #[source]
        source: Box<Error>,
    },

    #[error("balance strategy `{0}` is already registered")]
    DuplicateStrategy(String),

    #[error("no {0} nodes available for selection")]
    EmptyPool(Role),

    #[error("manager is closed")]
    ManagerClosed,
}
