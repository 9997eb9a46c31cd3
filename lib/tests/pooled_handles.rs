//! The routing layer treats connection handles as opaque values; this works
//! unchanged when the "handle" is itself a connection pool of a driver that
//! pools internally.

use deadpool::managed::{Manager, Metrics, Pool, RecycleResult};
use futures::future::BoxFuture;
use replica_router::{config, Connector, Error, NodeConfig, Result, Role, RoutedDbManager};

#[derive(Debug)]
struct Session {
    dsn: String,
}

struct SessionManager {
    dsn: String,
}

impl Manager for SessionManager {
    type Type = Session;
    type Error = Error;

    async fn create(&self) -> Result<Session> {
        Ok(Session {
            dsn: self.dsn.clone(),
        })
    }

    async fn recycle(&self, _: &mut Session, _: &Metrics) -> RecycleResult<Error> {
        Ok(())
    }
}

type SessionPool = Pool<SessionManager>;

fn pool_connector() -> impl Connector<SessionPool> {
    |dsn: &str| -> BoxFuture<'static, Result<SessionPool>> {
        let dsn = dsn.to_owned();
        Box::pin(async move {
            SessionPool::builder(SessionManager { dsn })
                .max_size(4)
                .build()
                .map_err(|e| Error::ConnectionError(e.to_string()))
        })
    }
}

#[tokio::test]
async fn pooled_driver_handles_route_like_any_other() {
    let config = config()
        .node(NodeConfig::new("db-master", Role::Master))
        .node(NodeConfig::new("db-replica", Role::Replica))
        .build();
    let manager = RoutedDbManager::connect(config, pool_connector())
        .await
        .unwrap();

    let pool = manager.replica().unwrap();
    let session = pool.get().await.unwrap();
    assert!(session.dsn.contains("db-replica"));

    let master_pool = manager.master().unwrap();
    let session = master_pool.get().await.unwrap();
    assert!(session.dsn.contains("db-master"));
    assert_eq!(master_pool.status().max_size, 4);

    manager.close().unwrap();
}
