//! Neo4j connection client.

use anyhow::{Context, Result};
use graphsnap_core::SnapshotError;
use neo4rs::{ConfigBuilder, Graph, Query};
use tokio::sync::OnceCell;
use tracing::info;

pub const DEFAULT_DATABASE: &str = "neo4j";

const DEFAULT_MAX_CONNECTIONS: usize = 4;
const DEFAULT_FETCH_SIZE: usize = 500;

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
    pub fetch_size: usize,
}

impl GraphConfig {
    /// Build a config from optional parts. URI, user and password are
    /// required; blank values count as missing.
    pub fn from_parts(
        uri: Option<String>,
        user: Option<String>,
        password: Option<String>,
        database: Option<String>,
    ) -> Result<Self, SnapshotError> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        match (present(uri), present(user), present(password)) {
            (Some(uri), Some(user), Some(password)) => Ok(Self {
                uri,
                user,
                password,
                database: present(database).unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
                max_connections: DEFAULT_MAX_CONNECTIONS,
                fetch_size: DEFAULT_FETCH_SIZE,
            }),
            _ => Err(SnapshotError::config(
                "Missing NEO4J_URI/NEO4J_USER/NEO4J_PASSWORD env vars",
            )),
        }
    }
}

/// Client for Neo4j read queries.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// `Graph::connect` only builds the pool; the `RETURN 1` ping forces a
    /// real bolt handshake so bad credentials surface here.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        graph.run(Query::new("RETURN 1".to_string())).await
            .context("Neo4j is not responding to queries")?;

        info!(uri = %config.uri, database = %config.database, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Execute a Cypher query and return results as rows.
    ///
    /// The row stream holds a pooled connection; it goes back to the pool
    /// when the stream is dropped, on the error path as well.
    pub async fn query(&self, query: Query) -> Result<Vec<neo4rs::Row>> {
        let mut result = self.graph.execute(query).await
            .context("Neo4j query failed")?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await.context("Failed to read Neo4j result row")? {
            rows.push(row);
        }
        Ok(rows)
    }
}

/// A [`GraphClient`] that connects on first use and is then shared for the
/// life of the process. A failed connect is not remembered.
pub struct LazyGraphClient {
    config: GraphConfig,
    client: OnceCell<GraphClient>,
}

impl LazyGraphClient {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Result<&GraphClient> {
        self.client
            .get_or_try_init(|| GraphClient::connect(&self.config))
            .await
    }
}
