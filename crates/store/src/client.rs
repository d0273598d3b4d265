//! SurrealDB connection management for the document store.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use tracing::{debug, info};
use tsvwatch_core::StoreResult;

use crate::error::from_surrealdb_error;

/// Configuration for the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Connection URL (e.g., "mem://", "ws://localhost:8000")
    pub url: String,
    /// Namespace to use
    pub namespace: String,
    /// Database to use
    pub database: String,
    /// Optional root credentials
    pub credentials: Option<Credentials>,
}

/// Root credentials for authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl StoreConfig {
    /// Create an in-memory configuration for testing.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: "mem://".to_string(),
            namespace: "tsvwatch".to_string(),
            database: "test".to_string(),
            credentials: None,
        }
    }

    /// Create a WebSocket configuration.
    #[must_use]
    pub fn websocket(host: &str, port: u16) -> Self {
        Self {
            url: format!("ws://{host}:{port}"),
            namespace: "tsvwatch".to_string(),
            database: "documents".to_string(),
            credentials: None,
        }
    }

    /// Connect to an explicit endpoint URL.
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::websocket("localhost", 8000)
        }
    }

    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Document store backed by SurrealDB.
///
/// Cloning shares the underlying connection.
#[derive(Debug, Clone)]
pub struct SurrealDocumentStore {
    db: Arc<Surreal<Any>>,
    config: StoreConfig,
}

impl SurrealDocumentStore {
    /// Connect, authenticate if configured, select namespace and database,
    /// and make sure the `documents` table exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection, authentication or schema setup
    /// fails.
    pub async fn connect(config: StoreConfig) -> StoreResult<Self> {
        let db = Surreal::<Any>::init();

        debug!(url = %config.url, "Connecting to SurrealDB");
        db.connect(&config.url)
            .await
            .map_err(from_surrealdb_error)?;

        if let Some(creds) = &config.credentials {
            db.signin(Root {
                username: &creds.username,
                password: &creds.password,
            })
            .await
            .map_err(from_surrealdb_error)?;
        }

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(from_surrealdb_error)?;

        let store = Self {
            db: Arc::new(db),
            config,
        };
        store.initialize_schema().await?;

        info!(
            url = %store.config.url,
            namespace = %store.config.namespace,
            database = %store.config.database,
            "Document store ready"
        );
        Ok(store)
    }

    /// Get a reference to the underlying database client.
    #[must_use]
    pub fn db(&self) -> &Surreal<Any> {
        &self.db
    }

    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Define the `documents` table and its unique filename index.
    ///
    /// # Errors
    ///
    /// Returns an error if schema initialization fails.
    pub async fn initialize_schema(&self) -> StoreResult<()> {
        let schema = include_str!("schema.surql");

        self.db
            .query(schema)
            .await
            .map_err(from_surrealdb_error)?
            .check()
            .map_err(|e| tsvwatch_core::StoreError::schema(e.to_string()))?;

        Ok(())
    }

    /// Check if the database is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the health check fails.
    pub async fn health_check(&self) -> StoreResult<()> {
        self.db
            .query("INFO FOR DB")
            .await
            .map_err(from_surrealdb_error)?;

        Ok(())
    }
}
