//! Database client for the Shelfie document store.
//!
//! Only the client factory exists today; queries are not implemented and
//! [`Db::get_books`] returns no rows.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shelfie_kernel::settings::DatabaseParams;
use thiserror::Error;

/// A book document as stored in the `books` container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publish_year: String,
    pub publisher: String,
    pub image_url_s: String,
    pub image_url_m: String,
    pub image_url_l: String,
    pub id: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DbError {
    #[error("database endpoint '{0}' must be an http(s) URL")]
    InvalidEndpoint(String),

    #[error("database key is missing")]
    MissingKey,
}

/// Public interface for the database client.
#[async_trait]
pub trait Db: Send + Sync {
    async fn get_books(&self) -> anyhow::Result<Vec<Book>>;
}

/// Client for an Azure Cosmos DB account.
#[derive(Debug, Clone)]
pub struct CosmosClient {
    endpoint: String,
}

impl CosmosClient {
    pub fn new(params: &DatabaseParams) -> Result<Self, DbError> {
        tracing::info!(target: "shelfie-db", endpoint = %params.endpoint, "creating new database client");

        let endpoint = params.endpoint.trim();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(DbError::InvalidEndpoint(params.endpoint.clone()));
        }
        if params.key.trim().is_empty() {
            return Err(DbError::MissingKey);
        }

        Ok(Self {
            endpoint: endpoint.to_string(),
        })
    }

    /// Account endpoint with surrounding whitespace removed.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Db for CosmosClient {
    async fn get_books(&self) -> anyhow::Result<Vec<Book>> {
        tracing::info!(target: "shelfie-db", "getting books");

        // TODO: issue `SELECT * FROM c` against the books container once the
        // Cosmos SDK client is wired in.
        Ok(Vec::new())
    }
}
