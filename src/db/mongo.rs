//! MongoDB client and collection wrapper

use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::{
    options::{FindOptions, IndexOptions, UpdateModifications},
    results::UpdateResult,
    Client, Collection, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::types::{IntercedeError, Result};

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Connect and verify the server answers a ping
    ///
    /// Timeouts apply to connection establishment only; individual operations
    /// run without a deadline of their own.
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        info!("Connecting to MongoDB at {}", uri);

        // Use serverSelectionTimeoutMS to avoid hanging on unreachable MongoDB
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri).await.map_err(|e| {
            IntercedeError::Unavailable(format!("Failed to connect to MongoDB: {}", e))
        })?;

        let mongo = Self {
            client,
            db_name: db_name.to_string(),
        };

        mongo.ping().await.map_err(|e| {
            IntercedeError::Unavailable(format!("MongoDB ping failed: {}", e))
        })?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(mongo)
    }

    /// Round-trip a ping command to the database
    pub async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    /// Get a typed collection, creating its indexes
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }

    /// Get the database name
    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

/// Typed MongoDB collection
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
{
    /// Create a new collection handle and apply indexes
    pub async fn new(client: &Client, db_name: &str, collection_name: &str) -> Result<Self> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let mongo_collection = MongoCollection { inner: collection };

        mongo_collection.apply_indexes().await?;

        Ok(mongo_collection)
    }

    /// Apply schema-defined indexes
    async fn apply_indexes(&self) -> Result<()> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        self.inner.create_indexes(indices).await?;
        debug!("Indexes ensured on '{}'", self.inner.name());

        Ok(())
    }
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    /// Insert a document carrying its own `_id`
    pub async fn insert_one(&self, item: &T) -> Result<()> {
        self.inner.insert_one(item).await?;
        Ok(())
    }

    /// Find one document by filter
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        Ok(self.inner.find_one(filter).await?)
    }

    /// Find every document matching the filter
    ///
    /// A document that fails to decode fails the whole read.
    pub async fn find_many(
        &self,
        filter: Document,
        options: Option<FindOptions>,
    ) -> Result<Vec<T>> {
        let cursor = self.inner.find(filter).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Replace the whole document matched by the filter; returns matched count
    pub async fn replace_one(&self, filter: Document, replacement: &T) -> Result<u64> {
        let result = self.inner.replace_one(filter, replacement).await?;
        Ok(result.matched_count)
    }

    /// Update one document with an operator document
    pub async fn update_one(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult> {
        Ok(self.inner.update_one(filter, update).await?)
    }

    /// Hard delete; returns deleted count
    pub async fn delete_one(&self, filter: Document) -> Result<u64> {
        let result = self.inner.delete_one(filter).await?;
        Ok(result.deleted_count)
    }

    /// Count documents matching the filter
    pub async fn count(&self, filter: Document) -> Result<u64> {
        Ok(self.inner.count_documents(filter).await?)
    }

    /// Run an aggregation pipeline, collecting raw result documents
    pub async fn aggregate(&self, pipeline: Vec<Document>) -> Result<Vec<Document>> {
        let cursor = self.inner.aggregate(pipeline).await?;
        Ok(cursor.try_collect().await?)
    }
}
