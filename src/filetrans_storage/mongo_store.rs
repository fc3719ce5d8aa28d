// Copyright 2024 Vincent Chan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use log::{debug, info};
use mongodb::options::{ClientOptions, ReadPreference, SelectionCriteria};
use mongodb::{Client, Collection, Database};
use crate::{Error, Result, StorageConfig};
use crate::options::{FindOneOptions, FindOptions};
use crate::results::{DeleteResult, InsertManyResult, InsertOneResult, UpdateResult};
use crate::store::DocumentStore;

/// A [`DocumentStore`] backed by the official MongoDB driver.
///
/// The driver keeps its own connection pool, so a `MongoStore` is shared
/// rather than cloned per task.
#[derive(Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {

    /// Build a client for `config.uri` and select `config.database`.
    ///
    /// Connection establishment and server selection are bounded by
    /// `config.connect_timeout`; URI parsing (which may involve a DNS
    /// lookup for `mongodb+srv`) is bounded by the same timeout. The client
    /// connects lazily, nothing is sent until the first operation.
    pub async fn connect(config: &StorageConfig) -> Result<MongoStore> {
        let parse = ClientOptions::parse(config.uri.as_str());
        let mut options = match tokio::time::timeout(config.connect_timeout, parse).await {
            Ok(result) => result.map_err(Error::connectivity)?,
            Err(_) => return Err(Error::DeadlineExceeded),
        };

        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);
        if let Some(app_name) = &config.app_name {
            options.app_name = Some(app_name.clone());
        }

        let client = Client::with_options(options).map_err(Error::connectivity)?;
        let database = client.database(&config.database);
        info!("mongodb client created for database '{}'", config.database);

        Ok(MongoStore {
            database,
        })
    }

    #[inline]
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }

}

#[async_trait]
impl DocumentStore for MongoStore {

    async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .selection_criteria(SelectionCriteria::ReadPreference(ReadPreference::Primary))
            .await
            .map_err(Error::connectivity)?;
        Ok(())
    }

    async fn find(&self, collection: &str, filter: Document, options: FindOptions) -> Result<Vec<Document>> {
        let mut cursor = self.collection(collection)
            .find(filter)
            .with_options(mongodb::options::FindOptions::from(options))
            .await?;

        let mut result = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            result.push(doc);
        }

        // dropping an open cursor issues killCursors, an exhausted one is already closed
        drop(cursor);
        debug!("find on '{}' returned {} documents", collection, result.len());

        Ok(result)
    }

    async fn find_one(&self, collection: &str, filter: Document, options: FindOneOptions) -> Result<Option<Document>> {
        let doc = self.collection(collection)
            .find_one(filter)
            .with_options(mongodb::options::FindOneOptions::from(options))
            .await?;
        Ok(doc)
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> Result<InsertOneResult> {
        let result = self.collection(collection).insert_one(doc).await?;
        Ok(result.into())
    }

    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<InsertManyResult> {
        let result = self.collection(collection).insert_many(docs).await?;
        Ok(result.into())
    }

    async fn update_one(&self, collection: &str, filter: Document, update: Document, upsert: bool) -> Result<UpdateResult> {
        let result = self.collection(collection)
            .update_one(filter, update)
            .upsert(upsert)
            .await?;
        Ok(result.into())
    }

    async fn delete_many(&self, collection: &str, filter: Document) -> Result<DeleteResult> {
        let result = self.collection(collection).delete_many(filter).await?;
        Ok(result.into())
    }

}
