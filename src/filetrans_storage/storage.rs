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

use std::sync::Arc;
use bson::{doc, Document};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use crate::{CallContext, Error, MongoStore, QueryOptions, Result, StorageConfig};
use crate::errors::InvalidArgumentStruct;
use crate::results::{DeleteResult, InsertManyResult, InsertOneResult, UpdateResult};
use crate::store::DocumentStore;

/// Collection-scoped CRUD operations over a [`DocumentStore`].
///
/// `Storage` holds no mutable state of its own, cloning it is cheap and
/// every clone shares the same client. Each operation is a single
/// round trip that runs under the given [`CallContext`]; errors from the
/// store are returned as they are, without retry.
///
/// ```no_run
/// use bson::{doc, Document};
/// use filetrans_storage::{CallContext, QueryOptions, Storage, StorageConfig};
///
/// # async fn example() -> filetrans_storage::Result<()> {
/// let config = StorageConfig::builder()
///     .uri("mongodb://localhost:27017")
///     .database("files")
///     .build();
/// let storage = Storage::connect(&config).await?;
/// let cx = CallContext::background();
///
/// storage.insert_one(&cx, "jobs", &doc! { "name": "resize", "state": "queued" }).await?;
///
/// let opts = QueryOptions::builder().sort(doc! { "name": 1 }).limit(10).build();
/// let jobs: Vec<Document> = storage.find_many(&cx, "jobs", doc! { "state": "queued" }, &opts).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn DocumentStore>,
}

impl Storage {

    /// Connect to MongoDB as described by `config`.
    pub async fn connect(config: &StorageConfig) -> Result<Storage> {
        let store = MongoStore::connect(config).await?;
        Ok(Storage::with_store(Arc::new(store)))
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Storage {
        Storage {
            store,
        }
    }

    /// Ping the primary. Any failure is reported as [`Error::Connectivity`].
    pub async fn health_check(&self, cx: &CallContext) -> Result<()> {
        cx.run(self.store.ping()).await
    }

    /// Return the first document matching `filter`.
    ///
    /// `sort` and `skip` of `options` are applied, `limit` is not.
    /// Fails with [`Error::NotFound`] when nothing matches and with
    /// [`Error::Decode`] when the document cannot be read as `T`.
    pub async fn find_one<T>(
        &self,
        cx: &CallContext,
        collection: &str,
        filter: Document,
        options: &QueryOptions,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!("find one in '{}', filter: {:?}", collection, filter);
        let found = cx.run(self.store.find_one(collection, filter, options.find_one_options())).await?;
        let doc = found.ok_or_else(|| Error::NotFound(collection.to_string()))?;
        Ok(bson::from_document::<T>(doc)?)
    }

    /// Return every document matching `filter`, with `sort`, `skip` and `limit` applied.
    pub async fn find_many<T>(
        &self,
        cx: &CallContext,
        collection: &str,
        filter: Document,
        options: &QueryOptions,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        debug!("find many in '{}', filter: {:?}, options: {:?}", collection, filter, options);
        let docs = cx.run(self.store.find(collection, filter, options.find_options())).await?;
        docs.into_iter()
            .map(|doc| bson::from_document::<T>(doc).map_err(Error::from))
            .collect()
    }

    pub async fn insert_one<T>(&self, cx: &CallContext, collection: &str, doc: &T) -> Result<InsertOneResult>
    where
        T: Serialize,
    {
        let doc = bson::to_document(doc)?;
        debug!("insert one into '{}'", collection);
        cx.run(self.store.insert_one(collection, doc)).await
    }

    /// Insert `docs` in order. The ids of the result follow the input order.
    pub async fn insert_many<T>(
        &self,
        cx: &CallContext,
        collection: &str,
        docs: impl IntoIterator<Item = T>,
    ) -> Result<InsertManyResult>
    where
        T: Serialize,
    {
        let docs = docs.into_iter()
            .map(|doc| bson::to_document(&doc))
            .collect::<std::result::Result<Vec<Document>, _>>()?;
        debug!("insert {} documents into '{}'", docs.len(), collection);
        cx.run(self.store.insert_many(collection, docs)).await
    }

    /// Set the fields of `doc` on the document matching `filter`, or insert
    /// a new one built from `filter` and `doc` when there is none.
    ///
    /// Fields not present in `doc` are left untouched.
    pub async fn upsert<T>(
        &self,
        cx: &CallContext,
        collection: &str,
        filter: Document,
        doc: &T,
    ) -> Result<UpdateResult>
    where
        T: Serialize,
    {
        let update = doc! {
            "$set": bson::to_document(doc)?,
        };
        debug!("upsert into '{}', filter: {:?}", collection, filter);
        cx.run(self.store.update_one(collection, filter, update, true)).await
    }

    /// Delete every document matching `filter`.
    ///
    /// An empty filter is rejected with [`Error::InvalidArgument`] before
    /// the store is reached. Matching nothing is not an error.
    pub async fn delete(&self, cx: &CallContext, collection: &str, filter: Document) -> Result<DeleteResult> {
        if filter.is_empty() {
            return Err(InvalidArgumentStruct {
                op_name: "delete",
                reason: "filter cannot be empty".to_string(),
            }.into());
        }

        debug!("delete from '{}', filter: {:?}", collection, filter);
        let result = cx.run(self.store.delete_many(collection, filter)).await?;
        debug!("deleted {} documents from '{}'", result.deleted_count, collection);
        Ok(result)
    }

}
