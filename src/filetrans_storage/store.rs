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
use bson::Document;
use crate::Result;
use crate::options::{FindOneOptions, FindOptions};
use crate::results::{DeleteResult, InsertManyResult, InsertOneResult, UpdateResult};

/// The operations [`Storage`](crate::Storage) needs from a database client.
///
/// Implementations own their connection management and must be safe to
/// share between tasks. [`MongoStore`](crate::MongoStore) is the production
/// implementation.
#[async_trait]
pub trait DocumentStore: Send + Sync {

    async fn ping(&self) -> Result<()>;

    /// Run a query and return every matching document.
    ///
    /// Any server-side cursor must be released before this returns.
    async fn find(&self, collection: &str, filter: Document, options: FindOptions) -> Result<Vec<Document>>;

    async fn find_one(&self, collection: &str, filter: Document, options: FindOneOptions) -> Result<Option<Document>>;

    async fn insert_one(&self, collection: &str, doc: Document) -> Result<InsertOneResult>;

    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<InsertManyResult>;

    /// Apply `update` to the first document matching `filter`.
    /// With `upsert`, insert a new document when nothing matches.
    async fn update_one(&self, collection: &str, filter: Document, update: Document, upsert: bool) -> Result<UpdateResult>;

    async fn delete_many(&self, collection: &str, filter: Document) -> Result<DeleteResult>;

}
