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

//! A thin data-access layer over MongoDB.
//!
//! [`Storage`] exposes collection-scoped CRUD operations (find one, find
//! many, insert, upsert, delete and a health check) on top of a
//! [`DocumentStore`]. The production store is [`MongoStore`], which uses the
//! official [driver](https://crates.io/crates/mongodb).
//!
//! Query options are typed ([`QueryOptions`]). Callers that receive options
//! as a loose document, e.g. from a query string, can translate them with
//! [`QueryOptions::from_document`], which coerces values with the
//! [`helper`] functions.
//!
//! Every operation takes a [`CallContext`] so it can be cancelled or bounded
//! by a deadline independently of the others.

mod config;
mod context;
mod errors;
mod mongo_store;
mod options;
mod storage;
mod store;

pub mod helper;
pub mod results;

pub use bson;
pub use config::{StorageConfig, StorageConfigBuilder, DEFAULT_CONNECT_TIMEOUT, DEFAULT_DATABASE, DEFAULT_URI};
pub use context::CallContext;
pub use errors::{Error, InvalidArgumentStruct};
pub use mongo_store::MongoStore;
pub use options::{FindOneOptions, FindOptions, QueryOptions, QueryOptionsBuilder};
pub use storage::Storage;
pub use store::DocumentStore;

pub type Result<T> = std::result::Result<T, Error>;
