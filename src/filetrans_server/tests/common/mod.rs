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

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use bytes::Bytes;
use filetrans_server::{make_handlers, AppContext, Config, Server};
use filetrans_storage::results::{DeleteResult, InsertManyResult, InsertOneResult, UpdateResult};
use filetrans_storage::{DocumentStore, FindOneOptions, FindOptions, Result, Storage};
use http_body_util::{BodyExt, Full};
use hyper::client::conn::http1;
use hyper::{Method, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::Value;
use tokio::net::TcpStream;

/// Keeps documents in memory and remembers what the server asked for.
#[derive(Default)]
pub struct RecordingStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    last_find: Mutex<Option<FindOptions>>,
    latency: Option<Duration>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl RecordingStore {

    pub fn new() -> RecordingStore {
        RecordingStore::default()
    }

    pub fn with_latency(latency: Duration) -> RecordingStore {
        RecordingStore {
            latency: Some(latency),
            ..RecordingStore::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_find(&self) -> Option<FindOptions> {
        self.last_find.lock().unwrap().clone()
    }

    pub fn documents(&self, collection: &str) -> Vec<Document> {
        let collections = self.collections.lock().unwrap();
        collections.get(collection).cloned().unwrap_or_default()
    }

    async fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn select(&self, collection: &str, filter: &Document) -> Vec<Document> {
        self.documents(collection)
            .into_iter()
            .filter(|doc| matches(doc, filter))
            .collect()
    }

    fn push(&self, collection: &str, mut doc: Document) -> Bson {
        let id = doc.get("_id").cloned().unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));
        doc.insert("_id", id.clone());
        let mut collections = self.collections.lock().unwrap();
        collections.entry(collection.to_string()).or_default().push(doc);
        id
    }

}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, value)| doc.get(key) == Some(value))
}

#[async_trait]
impl DocumentStore for RecordingStore {

    async fn ping(&self) -> Result<()> {
        self.enter().await;
        Ok(())
    }

    async fn find(&self, collection: &str, filter: Document, options: FindOptions) -> Result<Vec<Document>> {
        self.enter().await;
        *self.last_find.lock().unwrap() = Some(options.clone());
        let docs = self.select(collection, &filter).into_iter().skip(options.skip.unwrap_or(0) as usize);
        Ok(match options.limit {
            Some(limit) if limit > 0 => docs.take(limit as usize).collect(),
            _ => docs.collect(),
        })
    }

    async fn find_one(&self, collection: &str, filter: Document, options: FindOneOptions) -> Result<Option<Document>> {
        self.enter().await;
        Ok(self.select(collection, &filter).into_iter().nth(options.skip.unwrap_or(0) as usize))
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> Result<InsertOneResult> {
        self.enter().await;
        let inserted_id = self.push(collection, doc);
        Ok(InsertOneResult { inserted_id })
    }

    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<InsertManyResult> {
        self.enter().await;
        let inserted_ids = docs.into_iter().map(|doc| self.push(collection, doc)).collect();
        Ok(InsertManyResult { inserted_ids })
    }

    async fn update_one(&self, collection: &str, filter: Document, update: Document, upsert: bool) -> Result<UpdateResult> {
        self.enter().await;
        let set = update.get_document("$set").cloned().unwrap_or_default();
        {
            let mut collections = self.collections.lock().unwrap();
            let docs = collections.entry(collection.to_string()).or_default();
            if let Some(doc) = docs.iter_mut().find(|doc| matches(doc, &filter)) {
                let modified = set.iter().any(|(key, value)| doc.get(key) != Some(value));
                for (key, value) in set {
                    doc.insert(key, value);
                }
                return Ok(UpdateResult {
                    matched_count: 1,
                    modified_count: if modified { 1 } else { 0 },
                    upserted_id: None,
                });
            }
        }
        if !upsert {
            return Ok(UpdateResult::default());
        }
        let mut doc = filter;
        for (key, value) in set {
            doc.insert(key, value);
        }
        let id = self.push(collection, doc);
        Ok(UpdateResult {
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id),
        })
    }

    async fn delete_many(&self, collection: &str, filter: Document) -> Result<DeleteResult> {
        self.enter().await;
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();
        let before = docs.len();
        docs.retain(|doc| !matches(doc, &filter));
        Ok(DeleteResult {
            deleted_count: (before - docs.len()) as u64,
        })
    }

}

pub fn test_config() -> Config {
    let _ = env_logger::builder().is_test(true).try_init();
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..Config::default()
    }
}

/// Start a server backed by `store` on an ephemeral port.
pub async fn start_server(store: Arc<dyn DocumentStore>, config: Config) -> (Server, SocketAddr) {
    start_with_storage(Storage::with_store(store), config).await
}

#[allow(dead_code)]
pub async fn start_with_storage(storage: Storage, config: Config) -> (Server, SocketAddr) {
    let ctx = AppContext::new(storage, config.clone());
    ctx.register_handlers(make_handlers());

    let mut server = Server::new(ctx, &config);
    let addr = server.start().await.unwrap();
    assert!(addr.port() > 0);
    (server, addr)
}

/// Append `pairs` to `path` as an encoded query string.
#[allow(dead_code)]
pub fn with_query(path: &str, pairs: &[(&str, &str)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{}?{}", path, query)
}

/// Send one request on a fresh connection, return the status and the json body.
pub async fn send(addr: SocketAddr, method: Method, path: &str, body: Option<&str>) -> (StatusCode, Value) {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (mut sender, conn) = http1::handshake(TokioIo::new(stream)).await.unwrap();
    tokio::spawn(async move {
        let _ = conn.await;
    });

    let payload = body.map(|b| Bytes::from(b.to_string())).unwrap_or_default();
    let req = hyper::Request::builder()
        .method(method)
        .uri(path)
        .header("host", addr.to_string())
        .header("content-type", "application/json")
        .body(Full::new(payload))
        .unwrap();

    let res = sender.send_request(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}
