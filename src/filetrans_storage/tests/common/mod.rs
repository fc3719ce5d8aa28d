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

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::time::Duration;
use async_trait::async_trait;
use filetrans_storage::bson::{oid::ObjectId, Bson, Document};
use filetrans_storage::results::{DeleteResult, InsertManyResult, InsertOneResult, UpdateResult};
use filetrans_storage::{DocumentStore, FindOneOptions, FindOptions, Result, Storage};

/// An in-process stand-in for the database.
///
/// Filters only support top-level equality, updates only support `$set`.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    latency: Option<Duration>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl MemoryStore {

    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn with_latency(latency: Duration) -> MemoryStore {
        MemoryStore {
            latency: Some(latency),
            ..MemoryStore::default()
        }
    }

    /// Number of operations that reached the store.
    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    pub fn count(&self, collection: &str) -> usize {
        let collections = self.collections.lock().unwrap();
        collections.get(collection).map(|docs| docs.len()).unwrap_or(0)
    }

    async fn enter(&self) {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn insert_doc(docs: &mut Vec<Document>, doc: Document) -> Bson {
        let id = match doc.get("_id") {
            Some(id) => id.clone(),
            None => Bson::ObjectId(ObjectId::new()),
        };
        let mut stored = Document::new();
        stored.insert("_id", id.clone());
        for (key, value) in doc {
            if key != "_id" {
                stored.insert(key, value);
            }
        }
        docs.push(stored);
        id
    }

    fn query(&self, collection: &str, filter: &Document, sort: Option<&Document>) -> Vec<Document> {
        let collections = self.collections.lock().unwrap();
        let mut result: Vec<Document> = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| matches(doc, filter)).cloned().collect())
            .unwrap_or_default();
        if let Some(sort) = sort {
            result.sort_by(|a, b| compare_docs(a, b, sort));
        }
        result
    }

}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, value)| doc.get(key) == Some(value))
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(i) => Some(*i as f64),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (Some(Bson::String(a)), Some(Bson::String(b))) => a.cmp(b),
        (Some(a), Some(b)) => match (as_f64(a), as_f64(b)) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_docs(a: &Document, b: &Document, sort: &Document) -> Ordering {
    for (key, direction) in sort {
        let ordering = compare_values(a.get(key), b.get(key));
        let ordering = if as_f64(direction).unwrap_or(1.0) < 0.0 {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[async_trait]
impl DocumentStore for MemoryStore {

    async fn ping(&self) -> Result<()> {
        self.enter().await;
        Ok(())
    }

    async fn find(&self, collection: &str, filter: Document, options: FindOptions) -> Result<Vec<Document>> {
        self.enter().await;
        let docs = self.query(collection, &filter, options.sort.as_ref());
        let skip = options.skip.unwrap_or(0) as usize;
        let iter = docs.into_iter().skip(skip);
        let result = match options.limit {
            Some(limit) if limit > 0 => iter.take(limit as usize).collect(),
            _ => iter.collect(),
        };
        Ok(result)
    }

    async fn find_one(&self, collection: &str, filter: Document, options: FindOneOptions) -> Result<Option<Document>> {
        self.enter().await;
        let docs = self.query(collection, &filter, options.sort.as_ref());
        let skip = options.skip.unwrap_or(0) as usize;
        Ok(docs.into_iter().nth(skip))
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> Result<InsertOneResult> {
        self.enter().await;
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();
        let inserted_id = MemoryStore::insert_doc(docs, doc);
        Ok(InsertOneResult { inserted_id })
    }

    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<InsertManyResult> {
        self.enter().await;
        let mut collections = self.collections.lock().unwrap();
        let stored = collections.entry(collection.to_string()).or_default();
        let inserted_ids = docs.into_iter()
            .map(|doc| MemoryStore::insert_doc(stored, doc))
            .collect();
        Ok(InsertManyResult { inserted_ids })
    }

    async fn update_one(&self, collection: &str, filter: Document, update: Document, upsert: bool) -> Result<UpdateResult> {
        self.enter().await;
        let set = update.get_document("$set").cloned().unwrap_or_default();
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(doc) = docs.iter_mut().find(|doc| matches(doc, &filter)) {
            let mut modified = false;
            for (key, value) in set {
                if doc.get(&key) != Some(&value) {
                    doc.insert(key, value);
                    modified = true;
                }
            }
            return Ok(UpdateResult {
                matched_count: 1,
                modified_count: if modified { 1 } else { 0 },
                upserted_id: None,
            });
        }

        if !upsert {
            return Ok(UpdateResult::default());
        }

        let mut new_doc = filter;
        for (key, value) in set {
            new_doc.insert(key, value);
        }
        let upserted_id = MemoryStore::insert_doc(docs, new_doc);
        Ok(UpdateResult {
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(upserted_id),
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

#[allow(dead_code)]
pub fn prepare_storage() -> (Arc<MemoryStore>, Storage) {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = Arc::new(MemoryStore::new());
    let storage = Storage::with_store(store.clone());
    (store, storage)
}
