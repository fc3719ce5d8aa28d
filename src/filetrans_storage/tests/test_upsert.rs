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

use filetrans_storage::bson::{doc, Document};
use filetrans_storage::{CallContext, QueryOptions};

mod common;

use common::prepare_storage;

#[tokio::test]
async fn test_upsert_inserts_then_updates() {
    let (store, storage) = prepare_storage();
    let cx = CallContext::background();

    let result = storage.upsert(&cx, "files", doc! { "path": "/tmp/a.csv" }, &doc! {
        "state": "uploaded",
        "size": 120,
    }).await.unwrap();
    assert_eq!(result.matched_count, 0);
    assert!(result.upserted_id.is_some());
    assert_eq!(store.count("files"), 1);

    let result = storage.upsert(&cx, "files", doc! { "path": "/tmp/a.csv" }, &doc! {
        "state": "converted",
    }).await.unwrap();
    assert_eq!(result.matched_count, 1);
    assert_eq!(result.modified_count, 1);
    assert!(result.upserted_id.is_none());
    assert_eq!(store.count("files"), 1);

    let found: Document = storage.find_one(&cx, "files", doc! { "path": "/tmp/a.csv" }, &QueryOptions::default()).await.unwrap();
    assert_eq!(found.get_str("state").unwrap(), "converted");
    // fields absent from the update are kept
    assert_eq!(found.get_i32("size").unwrap(), 120);
}

#[tokio::test]
async fn test_upsert_affects_one_document() {
    let (store, storage) = prepare_storage();
    let cx = CallContext::background();

    storage.insert_many(&cx, "files", vec![
        doc! { "owner": "alice", "name": "a" },
        doc! { "owner": "alice", "name": "b" },
    ]).await.unwrap();

    let result = storage.upsert(&cx, "files", doc! { "owner": "alice" }, &doc! { "shared": true }).await.unwrap();
    assert_eq!(result.matched_count, 1);
    assert_eq!(store.count("files"), 2);

    let shared: Vec<Document> = storage.find_many(&cx, "files", doc! { "shared": true }, &QueryOptions::default()).await.unwrap();
    assert_eq!(shared.len(), 1);
}
