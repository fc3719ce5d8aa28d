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
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bson::Document;
use hyper::Method;
use log::debug;
use serde_json::{json, Value};
use crate::handlers::{HandleContext, Handler};
use crate::reply::Reply;
use crate::request::{json_to_document, Request, RequestError};

/// `POST /collections/{name}`, an object inserts one document, an array inserts many.
pub struct InsertHandler {}

impl InsertHandler {
    pub fn new() -> Arc<dyn Handler> {
        Arc::new(InsertHandler {})
    }
}

#[async_trait]
impl Handler for InsertHandler {
    fn test(&self, req: &Request) -> bool {
        req.method == Method::POST && req.collection(None).is_some()
    }

    async fn handle(&self, ctx: &HandleContext<'_>) -> Result<Reply> {
        let req = ctx.request;
        let collection = req.collection(None).ok_or(anyhow!("collection name is missing"))?;
        let storage = ctx.app_context.storage();

        match req.json_body()? {
            Value::Object(map) => {
                let doc = json_to_document("body", Value::Object(map))?;
                let result = storage.insert_one(&ctx.call, collection, &doc).await?;
                Ok(Reply::ok(json!({
                    "insertedId": result.inserted_id.into_relaxed_extjson(),
                })))
            }
            Value::Array(items) => {
                if items.is_empty() {
                    return Err(RequestError::InvalidBody("no documents to insert").into());
                }
                let docs = items.into_iter()
                    .map(|item| json_to_document("body", item))
                    .collect::<Result<Vec<Document>, RequestError>>()?;
                debug!("insert {} documents into '{}'", docs.len(), collection);

                let result = storage.insert_many(&ctx.call, collection, docs).await?;
                let ids: Vec<Value> = result.inserted_ids
                    .into_iter()
                    .map(|id| id.into_relaxed_extjson())
                    .collect();
                Ok(Reply::ok(json!({
                    "insertedIds": ids,
                })))
            }
            _ => Err(RequestError::InvalidBody("body must be a json object or an array of objects").into()),
        }
    }
}
