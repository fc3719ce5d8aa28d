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
use hyper::Method;
use serde_json::{json, Value};
use crate::handlers::{HandleContext, Handler};
use crate::reply::Reply;
use crate::request::{json_to_document, Request, RequestError};

/// `PUT /collections/{name}` with `{"filter": {...}, "document": {...}}`.
pub struct UpsertHandler {}

impl UpsertHandler {
    pub fn new() -> Arc<dyn Handler> {
        Arc::new(UpsertHandler {})
    }
}

#[async_trait]
impl Handler for UpsertHandler {
    fn test(&self, req: &Request) -> bool {
        req.method == Method::PUT && req.collection(None).is_some()
    }

    async fn handle(&self, ctx: &HandleContext<'_>) -> Result<Reply> {
        let req = ctx.request;
        let collection = req.collection(None).ok_or(anyhow!("collection name is missing"))?;

        let mut body = match req.json_body()? {
            Value::Object(map) => map,
            _ => return Err(RequestError::NotAnObject("body").into()),
        };
        let filter = json_to_document("filter", body.remove("filter").unwrap_or(Value::Null))?;
        let doc = match body.remove("document") {
            Some(value @ Value::Object(_)) => json_to_document("document", value)?,
            _ => return Err(RequestError::InvalidBody("document is missing").into()),
        };

        let result = ctx.app_context.storage()
            .upsert(&ctx.call, collection, filter, &doc)
            .await?;

        Ok(Reply::ok(json!({
            "matchedCount": result.matched_count,
            "modifiedCount": result.modified_count,
            "upsertedId": result.upserted_id.map(|id| id.into_relaxed_extjson()),
        })))
    }
}
