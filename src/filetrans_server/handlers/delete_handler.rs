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

/// `DELETE /collections/{name}` with `{"filter": {...}}`.
pub struct DeleteHandler {}

impl DeleteHandler {
    pub fn new() -> Arc<dyn Handler> {
        Arc::new(DeleteHandler {})
    }
}

#[async_trait]
impl Handler for DeleteHandler {
    fn test(&self, req: &Request) -> bool {
        req.method == Method::DELETE && req.collection(None).is_some()
    }

    async fn handle(&self, ctx: &HandleContext<'_>) -> Result<Reply> {
        let req = ctx.request;
        let collection = req.collection(None).ok_or(anyhow!("collection name is missing"))?;

        // a missing filter is passed on as empty and refused by the storage
        let filter = match req.json_body()? {
            Value::Object(mut body) => json_to_document("filter", body.remove("filter").unwrap_or(Value::Null))?,
            Value::Null => bson::Document::new(),
            _ => return Err(RequestError::NotAnObject("body").into()),
        };

        let result = ctx.app_context.storage()
            .delete(&ctx.call, collection, filter)
            .await?;

        Ok(Reply::ok(json!({
            "n": result.deleted_count,
        })))
    }
}
