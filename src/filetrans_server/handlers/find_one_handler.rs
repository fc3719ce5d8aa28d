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
use serde_json::json;
use crate::handlers::{FindHandler, HandleContext, Handler};
use crate::reply::Reply;
use crate::request::{document_to_json, Request};

const SUFFIX: &str = "one";

pub struct FindOneHandler {}

impl FindOneHandler {
    pub fn new() -> Arc<dyn Handler> {
        Arc::new(FindOneHandler {})
    }
}

#[async_trait]
impl Handler for FindOneHandler {
    fn test(&self, req: &Request) -> bool {
        req.method == Method::GET && req.collection(Some(SUFFIX)).is_some()
    }

    async fn handle(&self, ctx: &HandleContext<'_>) -> Result<Reply> {
        let req = ctx.request;
        let collection = req.collection(Some(SUFFIX)).ok_or(anyhow!("collection name is missing"))?;
        let filter = req.document_param("filter")?;
        let options = FindHandler::query_options(req)?;

        let doc = ctx.app_context.storage()
            .find_one::<Document>(&ctx.call, collection, filter, &options)
            .await?;

        Ok(Reply::ok(json!({
            "document": document_to_json(doc),
        })))
    }
}
