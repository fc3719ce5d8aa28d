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
use bson::{Bson, Document};
use filetrans_storage::QueryOptions;
use hyper::Method;
use log::debug;
use serde_json::{json, Value};
use crate::handlers::{HandleContext, Handler};
use crate::reply::Reply;
use crate::request::{document_to_json, parse_document, Request};

pub struct FindHandler {}

impl FindHandler {

    pub fn new() -> Arc<dyn Handler> {
        Arc::new(FindHandler {})
    }

    /// Collect `sort`, `skip` and `limit` from the query string into an option document.
    ///
    /// Numbers stay strings here, [`QueryOptions::from_document`] coerces them.
    pub(crate) fn query_options(req: &Request) -> Result<QueryOptions> {
        let mut opts = Document::new();
        for (key, value) in &req.query {
            match key.to_lowercase().as_str() {
                "sort" => {
                    opts.insert(key.clone(), parse_document("sort", value)?);
                }
                "skip" | "limit" => {
                    opts.insert(key.clone(), Bson::String(value.clone()));
                }
                _ => (),
            }
        }
        Ok(QueryOptions::from_document(&opts))
    }

}

#[async_trait]
impl Handler for FindHandler {
    fn test(&self, req: &Request) -> bool {
        req.method == Method::GET && req.collection(None).is_some()
    }

    async fn handle(&self, ctx: &HandleContext<'_>) -> Result<Reply> {
        let req = ctx.request;
        let collection = req.collection(None).ok_or(anyhow!("collection name is missing"))?;
        let filter = req.document_param("filter")?;
        let options = FindHandler::query_options(req)?;

        let docs = ctx.app_context.storage()
            .find_many::<Document>(&ctx.call, collection, filter, &options)
            .await?;
        debug!("find on '{}' replies {} documents", collection, docs.len());

        let docs: Vec<Value> = docs.into_iter().map(document_to_json).collect();
        Ok(Reply::ok(json!({
            "documents": docs,
        })))
    }
}
