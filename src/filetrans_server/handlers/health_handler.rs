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
use anyhow::Result;
use async_trait::async_trait;
use hyper::Method;
use log::debug;
use serde_json::json;
use crate::handlers::{HandleContext, Handler};
use crate::reply::Reply;
use crate::request::Request;

pub struct HealthHandler {}

impl HealthHandler {
    pub fn new() -> Arc<dyn Handler> {
        Arc::new(HealthHandler {})
    }
}

#[async_trait]
impl Handler for HealthHandler {
    fn test(&self, req: &Request) -> bool {
        req.method == Method::GET && req.segments() == ["health"]
    }

    async fn handle(&self, ctx: &HandleContext<'_>) -> Result<Reply> {
        debug!("HealthHandler::handle {}", ctx.conn_id);
        ctx.app_context.storage().health_check(&ctx.call).await?;
        Ok(Reply::ok(json!({
            "time": chrono::Utc::now().to_rfc3339(),
        })))
    }
}
