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

mod health_handler;
mod find_handler;
mod find_one_handler;
mod insert_handler;
mod upsert_handler;
mod delete_handler;

use std::sync::Arc;
use anyhow::Result;
use async_trait::async_trait;
use filetrans_storage::CallContext;
use crate::app_context::AppContext;
use crate::reply::Reply;
use crate::request::Request;

pub use health_handler::HealthHandler;
pub use find_handler::FindHandler;
pub use find_one_handler::FindOneHandler;
pub use insert_handler::InsertHandler;
pub use upsert_handler::UpsertHandler;
pub use delete_handler::DeleteHandler;

pub struct HandleContext<'a> {
    pub app_context: AppContext,
    pub conn_id: u64,
    pub request: &'a Request,
    /// Governs the storage call made for this request.
    pub call: CallContext,
}

#[async_trait]
pub trait Handler: Send + Sync {

    fn test(&self, req: &Request) -> bool;

    async fn handle(&self, ctx: &HandleContext<'_>) -> Result<Reply>;

}

pub fn make_handlers() -> Vec<Arc<dyn Handler>> {
    vec![
        HealthHandler::new(),
        FindOneHandler::new(),
        FindHandler::new(),
        InsertHandler::new(),
        UpsertHandler::new(),
        DeleteHandler::new(),
    ]
}
