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

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use filetrans_storage::Storage;
use crate::config::Config;
use crate::handlers::Handler;
use crate::request::Request;

#[derive(Clone)]
pub struct AppContext {
    inner: Arc<AppContextInner>,
}

impl AppContext {

    pub fn new(storage: Storage, config: Config) -> Self {
        AppContext {
            inner: Arc::new(AppContextInner::new(storage, config)),
        }
    }

    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.inner.storage
    }

    #[inline]
    pub fn request_timeout(&self) -> Duration {
        self.inner.config.request_timeout
    }

    pub fn push_handler(&self, handler: Arc<dyn Handler>) {
        let mut handlers = self.inner.handlers.lock().unwrap();
        handlers.push(handler);
    }

    pub fn register_handlers(&self, handlers: Vec<Arc<dyn Handler>>) {
        for handler in handlers {
            self.push_handler(handler);
        }
    }

    /// The first registered handler accepting `req`.
    pub fn get_handler(&self, req: &Request) -> Option<Arc<dyn Handler>> {
        let handlers = self.inner.handlers.lock().unwrap();
        handlers.iter().find(|handler| handler.test(req)).cloned()
    }

    pub fn next_conn_id(&self) -> u64 {
        self.inner.conn_id.fetch_add(1, Ordering::Relaxed)
    }
}

struct AppContextInner {
    storage: Storage,
    config: Config,
    handlers: Mutex<Vec<Arc<dyn Handler>>>,
    conn_id: AtomicU64,
}

impl AppContextInner {

    fn new(storage: Storage, config: Config) -> Self {
        AppContextInner {
            storage,
            config,
            handlers: Mutex::new(Vec::with_capacity(8)),
            conn_id: AtomicU64::new(0),
        }
    }

}
