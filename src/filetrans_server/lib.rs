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

//! HTTP front end for [`filetrans_storage`].
//!
//! The server exposes the storage facade as json endpoints:
//!
//! | method   | path                      | operation     |
//! |----------|---------------------------|---------------|
//! | `GET`    | `/health`                 | health check  |
//! | `GET`    | `/collections/{name}`     | find many     |
//! | `GET`    | `/collections/{name}/one` | find one      |
//! | `POST`   | `/collections/{name}`     | insert        |
//! | `PUT`    | `/collections/{name}`     | upsert        |
//! | `DELETE` | `/collections/{name}`     | delete        |
//!
//! Query endpoints read `filter` and `sort` as json from the query string,
//! `skip` and `limit` as numbers.

mod app_context;
mod config;
mod reply;
mod request;
mod server;

pub mod handlers;

pub use app_context::AppContext;
pub use config::{cli, Config, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT};
pub use handlers::{make_handlers, HandleContext, Handler};
pub use reply::Reply;
pub use request::{Request, RequestError};
pub use server::{start_http_server, Server};
