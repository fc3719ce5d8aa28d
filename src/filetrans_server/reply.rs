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

use bytes::Bytes;
use filetrans_storage::Error as StorageError;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde_json::{json, Value};
use crate::request::RequestError;

/// A json reply. Successful bodies carry `"ok": 1`, failures carry
/// `"ok": 0` with `errmsg` and `code`.
#[derive(Debug)]
pub struct Reply {
    pub(crate) status: StatusCode,
    pub(crate) body: Value,
}

impl Reply {

    pub fn new(status: StatusCode, body: Value) -> Reply {
        Reply {
            status,
            body,
        }
    }

    /// A `200` reply; `"ok": 1` is added to `fields`.
    pub fn ok(fields: Value) -> Reply {
        let mut body = json!({ "ok": 1 });
        if let (Value::Object(body), Value::Object(fields)) = (&mut body, fields) {
            body.extend(fields);
        }
        Reply::new(StatusCode::OK, body)
    }

    pub fn error(status: StatusCode, errmsg: impl Into<String>) -> Reply {
        let body = json!({
            "ok": 0,
            "errmsg": errmsg.into(),
            "code": status.as_u16(),
        });
        Reply::new(status, body)
    }

    pub fn from_error(err: &anyhow::Error) -> Reply {
        Reply::error(status_for(err), err.to_string())
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let payload = serde_json::to_vec(&self.body).unwrap_or_default();
        let mut response = Response::new(Full::new(Bytes::from(payload)));
        *response.status_mut() = self.status;
        response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }

}

fn status_for(err: &anyhow::Error) -> StatusCode {
    if let Some(err) = err.downcast_ref::<StorageError>() {
        return match err {
            StorageError::InvalidArgument(_) | StorageError::Encode(_) => StatusCode::BAD_REQUEST,
            StorageError::NotFound(_) => StatusCode::NOT_FOUND,
            StorageError::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
            StorageError::Cancelled | StorageError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            StorageError::Decode(_) | StorageError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
    }
    if err.downcast_ref::<RequestError>().is_some() {
        return StatusCode::BAD_REQUEST;
    }
    StatusCode::INTERNAL_SERVER_ERROR
}
