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

use bson::{Bson, Document};
use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use hyper::Method;
use percent_encoding::percent_decode_str;
use serde_json::Value;
use thiserror::Error;

const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("failed to read request body: {0}")]
    Body(String),
    #[error("invalid json in {field}: {source}")]
    InvalidJson {
        field: &'static str,
        source: serde_json::Error,
    },
    #[error("invalid extended json in {field}: {message}")]
    InvalidExtJson {
        field: &'static str,
        message: String,
    },
    #[error("{0} is not a json object")]
    NotAnObject(&'static str),
    #[error("{0}")]
    InvalidBody(&'static str),
}

/// An HTTP request with its body fully read.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    /// Non-empty path segments, percent-decoded.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Bytes,
}

impl Request {

    pub async fn read_from(req: hyper::Request<Incoming>) -> Result<Request, RequestError> {
        let (parts, body) = req.into_parts();
        let body = Limited::new(body, MAX_BODY_SIZE)
            .collect()
            .await
            .map_err(|e| RequestError::Body(e.to_string()))?
            .to_bytes();

        let query = parts.uri
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        let path = parts.uri.path().to_string();
        let segments = decode_segments(&path);

        Ok(Request {
            method: parts.method,
            path,
            segments,
            query,
            body,
        })
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn segments(&self) -> Vec<&str> {
        self.segments.iter().map(String::as_str).collect()
    }

    /// The collection addressed by `/collections/{name}` or `/collections/{name}/{suffix}`.
    pub fn collection(&self, suffix: Option<&str>) -> Option<&str> {
        match (self.segments().as_slice(), suffix) {
            (["collections", name], None) => Some(*name),
            (["collections", name, last], Some(expected)) if *last == expected => Some(*name),
            _ => None,
        }
    }

    pub fn json_body(&self) -> Result<Value, RequestError> {
        if self.body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&self.body).map_err(|source| RequestError::InvalidJson {
            field: "body",
            source,
        })
    }

    /// Parse a query parameter holding a json object, an absent parameter gives an empty document.
    pub fn document_param(&self, name: &'static str) -> Result<Document, RequestError> {
        match self.query_param(name) {
            Some(raw) => parse_document(name, raw),
            None => Ok(Document::new()),
        }
    }

}

fn decode_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        .collect()
}

pub fn parse_document(field: &'static str, raw: &str) -> Result<Document, RequestError> {
    let value = serde_json::from_str::<Value>(raw).map_err(|source| RequestError::InvalidJson {
        field,
        source,
    })?;
    json_to_document(field, value)
}

/// Convert a json object, which may contain extended json such as `{"$oid": ...}`, to a document.
pub fn json_to_document(field: &'static str, value: Value) -> Result<Document, RequestError> {
    match value {
        Value::Object(map) => Document::try_from(map).map_err(|e| RequestError::InvalidExtJson {
            field,
            message: e.to_string(),
        }),
        Value::Null => Ok(Document::new()),
        _ => Err(RequestError::NotAnObject(field)),
    }
}

pub fn document_to_json(doc: Document) -> Value {
    Bson::Document(doc).into_relaxed_extjson()
}
