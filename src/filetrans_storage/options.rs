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
use crate::helper;

/// Options accepted by the query operations of [`Storage`](crate::Storage).
///
/// `limit` only applies to multi-document queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub sort: Option<Document>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl QueryOptions {
    pub fn builder() -> QueryOptionsBuilder {
        QueryOptionsBuilder::default()
    }

    /// Translate a loosely typed option document, e.g. `{"sort": {"name": 1}, "skip": "10"}`.
    ///
    /// Keys are matched case-insensitively against `sort`, `skip` and `limit`,
    /// other keys are ignored. `skip` and `limit` go through [`helper::to_int`],
    /// so anything not convertible counts as zero. Negative numbers are
    /// clamped to zero. A `sort` that is not a document is ignored.
    pub fn from_document(opts: &Document) -> QueryOptions {
        let mut result = QueryOptions::default();
        for (key, value) in opts {
            match key.to_lowercase().as_str() {
                "sort" => {
                    if let Bson::Document(sort) = value {
                        result.sort = Some(sort.clone());
                    }
                }
                "skip" => {
                    result.skip = Some(non_negative(value));
                }
                "limit" => {
                    result.limit = Some(non_negative(value));
                }
                _ => (),
            }
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.sort.is_none() && self.skip.is_none() && self.limit.is_none()
    }

    pub(crate) fn find_options(&self) -> FindOptions {
        FindOptions {
            sort: self.sort.clone(),
            skip: self.skip,
            limit: self.limit,
        }
    }

    pub(crate) fn find_one_options(&self) -> FindOneOptions {
        FindOneOptions {
            sort: self.sort.clone(),
            skip: self.skip,
        }
    }
}

fn non_negative(value: &Bson) -> u64 {
    helper::to_int(value).max(0) as u64
}

pub struct QueryOptionsBuilder {
    sort: Option<Document>,
    skip: Option<u64>,
    limit: Option<u64>,
}

impl QueryOptionsBuilder {
    pub fn sort(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(self) -> QueryOptions {
        QueryOptions {
            sort: self.sort,
            skip: self.skip,
            limit: self.limit,
        }
    }
}

impl Default for QueryOptionsBuilder {
    fn default() -> Self {
        QueryOptionsBuilder {
            sort: None,
            skip: None,
            limit: None,
        }
    }
}

/// Options for a multi-document query, as handed to a [`DocumentStore`](crate::DocumentStore).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub sort: Option<Document>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

/// Options for a single-document query, as handed to a [`DocumentStore`](crate::DocumentStore).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOneOptions {
    pub sort: Option<Document>,
    pub skip: Option<u64>,
}

impl From<FindOptions> for mongodb::options::FindOptions {
    fn from(value: FindOptions) -> Self {
        let mut options = mongodb::options::FindOptions::default();
        options.sort = value.sort;
        options.skip = value.skip;
        // a negative limit asks the server for a single batch
        options.limit = value.limit.map(|limit| i64::try_from(limit).unwrap_or(i64::MAX));
        options
    }
}

impl From<FindOneOptions> for mongodb::options::FindOneOptions {
    fn from(value: FindOneOptions) -> Self {
        let mut options = mongodb::options::FindOneOptions::default();
        options.sort = value.sort;
        options.skip = value.skip;
        options
    }
}
