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

use bson::Bson;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    /// The `_id` field of the document inserted.
    pub inserted_id: Bson,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertManyResult {
    /// The `_id` fields of the documents inserted, in input order.
    pub inserted_ids: Vec<Bson>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    /// The number of documents that matched the filter.
    pub matched_count: u64,
    /// The number of documents that were modified by the operation.
    pub modified_count: u64,
    /// The `_id` of the inserted document if the update was an upsert.
    pub upserted_id: Option<Bson>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// The number of documents deleted by the operation.
    pub deleted_count: u64,
}

impl From<mongodb::results::InsertOneResult> for InsertOneResult {
    fn from(value: mongodb::results::InsertOneResult) -> Self {
        InsertOneResult {
            inserted_id: value.inserted_id,
        }
    }
}

impl From<mongodb::results::InsertManyResult> for InsertManyResult {
    fn from(value: mongodb::results::InsertManyResult) -> Self {
        let mut pairs: Vec<(usize, Bson)> = value.inserted_ids.into_iter().collect();
        pairs.sort_by_key(|(index, _)| *index);
        InsertManyResult {
            inserted_ids: pairs.into_iter().map(|(_, id)| id).collect(),
        }
    }
}

impl From<mongodb::results::UpdateResult> for UpdateResult {
    fn from(value: mongodb::results::UpdateResult) -> Self {
        UpdateResult {
            matched_count: value.matched_count,
            modified_count: value.modified_count,
            upserted_id: value.upserted_id,
        }
    }
}

impl From<mongodb::results::DeleteResult> for DeleteResult {
    fn from(value: mongodb::results::DeleteResult) -> Self {
        DeleteResult {
            deleted_count: value.deleted_count,
        }
    }
}
