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

use std::fmt;
use thiserror::Error;

#[derive(Debug)]
pub struct InvalidArgumentStruct {
    pub op_name: &'static str,
    pub reason: String,
}

impl fmt::Display for InvalidArgumentStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid argument for {}: {}", self.op_name, self.reason)
    }
}

impl From<InvalidArgumentStruct> for Error {
    fn from(value: InvalidArgumentStruct) -> Self {
        Error::InvalidArgument(Box::new(value))
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("connectivity error: {0}")]
    Connectivity(Box<mongodb::error::Error>),
    #[error("no document found in collection '{0}'")]
    NotFound(String),
    #[error("bson de error: {0}")]
    Decode(Box<bson::de::Error>),
    #[error("bson ser error: {0}")]
    Encode(Box<bson::ser::Error>),
    #[error("{0}")]
    InvalidArgument(Box<InvalidArgumentStruct>),
    #[error("client error: {0}")]
    Client(Box<mongodb::error::Error>),
    #[error("the operation is cancelled")]
    Cancelled,
    #[error("the operation exceeded its deadline")]
    DeadlineExceeded,
}

impl Error {

    pub(crate) fn connectivity(error: mongodb::error::Error) -> Error {
        Error::Connectivity(Box::new(error))
    }

    /// Whether the error means the database could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Connectivity(_))
    }

}

impl From<mongodb::error::Error> for Error {
    fn from(error: mongodb::error::Error) -> Self {
        Error::Client(Box::new(error))
    }
}

impl From<bson::de::Error> for Error {
    fn from(error: bson::de::Error) -> Self {
        Error::Decode(Box::new(error))
    }
}

impl From<bson::ser::Error> for Error {
    fn from(error: bson::ser::Error) -> Self {
        Error::Encode(Box::new(error))
    }
}
