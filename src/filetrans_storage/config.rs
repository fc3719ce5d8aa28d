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

use std::time::Duration;

pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "filetrans";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// How to reach the database.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub uri: String,
    pub database: String,
    /// Bounds connection establishment and server selection.
    pub connect_timeout: Duration,
    pub app_name: Option<String>,
}

impl StorageConfig {
    pub fn builder() -> StorageConfigBuilder {
        StorageConfigBuilder::default()
    }
}

impl Default for StorageConfig {

    fn default() -> Self {
        StorageConfig {
            uri: DEFAULT_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            app_name: None,
        }
    }

}

#[derive(Default)]
pub struct StorageConfigBuilder {
    uri: Option<String>,
    database: Option<String>,
    connect_timeout: Option<Duration>,
    app_name: Option<String>,
}

impl StorageConfigBuilder {
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn build(self) -> StorageConfig {
        let default = StorageConfig::default();
        StorageConfig {
            uri: self.uri.unwrap_or(default.uri),
            database: self.database.unwrap_or(default.database),
            connect_timeout: self.connect_timeout.unwrap_or(default.connect_timeout),
            app_name: self.app_name.or(default.app_name),
        }
    }
}
