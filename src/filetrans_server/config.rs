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
use clap::{Arg, ArgAction, ArgMatches, Command as App};
use filetrans_storage::StorageConfig;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 9091;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Deadline applied to the storage call of every request.
    pub request_timeout: Duration,
    pub storage: StorageConfig,
}

impl Config {

    pub fn socket(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the configuration from the `serve` subcommand of [`cli`].
    pub fn from_matches(matches: &ArgMatches) -> Config {
        let default = Config::default();
        let host = matches.get_one::<String>("host").cloned().unwrap_or(default.host);
        let port = matches.get_one::<u16>("port").copied().unwrap_or(default.port);
        let request_timeout = matches.get_one::<u64>("timeout")
            .map(|secs| Duration::from_secs(*secs))
            .unwrap_or(default.request_timeout);

        let mut storage = StorageConfig::builder();
        if let Some(uri) = matches.get_one::<String>("uri") {
            storage = storage.uri(uri.clone());
        }
        if let Some(database) = matches.get_one::<String>("database") {
            storage = storage.database(database.clone());
        }
        storage = storage.app_name(env!("CARGO_PKG_NAME"));

        Config {
            host,
            port,
            request_timeout,
            storage: storage.build(),
        }
    }

}

impl Default for Config {

    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            storage: StorageConfig::default(),
        }
    }

}

pub fn cli() -> App {
    App::new("filetrans")
        .version(env!("CARGO_PKG_VERSION"))
        .about("HTTP access to document collections stored in MongoDB")
        .author("Vincent Chan <okcdz@diverse.space>")
        .subcommand(App::new("serve")
            .about("connect to the database, start the http server")
            .arg(
                Arg::new("host")
                    .long("host")
                    .help("the host address")
                    .default_value(DEFAULT_HOST)
                    .num_args(1)
            )
            .arg(
                Arg::new("port")
                    .long("port")
                    .help("the port number")
                    .default_value("9091")
                    .value_parser(clap::value_parser!(u16))
                    .num_args(1)
            )
            .arg(
                Arg::new("uri")
                    .short('u')
                    .long("uri")
                    .value_name("URI")
                    .help("the mongodb connection string")
                    .default_value(filetrans_storage::DEFAULT_URI)
                    .num_args(1)
            )
            .arg(
                Arg::new("database")
                    .short('d')
                    .long("database")
                    .value_name("NAME")
                    .default_value(filetrans_storage::DEFAULT_DATABASE)
                    .num_args(1)
            )
            .arg(
                Arg::new("timeout")
                    .long("timeout")
                    .help("request timeout in seconds")
                    .default_value("30")
                    .value_parser(clap::value_parser!(u64))
                    .num_args(1)
            )
            .arg(
                Arg::new("log")
                    .help("print debug log")
                    .long("log")
                    .short('l')
                    .action(ArgAction::SetTrue)
            )
        )
}
