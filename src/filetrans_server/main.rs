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

//! This is the main entry point for the filetrans server.
//!
//! You can start the server by running `cargo run -- serve --uri mongodb://localhost:27017`.
//!
//! The server will listen on `localhost:9091` by default.
//! You can also specify the host and port by passing `--host` and `--port` arguments.
//! For example: `cargo run -- serve --host 0.0.0.0 --port 8080 --database files`.

use env_logger::Env;
use filetrans_server::{cli, make_handlers, AppContext, Config, Server};
use filetrans_storage::Storage;
use log::{error, info};

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    if let Some(sub) = matches.subcommand_matches("serve") {
        let level = if sub.get_flag("log") { "debug" } else { "info" };
        env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

        let config = Config::from_matches(sub);
        if let Err(e) = serve(config).await {
            error!("error: {:?}", e);
            std::process::exit(1);
        }
        return;
    }

    let _ = cli().print_help();
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let storage = Storage::connect(&config.storage).await?;
    let ctx = AppContext::new(storage, config.clone());
    ctx.register_handlers(make_handlers());

    let mut server = Server::new(ctx, &config);
    server.start().await?;

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    server.close().await
}
