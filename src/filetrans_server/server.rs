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

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;
use anyhow::{anyhow, Result};
use bytes::Bytes;
use filetrans_storage::CallContext;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Response, StatusCode};
use hyper_util::rt::TokioIo;
use log::{debug, error, info, warn};
use tokio::net::TcpStream;
use tokio::select;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use crate::app_context::AppContext;
use crate::handlers::HandleContext;
use crate::reply::Reply;
use crate::request::Request;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// An HTTP server that runs in the background between [`start`](Server::start)
/// and [`close`](Server::close).
///
/// ```no_run
/// use filetrans_server::{AppContext, Config, Server, make_handlers};
/// use filetrans_storage::Storage;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::default();
/// let storage = Storage::connect(&config.storage).await?;
/// let ctx = AppContext::new(storage, config.clone());
/// ctx.register_handlers(make_handlers());
///
/// let mut server = Server::new(ctx, &config);
/// let addr = server.start().await?;
/// println!("listening on {}", addr);
/// server.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct Server {
    ctx: AppContext,
    socket: String,
    token: CancellationToken,
    running: Option<(SocketAddr, JoinHandle<()>)>,
}

impl Server {

    pub fn new(ctx: AppContext, config: &crate::Config) -> Server {
        Server {
            ctx,
            socket: config.socket(),
            token: CancellationToken::new(),
            running: None,
        }
    }

    /// Bind the socket and start accepting connections without blocking.
    pub async fn start(&mut self) -> Result<SocketAddr> {
        if let Some((addr, _)) = &self.running {
            return Err(anyhow!("server already listening on {}", addr));
        }
        let (addr, handle) = start_http_server(self.ctx.clone(), self.socket.clone(), self.token.clone()).await?;
        info!("listening on {}", addr);
        self.running = Some((addr, handle));
        Ok(addr)
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|(addr, _)| *addr)
    }

    /// Stop accepting connections and wait until in-flight requests have been answered.
    pub async fn close(mut self) -> Result<()> {
        self.token.cancel();
        if let Some((_, handle)) = self.running.take() {
            handle.await?;
        }
        Ok(())
    }

}

/// Serve http on `socket` until `token` is cancelled.
///
/// After cancellation the returned handle completes once every open
/// connection has finished its in-flight requests.
pub async fn start_http_server(ctx: AppContext, socket: String, token: CancellationToken) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listener = tokio::net::TcpListener::bind(&socket).await?;
    let addr = listener.local_addr()?;

    let fut = tokio::spawn(async move {
        let tracker = TaskTracker::new();
        loop {
            select! {
                _ = token.cancelled() => {
                    break
                }

                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            let ctx = ctx.clone();
                            let token = token.clone();
                            tracker.spawn(async move {
                                let conn_id = ctx.next_conn_id();
                                debug!("new connection: {} from {}", conn_id, addr);
                                let result = handle_stream(ctx, conn_id, stream, token).await;
                                if let Err(e) = result {
                                    error!("handle stream error: {:?}", e);
                                }
                                debug!("connection closed: {}", conn_id);
                            });
                        }
                        Err(err) => {
                            // EMFILE and friends clear up once connections close
                            warn!("accept error: {:?}", err);
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                        }
                    }
                }
            }
        }

        drop(listener);
        tracker.close();
        info!("server stopped accepting, waiting for {} connections", tracker.len());
        tracker.wait().await;
        info!("server stopped");
    });

    Ok((addr, fut))
}

async fn handle_stream(ctx: AppContext, conn_id: u64, stream: TcpStream, token: CancellationToken) -> Result<()> {
    // storage calls of this connection stop when the connection goes away,
    // not when the server shuts down
    let conn_token = CancellationToken::new();
    let _conn_guard = conn_token.clone().drop_guard();

    let service = service_fn(move |req: hyper::Request<Incoming>| {
        let ctx = ctx.clone();
        let call_token = conn_token.child_token();
        async move {
            Ok::<_, Infallible>(handle_request(ctx, conn_id, call_token, req).await)
        }
    });

    let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
    tokio::pin!(conn);

    select! {
        result = conn.as_mut() => {
            result?;
        }

        _ = token.cancelled() => {
            conn.as_mut().graceful_shutdown();
            conn.await?;
        }
    }

    Ok(())
}

async fn handle_request(ctx: AppContext, conn_id: u64, token: CancellationToken, req: hyper::Request<Incoming>) -> Response<Full<Bytes>> {
    let request = match Request::read_from(req).await {
        Ok(request) => request,
        Err(e) => {
            warn!("bad request on connection {}: {}", conn_id, e);
            return Reply::error(StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };
    debug!("received: {} {}", request.method, request.path);

    let reply = match ctx.get_handler(&request) {
        Some(handler) => {
            let call = CallContext::with_token(token).timeout(ctx.request_timeout());
            let handle_ctx = HandleContext {
                app_context: ctx.clone(),
                conn_id,
                request: &request,
                call,
            };
            match handler.handle(&handle_ctx).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!("handler error: {:?}", e);
                    Reply::from_error(&e)
                }
            }
        }
        None => {
            debug!("no handler found for: {} {}", request.method, request.path);
            Reply::error(StatusCode::NOT_FOUND, "no handler found")
        }
    };

    reply.into_response()
}
