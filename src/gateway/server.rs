//! Minimal HTTP/1.1 host for the middleware chain.

use super::error::{HttpError, HttpResult};
use super::middleware::{MiddlewareAction, MiddlewareChain};
use super::request::Request;
use super::response::Response;
use bytes::BytesMut;
use http::StatusCode;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

/// Upper bound on buffered request bytes before the head parses.
const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// How long a connection may sit idle between reads.
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// The downstream capability: produces a response for an admitted request.
pub trait RequestHandler: Send + Sync {
    /// Handle a request the middleware chain let through.
    fn handle(&self, request: &Request) -> HttpResult<Response>;
}

/// HTTP/1.1 server running a middleware chain in front of a handler.
///
/// The handler is required at construction, so a chain with no downstream
/// stage cannot be built. One tokio task is spawned per connection; the
/// middleware chain and handler are shared across tasks.
pub struct HttpServer {
    chain: Arc<MiddlewareChain>,
    handler: Arc<dyn RequestHandler>,
}

impl HttpServer {
    /// Create a server from a middleware chain and a downstream handler.
    #[must_use]
    pub fn new(chain: MiddlewareChain, handler: Arc<dyn RequestHandler>) -> Self {
        Self {
            chain: Arc::new(chain),
            handler,
        }
    }

    /// Bind the listen address and serve until the process exits.
    pub async fn run(self, listen: &str) -> HttpResult<()> {
        let addr: SocketAddr = listen
            .parse()
            .map_err(|_| HttpError::Config(format!("invalid listen address: {listen}")))?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already-bound listener.
    pub async fn serve(self, listener: TcpListener) -> HttpResult<()> {
        let local = listener.local_addr()?;
        info!(address = %local, "HTTP listener started");

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    debug!(peer = %peer, "new connection");
                    let chain = Arc::clone(&self.chain);
                    let handler = Arc::clone(&self.handler);
                    tokio::spawn(async move {
                        handle_connection(stream, peer, chain, handler).await;
                    });
                },
                Err(e) => {
                    warn!(error = %e, "accept error");
                },
            }
        }
    }
}

/// Read one request head, waiting for more bytes while the parse is partial.
///
/// `Ok(None)` means the client closed the connection cleanly between
/// requests.
async fn read_request(
    stream: &mut TcpStream,
    buf: &mut BytesMut,
) -> HttpResult<Option<(Request, usize)>> {
    loop {
        match Request::parse(buf) {
            Ok((request, offset)) => return Ok(Some((request, offset))),
            Err(HttpError::PartialRequest) => {
                if buf.len() >= MAX_REQUEST_BYTES {
                    return Err(HttpError::RequestTooLarge {
                        size: buf.len(),
                        max: MAX_REQUEST_BYTES,
                    });
                }
                let n = tokio::time::timeout(READ_TIMEOUT, stream.read_buf(buf))
                    .await
                    .map_err(|_| HttpError::Timeout("reading request".to_string()))??;
                if n == 0 {
                    if buf.is_empty() {
                        return Ok(None);
                    }
                    return Err(HttpError::Parse(
                        "connection closed mid-request".to_string(),
                    ));
                }
            },
            Err(e) => return Err(e),
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    chain: Arc<MiddlewareChain>,
    handler: Arc<dyn RequestHandler>,
) {
    let mut buf = BytesMut::with_capacity(8192);

    loop {
        let (mut request, offset) = match read_request(&mut stream, &mut buf).await {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return,
            Err(e) => {
                debug!(peer = %peer, error = %e, "failed to read request");
                let status = match e {
                    HttpError::RequestTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    _ => StatusCode::BAD_REQUEST,
                };
                let response = Response::builder()
                    .status(status)
                    .text(status.canonical_reason().unwrap_or("Bad Request"))
                    .build();
                let _ = stream.write_all(&response.serialize()).await;
                return;
            },
        };

        request.set_remote_addr(peer.to_string());
        let keep_alive = request.is_keep_alive();
        let consumed = (offset + request.content_length().unwrap_or(0)).min(buf.len());

        let response = match chain.process_request(request) {
            Ok(MiddlewareAction::Respond(response)) => response,
            Ok(MiddlewareAction::Continue(request)) => match handler.handle(&request) {
                Ok(response) => match chain.process_response(&request, response) {
                    Ok(response) => response,
                    Err(e) => {
                        error!(error = %e, "response middleware error");
                        Response::internal_error().text("Internal Server Error").build()
                    },
                },
                Err(e) => {
                    error!(error = %e, "handler error");
                    Response::internal_error().text("Internal Server Error").build()
                },
            },
            Err(e) => {
                error!(error = %e, "request middleware error");
                Response::internal_error().text("Internal Server Error").build()
            },
        };

        debug!(
            peer = %peer,
            status = %response.status().as_u16(),
            "request completed"
        );

        if stream.write_all(&response.serialize()).await.is_err() {
            return;
        }

        if !keep_alive {
            return;
        }

        // Drop the bytes of the request just answered; any body tail not yet
        // buffered will fail the next parse and close the connection.
        let _ = buf.split_to(consumed);
    }
}
