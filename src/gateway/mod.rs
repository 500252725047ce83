//! # HTTP Hosting Surface
//!
//! A minimal HTTP/1.1 host the admission filter plugs into: request and
//! response types, a middleware pipeline with short-circuit semantics, and a
//! tokio-based server that runs the pipeline in front of a downstream
//! handler. Integrations embedding the filter in another runtime only need
//! the [`Middleware`] seam.

mod error;
mod middleware;
mod request;
mod response;
mod server;

pub use error::{HttpError, HttpResult};
pub use middleware::{Middleware, MiddlewareAction, MiddlewareChain};
pub use request::{Request, RequestBuilder};
pub use response::{Response, ResponseBuilder};
pub use server::{HttpServer, RequestHandler};
