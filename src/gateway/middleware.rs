//! Middleware pipeline the admission filter plugs into.

use super::error::HttpResult;
use super::request::Request;
use super::response::Response;
use std::sync::Arc;

/// Action to take after a middleware processed a request.
#[derive(Debug)]
pub enum MiddlewareAction {
    /// Continue to the next middleware or the downstream handler.
    Continue(Request),
    /// Short-circuit with a response; downstream is never invoked.
    Respond(Response),
}

/// Trait for HTTP middleware.
pub trait Middleware: Send + Sync {
    /// Middleware name, used for diagnostics.
    fn name(&self) -> &str;

    /// Process a request before the downstream handler runs.
    fn before(&self, request: Request) -> HttpResult<MiddlewareAction> {
        Ok(MiddlewareAction::Continue(request))
    }

    /// Process a response after the downstream handler ran.
    fn after(&self, _request: &Request, response: Response) -> HttpResult<Response> {
        Ok(response)
    }

    /// Priority: higher runs first in `before`, last in `after`.
    fn priority(&self) -> i32 {
        0
    }
}

/// An ordered chain of middleware.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middleware: Vec<Arc<dyn Middleware>>,
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("middleware_count", &self.middleware.len())
            .finish()
    }
}

impl MiddlewareChain {
    /// Create a new empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add middleware, keeping the chain ordered by descending priority.
    pub fn add(&mut self, middleware: Arc<dyn Middleware>) {
        self.middleware.push(middleware);
        self.middleware
            .sort_by_key(|m| std::cmp::Reverse(m.priority()));
    }

    /// Run the request through the chain, stopping at the first `Respond`.
    pub fn process_request(&self, mut request: Request) -> HttpResult<MiddlewareAction> {
        for mw in &self.middleware {
            match mw.before(request)? {
                MiddlewareAction::Continue(req) => request = req,
                action @ MiddlewareAction::Respond(_) => return Ok(action),
            }
        }
        Ok(MiddlewareAction::Continue(request))
    }

    /// Run the response through the chain in reverse order.
    pub fn process_response(&self, request: &Request, mut response: Response) -> HttpResult<Response> {
        for mw in self.middleware.iter().rev() {
            response = mw.after(request, response)?;
        }
        Ok(response)
    }

    /// Number of middleware in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    /// Whether the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }
}
