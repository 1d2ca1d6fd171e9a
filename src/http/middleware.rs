//! Handler and middleware traits for HTTP request processing.
//!
//! The `Handler` trait is the core abstraction for producing responses;
//! middleware wraps handlers to add cross-cutting concerns such as
//! content negotiation.

use async_trait::async_trait;
use std::sync::Arc;

use crate::exception::Result;
use crate::http::{Request, Response};

/// Handler trait for processing requests.
///
/// # Examples
///
/// ```
/// use conneg::http::{Handler, Request, Response};
/// use async_trait::async_trait;
///
/// struct HelloHandler;
///
/// #[async_trait]
/// impl Handler for HelloHandler {
///     async fn handle(&self, _request: Request) -> conneg::Result<Response> {
///         Ok(Response::ok().with_body("Hello!"))
///     }
/// }
/// ```
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles an HTTP request and produces a response.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed.
	async fn handle(&self, request: Request) -> Result<Response>;
}

/// Blanket implementation for `Arc<T>` where T: Handler.
///
/// This allows `Arc<dyn Handler>` to be used as a Handler,
/// enabling shared ownership of handlers across threads.
#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Middleware trait for request/response processing.
///
/// Middleware can modify requests before passing to the next handler,
/// or modify responses after the handler processes the request.
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Processes a request through this middleware.
	///
	/// # Arguments
	///
	/// * `request` - The incoming HTTP request
	/// * `next` - The next handler in the chain to call
	///
	/// # Errors
	///
	/// Returns an error if the middleware or next handler fails.
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;
}
