//! HTTP content negotiation middleware.
//!
//! Handlers return structured payloads instead of bytes; this crate's
//! [`ContentNegotiationMiddleware`] picks the best serializer for each
//! request from the client's `Accept` header (or a forced format), writes
//! the body with it, and emits the negotiated `Content-Type` together
//! with `Vary: Accept`. Serializers implement the [`Format`] trait and
//! are collected in a [`FormatRegistry`]; requests no registered format
//! can satisfy get a `406 Not Acceptable`.
//!
//! See [`middleware`] for the selection rules and a complete example.

pub mod exception;
pub mod format;
pub mod formats;
pub mod http;
pub mod middleware;
pub mod negotiation;

pub use exception::{Error, Result};
pub use format::{AcceptParams, Format, FormatRegistry, WriteOptions};
pub use http::{Handler, Middleware, Request, Response, ResponseBody};
pub use middleware::{ContentNegotiationMiddleware, DEFAULT_MEDIA_TYPE, NegotiationConfig};
pub use negotiation::{AcceptHeader, MediaType};
