//! Minimal HTTP surface the negotiator plugs into
//!
//! Mirrors what a host framework supplies: a request, a response whose
//! body may still be a structured payload, and the handler/middleware
//! traits composing the two.

pub mod middleware;
pub mod request;
pub mod response;

pub use middleware::{Handler, Middleware};
pub use request::Request;
pub use response::{Response, ResponseBody};
