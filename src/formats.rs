//! Reference [`Format`](crate::format::Format) implementations
//!
//! Real deployments register their own serializer suites; these two keep
//! the middleware usable out of the box and anchor the default
//! `text/plain` media type.

pub mod json;
pub mod text;

pub use json::JsonFormat;
pub use text::TextFormat;
