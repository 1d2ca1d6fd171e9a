//! Content negotiation middleware
//!
//! Wraps a handler and, when the downstream response carries a
//! structured payload, selects a serializer for it: the client's Accept
//! header is parsed into ranked media ranges, each range is resolved
//! against the format registry, and the first writer that succeeds
//! determines the response body and `Content-Type`. A writer that fails
//! with a serialization error only burns its own candidate; negotiation
//! moves on to the next one. When nothing resolves, the client gets a
//! `406 Not Acceptable`.
//!
//! # Selection priority
//!
//! 1. Forced format from [`NegotiationConfig::format`] (bypasses ranking)
//! 2. Ranked Accept header candidates, most preferred first
//! 3. The configured default media type when no Accept header is present
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use conneg::{ContentNegotiationMiddleware, FormatRegistry};
//! use conneg::formats::{JsonFormat, TextFormat};
//! use conneg::http::{Handler, Middleware, Request, Response};
//! use hyper::{Method, Uri, Version, HeaderMap, StatusCode};
//! use bytes::Bytes;
//! use serde_json::json;
//!
//! struct GraphHandler;
//!
//! #[async_trait::async_trait]
//! impl Handler for GraphHandler {
//!     async fn handle(&self, _request: Request) -> conneg::Result<Response> {
//!         Ok(Response::ok().with_data(json!({"title": "Hello, world!"})))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let registry = Arc::new(
//!     FormatRegistry::new()
//!         .register(TextFormat::new())
//!         .register(JsonFormat::new()),
//! );
//! let middleware = ContentNegotiationMiddleware::new(registry);
//! let handler = Arc::new(GraphHandler);
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(hyper::header::ACCEPT, "application/json".parse().unwrap());
//! let request = Request::new(
//!     Method::GET,
//!     Uri::from_static("/graph"),
//!     Version::HTTP_11,
//!     headers,
//!     Bytes::new(),
//! );
//!
//! let response = middleware.process(request, handler).await.unwrap();
//! assert_eq!(response.status, StatusCode::OK);
//! assert_eq!(
//!     response.headers.get("content-type").unwrap().to_str().unwrap(),
//!     "application/json"
//! );
//! assert_eq!(
//!     response.headers.get("vary").unwrap().to_str().unwrap(),
//!     "Accept"
//! );
//! # });
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use hyper::header::{ACCEPT, CONTENT_TYPE, HeaderValue, LINK, VARY};
use hyper::{HeaderMap, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::exception::{Error, Result};
use crate::format::{AcceptParams, Format, FormatRegistry, WriteOptions};
use crate::http::{Handler, Middleware, Request, Response, ResponseBody};
use crate::negotiation::{AcceptHeader, MediaType};

/// Media type used when the request carries no Accept header
pub const DEFAULT_MEDIA_TYPE: &str = "text/plain";

/// Configuration for [`ContentNegotiationMiddleware`]
#[derive(Debug, Clone)]
pub struct NegotiationConfig {
	/// Media type assumed when no Accept header is present; also the
	/// resolution target for a bare `*/*`
	pub default_media_type: String,
	/// Forced format identifier; when set, ranking is bypassed entirely
	pub format: Option<String>,
	/// Mapping for subtype wildcards, e.g. `"text/*"` → `"text/turtle"`.
	/// Unmapped wildcard subtypes resolve to no match.
	pub umbrella_types: HashMap<String, String>,
	/// Operator options forwarded to every writer
	pub writer_options: WriteOptions,
}

impl Default for NegotiationConfig {
	fn default() -> Self {
		Self {
			default_media_type: DEFAULT_MEDIA_TYPE.to_string(),
			format: None,
			umbrella_types: HashMap::new(),
			writer_options: WriteOptions::new(),
		}
	}
}

impl NegotiationConfig {
	/// Creates the default configuration
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the default media type
	///
	/// # Examples
	///
	/// ```
	/// use conneg::NegotiationConfig;
	///
	/// let config = NegotiationConfig::new().with_default_media_type("text/turtle");
	/// assert_eq!(config.default_media_type, "text/turtle");
	/// ```
	pub fn with_default_media_type(mut self, media_type: impl Into<String>) -> Self {
		self.default_media_type = media_type.into();
		self
	}

	/// Forces a format by identifier, bypassing Accept header ranking
	pub fn with_format(mut self, name: impl Into<String>) -> Self {
		self.format = Some(name.into());
		self
	}

	/// Maps a subtype wildcard range to a concrete media type
	///
	/// # Examples
	///
	/// ```
	/// use conneg::NegotiationConfig;
	///
	/// let config = NegotiationConfig::new().with_umbrella_type("text/*", "text/turtle");
	/// assert_eq!(
	///     config.umbrella_types.get("text/*").map(String::as_str),
	///     Some("text/turtle"),
	/// );
	/// ```
	pub fn with_umbrella_type(
		mut self,
		range: impl Into<String>,
		target: impl Into<String>,
	) -> Self {
		self.umbrella_types
			.insert(range.into().to_lowercase(), target.into());
		self
	}

	/// Sets the operator options forwarded to writers
	pub fn with_writer_options(mut self, options: WriteOptions) -> Self {
		self.writer_options = options;
		self
	}
}

/// Content negotiation middleware
///
/// Holds the immutable format registry and configuration; each request's
/// negotiation is an independent, pure computation over the two.
pub struct ContentNegotiationMiddleware {
	registry: Arc<FormatRegistry>,
	config: NegotiationConfig,
}

impl ContentNegotiationMiddleware {
	/// Creates a negotiator with the default configuration
	pub fn new(registry: Arc<FormatRegistry>) -> Self {
		Self {
			registry,
			config: NegotiationConfig::default(),
		}
	}

	/// Creates a negotiator with the given configuration
	///
	/// Fails fast on operator errors: a forced format unknown to the
	/// registry or an unparseable default media type.
	///
	/// # Examples
	///
	/// ```
	/// use std::sync::Arc;
	/// use conneg::{ContentNegotiationMiddleware, FormatRegistry, NegotiationConfig};
	/// use conneg::formats::JsonFormat;
	///
	/// let registry = Arc::new(FormatRegistry::new().register(JsonFormat::new()));
	///
	/// let ok = ContentNegotiationMiddleware::with_config(
	///     registry.clone(),
	///     NegotiationConfig::new().with_format("json"),
	/// );
	/// assert!(ok.is_ok());
	///
	/// let err = ContentNegotiationMiddleware::with_config(
	///     registry,
	///     NegotiationConfig::new().with_format("nquads"),
	/// );
	/// assert!(err.is_err());
	/// ```
	pub fn with_config(registry: Arc<FormatRegistry>, config: NegotiationConfig) -> Result<Self> {
		if let Some(name) = &config.format
			&& registry.by_name(name).is_none()
		{
			return Err(Error::Configuration(format!("unknown format: {name}")));
		}
		if MediaType::parse(&config.default_media_type).is_none() {
			return Err(Error::Configuration(format!(
				"invalid default media type: {}",
				config.default_media_type
			)));
		}
		Ok(Self { registry, config })
	}

	/// Ranked candidates for this request
	///
	/// An absent or blank Accept header yields exactly one candidate,
	/// the configured default. A present header that parses to nothing
	/// yields no candidates at all: the default rule only covers the
	/// no-header case.
	fn candidates(&self, accept: Option<&str>) -> Vec<MediaType> {
		match accept {
			Some(header) if !header.trim().is_empty() => AcceptHeader::parse(header).media_types,
			_ => MediaType::parse(&self.config.default_media_type)
				.into_iter()
				.collect(),
		}
	}

	/// Resolves one ranked candidate to a writer and the content type to emit
	fn resolve(&self, range: &MediaType) -> Option<(Arc<dyn Format>, String)> {
		if range.is_any() {
			let default = MediaType::parse(&self.config.default_media_type)?;
			return self.resolve_exact(&default.essence(), range);
		}
		if range.has_wildcard_subtype() {
			let target = self.config.umbrella_types.get(&range.essence())?;
			return self.resolve_exact(target, range);
		}
		self.resolve_exact(&range.essence(), range)
	}

	/// Exact registry lookup with the format's accepts-predicate applied
	///
	/// Several formats may advertise the same content type; the newest
	/// registration is asked first, and one declining the accept-params
	/// does not block the others.
	fn resolve_exact(&self, media_type: &str, range: &MediaType) -> Option<(Arc<dyn Format>, String)> {
		let params = range.accept_params();
		for format in self.registry.by_media_type(media_type) {
			if format.accepts(&params) {
				return Some((format, media_type.to_lowercase()));
			}
			debug!(
				media_type,
				format = format.name(),
				"format declined accept-params"
			);
		}
		None
	}

	/// Forced-format resolution: the first advertised content type is emitted
	fn resolve_forced(&self, name: &str) -> Option<(Arc<dyn Format>, String)> {
		let format = self.registry.by_name(name)?;
		let content_type = format.media_types().first()?.to_lowercase();
		Some((format, content_type))
	}

	fn writer_options(&self, accept_params: AcceptParams, link: Option<&str>) -> WriteOptions {
		let mut options = self.config.writer_options.clone();
		options.accept_params = accept_params;
		if let Some(link) = link {
			options.link = Some(link.to_string());
		}
		options
	}

	/// Serializes a negotiable payload, walking candidates until one writes
	async fn serialize(
		&self,
		status: StatusCode,
		headers: HeaderMap,
		data: &Value,
		accept: Option<&str>,
		link: Option<&str>,
	) -> Result<Response> {
		if let Some(name) = &self.config.format {
			if let Some((format, content_type)) = self.resolve_forced(name) {
				let options = self.writer_options(AcceptParams::new(), link);
				match format.write(data, &options).await {
					Ok(bytes) => return assemble(status, headers, &content_type, bytes),
					Err(Error::Serialization(reason)) => {
						debug!(format = name.as_str(), %reason, "forced format declined");
					}
					Err(err) => return Err(err),
				}
			}
			warn!(format = name.as_str(), "forced format unavailable, responding 406");
			return Ok(unacceptable());
		}

		for range in self.candidates(accept) {
			let Some((format, content_type)) = self.resolve(&range) else {
				debug!(candidate = %range, "no writer for candidate");
				continue;
			};
			let options = self.writer_options(range.accept_params(), link);
			match format.write(data, &options).await {
				Ok(bytes) => return assemble(status, headers, &content_type, bytes),
				Err(Error::Serialization(reason)) => {
					debug!(
						candidate = %range,
						format = format.name(),
						%reason,
						"writer declined, trying next candidate"
					);
				}
				Err(err) => return Err(err),
			}
		}

		warn!("no acceptable representation, responding 406");
		Ok(unacceptable())
	}
}

#[async_trait]
impl Middleware for ContentNegotiationMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let method = request.method.clone();
		let accept = request.header_str(ACCEPT).map(str::to_owned);
		let link = request.header_str(LINK).map(str::to_owned);

		let response = next.handle(request).await?;

		// Only read requests with a still-structured body are negotiated;
		// everything else passes through untouched.
		if method != Method::GET && method != Method::HEAD {
			return Ok(response);
		}
		let Response {
			status,
			headers,
			body,
		} = response;
		let data = match body {
			ResponseBody::Data(value) => value,
			concrete => {
				return Ok(Response {
					status,
					headers,
					body: concrete,
				});
			}
		};

		self.serialize(status, headers, &data, accept.as_deref(), link.as_deref())
			.await
	}
}

/// Success path: the negotiated Content-Type and `Vary: Accept` overwrite
/// whatever the handler set. The negotiated values win.
fn assemble(
	status: StatusCode,
	mut headers: HeaderMap,
	content_type: &str,
	bytes: Bytes,
) -> Result<Response> {
	let value = HeaderValue::from_str(content_type).map_err(|e| Error::Http(e.to_string()))?;
	headers.insert(CONTENT_TYPE, value);
	headers.insert(VARY, HeaderValue::from_static("Accept"));
	Ok(Response {
		status,
		headers,
		body: ResponseBody::Bytes(bytes),
	})
}

fn unacceptable() -> Response {
	let mut response = Response::not_acceptable()
		.with_body("Not Acceptable: no registered serializer matches the requested content types\n");
	response
		.headers
		.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
	response.headers.insert(VARY, HeaderValue::from_static("Accept"));
	response
}

#[cfg(test)]
mod tests {
	use super::*;
	use hyper::{Uri, Version};
	use serde_json::json;

	struct DataHandler;

	#[async_trait]
	impl Handler for DataHandler {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Ok(Response::ok().with_data(json!({"title": "Hello"})))
		}
	}

	struct BytesHandler;

	#[async_trait]
	impl Handler for BytesHandler {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Ok(Response::ok().with_body("A String"))
		}
	}

	struct FakeFormat {
		name: &'static str,
		media_type: &'static str,
		fail: bool,
	}

	#[async_trait]
	impl Format for FakeFormat {
		fn media_types(&self) -> Vec<String> {
			vec![self.media_type.to_string()]
		}

		fn name(&self) -> &str {
			self.name
		}

		async fn write(&self, _data: &Value, _options: &WriteOptions) -> Result<Bytes> {
			if self.fail {
				Err(Error::Serialization("broken writer".to_string()))
			} else {
				Ok(Bytes::from(self.name))
			}
		}
	}

	fn request(method: Method, accept: Option<&str>) -> Request {
		let mut headers = HeaderMap::new();
		if let Some(accept) = accept {
			headers.insert(ACCEPT, accept.parse().unwrap());
		}
		Request::new(
			method,
			Uri::from_static("/graph"),
			Version::HTTP_11,
			headers,
			Bytes::new(),
		)
	}

	fn registry() -> Arc<FormatRegistry> {
		Arc::new(
			FormatRegistry::new()
				.register(FakeFormat {
					name: "text",
					media_type: "text/plain",
					fail: false,
				})
				.register(FakeFormat {
					name: "turtle",
					media_type: "text/turtle",
					fail: false,
				}),
		)
	}

	#[tokio::test]
	async fn test_negotiates_exact_match() {
		let middleware = ContentNegotiationMiddleware::new(registry());
		let response = middleware
			.process(request(Method::GET, Some("text/turtle")), Arc::new(DataHandler))
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.headers.get(CONTENT_TYPE).unwrap(), "text/turtle");
		assert_eq!(response.headers.get(VARY).unwrap(), "Accept");
		assert_eq!(&response.body.as_bytes().unwrap()[..], b"turtle");
	}

	#[tokio::test]
	async fn test_no_accept_header_uses_default() {
		let middleware = ContentNegotiationMiddleware::new(registry());
		let response = middleware
			.process(request(Method::GET, None), Arc::new(DataHandler))
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.headers.get(CONTENT_TYPE).unwrap(), "text/plain");
	}

	#[tokio::test]
	async fn test_star_star_resolves_default() {
		let middleware = ContentNegotiationMiddleware::new(registry());
		let response = middleware
			.process(request(Method::GET, Some("*/*")), Arc::new(DataHandler))
			.await
			.unwrap();

		assert_eq!(response.headers.get(CONTENT_TYPE).unwrap(), "text/plain");
	}

	#[tokio::test]
	async fn test_unmatched_accept_responds_406() {
		let middleware = ContentNegotiationMiddleware::new(registry());
		let response = middleware
			.process(request(Method::GET, Some("image/png")), Arc::new(DataHandler))
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::NOT_ACCEPTABLE);
		assert_eq!(response.headers.get(VARY).unwrap(), "Accept");
		assert_eq!(response.headers.get(CONTENT_TYPE).unwrap(), "text/plain");
	}

	#[tokio::test]
	async fn test_non_read_method_passes_through() {
		let middleware = ContentNegotiationMiddleware::new(registry());
		let response = middleware
			.process(request(Method::POST, Some("text/turtle")), Arc::new(DataHandler))
			.await
			.unwrap();

		assert!(response.body.is_negotiable());
		assert!(response.headers.get(VARY).is_none());
	}

	#[tokio::test]
	async fn test_concrete_body_passes_through() {
		let middleware = ContentNegotiationMiddleware::new(registry());
		let response = middleware
			.process(request(Method::GET, Some("text/turtle")), Arc::new(BytesHandler))
			.await
			.unwrap();

		assert_eq!(&response.body.as_bytes().unwrap()[..], b"A String");
		assert!(response.headers.get(VARY).is_none());
	}

	#[tokio::test]
	async fn test_umbrella_type_mapping() {
		let registry = registry();
		let config = NegotiationConfig::new().with_umbrella_type("text/*", "text/turtle");
		let middleware = ContentNegotiationMiddleware::with_config(registry, config).unwrap();

		let response = middleware
			.process(request(Method::GET, Some("text/*")), Arc::new(DataHandler))
			.await
			.unwrap();
		assert_eq!(response.headers.get(CONTENT_TYPE).unwrap(), "text/turtle");
	}

	#[tokio::test]
	async fn test_unmapped_wildcard_subtype_is_no_match() {
		let middleware = ContentNegotiationMiddleware::new(registry());
		let response = middleware
			.process(request(Method::GET, Some("application/*")), Arc::new(DataHandler))
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::NOT_ACCEPTABLE);
	}
}
