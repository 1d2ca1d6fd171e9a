//! Serializer formats and the registry the negotiator resolves against

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::exception::Result;

/// Non-quality parameters from a matched media range
pub type AcceptParams = HashMap<String, String>;

/// Options forwarded to a format's writer
///
/// `accept_params` and `link` are injected per request by the negotiator;
/// `extra` is the operator-supplied pass-through bag configured once at
/// setup.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
	/// Parameters of the media range that selected the writer, minus q
	pub accept_params: AcceptParams,
	/// Raw `Link` request header, forwarded verbatim
	pub link: Option<String>,
	/// Operator-configured pass-through options
	pub extra: HashMap<String, String>,
}

impl WriteOptions {
	/// Creates empty options
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the forwarded `Link` header value
	pub fn with_link(mut self, link: impl Into<String>) -> Self {
		self.link = Some(link.into());
		self
	}

	/// Sets the accept-params map
	pub fn with_accept_params(mut self, params: AcceptParams) -> Self {
		self.accept_params = params;
		self
	}

	/// Adds one operator pass-through option
	///
	/// # Examples
	///
	/// ```
	/// use conneg::format::WriteOptions;
	///
	/// let options = WriteOptions::new().with_option("standard_prefixes", "true");
	/// assert_eq!(
	///     options.extra.get("standard_prefixes").map(String::as_str),
	///     Some("true"),
	/// );
	/// ```
	pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra.insert(key.into(), value.into());
		self
	}
}

/// A serializer capable of producing one or more content types
///
/// Implementations serialize a structured payload to bytes. A format may
/// decline a match up front via [`accepts`](Format::accepts) (e.g. when
/// the range carries a `profile` parameter it does not support) and may
/// still decline at write time by returning
/// [`Error::Serialization`](crate::Error::Serialization), which sends the
/// negotiator on to the next candidate instead of failing the request.
#[async_trait]
pub trait Format: Send + Sync {
	/// Content types this format can produce, preferred first
	///
	/// The first entry is the `Content-Type` emitted when the format is
	/// forced by name rather than negotiated.
	fn media_types(&self) -> Vec<String>;

	/// Short identifier used for forced-format lookup (e.g. "json")
	fn name(&self) -> &str;

	/// Whether this format accepts a match carrying these accept-params
	fn accepts(&self, _params: &AcceptParams) -> bool {
		true
	}

	/// Serializes the payload to bytes
	async fn write(&self, data: &Value, options: &WriteOptions) -> Result<Bytes>;
}

/// Registry of available formats
///
/// Lookups scan most recently registered first, so when several formats
/// advertise the same content type the last one registered wins.
/// Registration order is the priority order: register the preferred
/// format last.
///
/// # Examples
///
/// ```
/// use conneg::format::FormatRegistry;
/// use conneg::formats::{JsonFormat, TextFormat};
///
/// let registry = FormatRegistry::new()
///     .register(TextFormat::new())
///     .register(JsonFormat::new());
///
/// assert_eq!(registry.len(), 2);
/// assert!(registry.by_name("json").is_some());
/// assert!(registry.by_media_type("application/json").len() == 1);
/// assert!(registry.by_media_type("application/pdf").is_empty());
/// ```
#[derive(Clone, Default)]
pub struct FormatRegistry {
	formats: Vec<Arc<dyn Format>>,
}

impl FormatRegistry {
	/// Creates an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a format, giving it priority over earlier registrations
	pub fn register(mut self, format: impl Format + 'static) -> Self {
		self.formats.push(Arc::new(format));
		self
	}

	/// All formats advertising the given content type, newest first
	pub fn by_media_type(&self, media_type: &str) -> Vec<Arc<dyn Format>> {
		let wanted = media_type.to_lowercase();
		self.formats
			.iter()
			.rev()
			.filter(|f| f.media_types().iter().any(|mt| mt.to_lowercase() == wanted))
			.cloned()
			.collect()
	}

	/// Looks a format up by its short identifier, newest first
	pub fn by_name(&self, name: &str) -> Option<Arc<dyn Format>> {
		self.formats.iter().rev().find(|f| f.name() == name).cloned()
	}

	/// Number of registered formats
	pub fn len(&self) -> usize {
		self.formats.len()
	}

	/// True when nothing has been registered
	pub fn is_empty(&self) -> bool {
		self.formats.is_empty()
	}
}
