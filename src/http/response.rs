use bytes::Bytes;
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::exception::Error;

/// Response body: either concrete bytes or a structured payload that is
/// still awaiting content negotiation
///
/// The negotiator only touches responses carrying [`ResponseBody::Data`];
/// everything else passes through the middleware untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
	/// Already-serialized bytes, passed through unchanged
	Bytes(Bytes),
	/// Structured payload to be serialized by a negotiated format
	Data(Value),
}

impl ResponseBody {
	/// True when the body is a structured payload awaiting negotiation
	pub fn is_negotiable(&self) -> bool {
		matches!(self, ResponseBody::Data(_))
	}

	/// The concrete bytes, if the body has any
	pub fn as_bytes(&self) -> Option<&Bytes> {
		match self {
			ResponseBody::Bytes(bytes) => Some(bytes),
			ResponseBody::Data(_) => None,
		}
	}
}

impl Default for ResponseBody {
	fn default() -> Self {
		ResponseBody::Bytes(Bytes::new())
	}
}

/// HTTP Response representation
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: ResponseBody,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use conneg::http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(!response.body.is_negotiable());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: ResponseBody::default(),
		}
	}

	/// Create a Response with HTTP 200 OK status
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// Create a Response with HTTP 406 Not Acceptable status
	pub fn not_acceptable() -> Self {
		Self::new(StatusCode::NOT_ACCEPTABLE)
	}

	/// Set a concrete byte body
	///
	/// # Examples
	///
	/// ```
	/// use conneg::http::Response;
	///
	/// let response = Response::ok().with_body("plain bytes");
	/// assert_eq!(&response.body.as_bytes().unwrap()[..], b"plain bytes");
	/// ```
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = ResponseBody::Bytes(body.into());
		self
	}

	/// Set a structured payload, marking the response negotiable
	///
	/// # Examples
	///
	/// ```
	/// use conneg::http::Response;
	/// use serde_json::json;
	///
	/// let response = Response::ok().with_data(json!({"title": "Hello, world!"}));
	/// assert!(response.body.is_negotiable());
	/// ```
	pub fn with_data(mut self, data: Value) -> Self {
		self.body = ResponseBody::Data(data);
		self
	}

	/// Set a structured payload from any serializable value
	///
	/// The body becomes negotiable; the Content-Type is chosen later by
	/// the negotiator, not here.
	///
	/// # Examples
	///
	/// ```
	/// use conneg::http::Response;
	/// use serde::Serialize;
	///
	/// #[derive(Serialize)]
	/// struct Statement {
	///     subject: String,
	/// }
	///
	/// let response = Response::ok()
	///     .with_json(&Statement { subject: "a".to_string() })
	///     .unwrap();
	/// assert!(response.body.is_negotiable());
	/// ```
	pub fn with_json<T: Serialize>(mut self, data: &T) -> crate::Result<Self> {
		let value = serde_json::to_value(data).map_err(|e| Error::Serialization(e.to_string()))?;
		self.body = ResponseBody::Data(value);
		Ok(self)
	}

	/// Add a custom header to the response
	///
	/// Invalid header names or values are silently dropped.
	///
	/// # Examples
	///
	/// ```
	/// use conneg::http::Response;
	///
	/// let response = Response::ok().with_header("Vary", "Accept");
	/// assert_eq!(
	///     response.headers.get("vary").unwrap().to_str().unwrap(),
	///     "Accept"
	/// );
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = hyper::header::HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = hyper::header::HeaderValue::from_str(value)
		{
			self.headers.insert(header_name, header_value);
		}
		self
	}
}
