use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};

/// HTTP Request representation
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Request {
	/// Creates a new Request
	///
	/// # Examples
	///
	/// ```
	/// use conneg::http::Request;
	/// use hyper::{Method, Uri, Version, HeaderMap};
	/// use bytes::Bytes;
	///
	/// let request = Request::new(
	///     Method::GET,
	///     Uri::from_static("/graph"),
	///     Version::HTTP_11,
	///     HeaderMap::new(),
	///     Bytes::new(),
	/// );
	/// assert_eq!(request.method, Method::GET);
	/// assert_eq!(request.path(), "/graph");
	/// ```
	pub fn new(
		method: Method,
		uri: Uri,
		version: Version,
		headers: HeaderMap,
		body: Bytes,
	) -> Self {
		Self {
			method,
			uri,
			version,
			headers,
			body,
		}
	}

	/// Returns the path portion of the request URI
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Returns a header value as a string slice, if present and valid UTF-8
	///
	/// # Examples
	///
	/// ```
	/// use conneg::http::Request;
	/// use hyper::{Method, Uri, Version, HeaderMap};
	/// use bytes::Bytes;
	///
	/// let mut headers = HeaderMap::new();
	/// headers.insert(hyper::header::ACCEPT, "text/turtle".parse().unwrap());
	/// let request = Request::new(
	///     Method::GET,
	///     Uri::from_static("/graph"),
	///     Version::HTTP_11,
	///     headers,
	///     Bytes::new(),
	/// );
	///
	/// assert_eq!(request.header_str(hyper::header::ACCEPT), Some("text/turtle"));
	/// assert_eq!(request.header_str(hyper::header::LINK), None);
	/// ```
	pub fn header_str(&self, name: hyper::header::HeaderName) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_request_path() {
		let request = Request::new(
			Method::GET,
			Uri::from_static("/graph?format=json"),
			Version::HTTP_11,
			HeaderMap::new(),
			Bytes::new(),
		);
		assert_eq!(request.path(), "/graph");
	}
}
