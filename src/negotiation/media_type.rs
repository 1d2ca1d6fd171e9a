//! Media type parsing for Accept header entries

use std::collections::HashMap;
use std::fmt;

/// A parsed media range from an Accept header entry
///
/// Carries the base `type/subtype` (either side may be `*`), the ordered
/// list of non-quality parameters, and the quality weight the client
/// attached to the entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaType {
	/// Main type (e.g. "text"), lowercased; may be "*"
	pub main_type: String,
	/// Subtype (e.g. "turtle"), lowercased; may be "*"
	pub subtype: String,
	/// Non-quality parameters in the order they appeared
	pub params: Vec<(String, String)>,
	/// Quality weight, clamped to [0.0, 1.0]
	pub quality: f32,
}

impl MediaType {
	/// Creates a MediaType with quality 1.0 and no parameters
	///
	/// # Examples
	///
	/// ```
	/// use conneg::negotiation::MediaType;
	///
	/// let turtle = MediaType::new("text", "turtle");
	/// assert_eq!(turtle.main_type, "text");
	/// assert_eq!(turtle.subtype, "turtle");
	/// assert_eq!(turtle.quality, 1.0);
	/// assert!(turtle.params.is_empty());
	/// ```
	pub fn new(main_type: impl Into<String>, subtype: impl Into<String>) -> Self {
		Self {
			main_type: main_type.into(),
			subtype: subtype.into(),
			params: Vec::new(),
			quality: 1.0,
		}
	}

	/// Parses a single Accept header entry (e.g. `text/turtle;q=0.8`)
	///
	/// Returns `None` for entries without a parseable `type/subtype`
	/// token; such entries are dropped by the caller rather than raising.
	/// Parameter values lose one layer of matching double quotes. A `q`
	/// parameter becomes the quality weight, silently clamped to
	/// [0.0, 1.0]; unparseable q values leave the default of 1.0.
	///
	/// # Examples
	///
	/// ```
	/// use conneg::negotiation::MediaType;
	///
	/// let mt = MediaType::parse("text/turtle;q=0.8").unwrap();
	/// assert_eq!(mt.essence(), "text/turtle");
	/// assert_eq!(mt.quality, 0.8);
	///
	/// let ld = MediaType::parse(
	///     "application/ld+json;profile=\"http://www.w3.org/ns/json-ld#compacted\"",
	/// )
	/// .unwrap();
	/// assert_eq!(ld.params[0].0, "profile");
	/// assert_eq!(ld.params[0].1, "http://www.w3.org/ns/json-ld#compacted");
	///
	/// // Out-of-range weights are bounded, not rejected
	/// let loud = MediaType::parse("text/html;q=7").unwrap();
	/// assert_eq!(loud.quality, 1.0);
	///
	/// assert!(MediaType::parse("not a media type").is_none());
	/// ```
	pub fn parse(s: &str) -> Option<Self> {
		let mut parts = s.split(';');
		let base = parts.next()?.trim();
		let (main_type, subtype) = base.split_once('/')?;
		let main_type = main_type.trim().to_lowercase();
		let subtype = subtype.trim().to_lowercase();
		if !is_token(&main_type) || !is_token(&subtype) {
			return None;
		}

		let mut quality = 1.0_f32;
		let mut params = Vec::new();
		for param in parts {
			let Some((name, value)) = param.trim().split_once('=') else {
				continue;
			};
			let name = name.trim().to_lowercase();
			let value = unquote(value.trim());
			if name == "q" {
				if let Ok(q) = value.parse::<f32>()
					&& !q.is_nan()
				{
					quality = q.clamp(0.0, 1.0);
				}
			} else {
				params.push((name, value.to_string()));
			}
		}

		Some(Self {
			main_type,
			subtype,
			params,
			quality,
		})
	}

	/// Returns the bare `type/subtype` without parameters
	///
	/// # Examples
	///
	/// ```
	/// use conneg::negotiation::MediaType;
	///
	/// let mt = MediaType::parse("text/turtle;q=0.5").unwrap();
	/// assert_eq!(mt.essence(), "text/turtle");
	/// ```
	pub fn essence(&self) -> String {
		format!("{}/{}", self.main_type, self.subtype)
	}

	/// Number of `*` characters in the base type
	///
	/// Fewer wildcards means a more specific range; `*/*` counts 2.
	pub fn wildcard_count(&self) -> usize {
		self.main_type.matches('*').count() + self.subtype.matches('*').count()
	}

	/// True for the full wildcard range `*/*`
	pub fn is_any(&self) -> bool {
		self.main_type == "*" && self.subtype == "*"
	}

	/// True for a subtype wildcard such as `text/*`
	pub fn has_wildcard_subtype(&self) -> bool {
		self.main_type != "*" && self.subtype == "*"
	}

	/// Non-quality parameters as a map, for writer predicates and options
	///
	/// # Examples
	///
	/// ```
	/// use conneg::negotiation::MediaType;
	///
	/// let mt = MediaType::parse("application/ld+json;profile=x;ordered=true").unwrap();
	/// let params = mt.accept_params();
	/// assert_eq!(params.get("profile").map(String::as_str), Some("x"));
	/// assert_eq!(params.get("ordered").map(String::as_str), Some("true"));
	/// ```
	pub fn accept_params(&self) -> HashMap<String, String> {
		self.params.iter().cloned().collect()
	}

	/// Checks if this range matches a concrete media type
	///
	/// Wildcards on this side match anything at that position; every
	/// parameter of this range must be present on the concrete type.
	///
	/// # Examples
	///
	/// ```
	/// use conneg::negotiation::MediaType;
	///
	/// let any_text = MediaType::parse("text/*").unwrap();
	/// assert!(any_text.matches(&MediaType::new("text", "turtle")));
	/// assert!(!any_text.matches(&MediaType::new("application", "n-triples")));
	///
	/// let anything = MediaType::parse("*/*").unwrap();
	/// assert!(anything.matches(&MediaType::new("application", "n-triples")));
	/// ```
	pub fn matches(&self, other: &MediaType) -> bool {
		if self.main_type != "*" && self.main_type != other.main_type {
			return false;
		}
		if self.subtype != "*" && self.subtype != other.subtype {
			return false;
		}
		self.params
			.iter()
			.all(|(name, value)| other.params.iter().any(|(n, v)| n == name && v == value))
	}
}

/// Renders the range with its parameters but without the consumed q weight
impl fmt::Display for MediaType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.main_type, self.subtype)?;
		for (name, value) in &self.params {
			write!(f, ";{}={}", name, value)?;
		}
		Ok(())
	}
}

/// RFC 7231 token check; `*` is a valid tchar, which is what lets
/// wildcard ranges through. Nothing failing this check may reach a
/// response header value.
fn is_token(s: &str) -> bool {
	!s.is_empty() && s.bytes().all(is_tchar)
}

fn is_tchar(c: u8) -> bool {
	matches!(c,
		b'a'..=b'z'
		| b'0'..=b'9'
		| b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*'
		| b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~')
}

/// Strips one layer of matching double quotes
fn unquote(value: &str) -> &str {
	if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
		&value[1..value.len() - 1]
	} else {
		value
	}
}
