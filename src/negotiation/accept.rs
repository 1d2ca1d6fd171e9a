//! Accept header parsing and ranking

use super::media_type::MediaType;

/// A parsed Accept header: media ranges ranked most preferred first
///
/// Ranking is by quality weight, then by specificity: fewer wildcard
/// characters in the base type, then more non-quality parameters. Entries
/// that tie on all three keys keep their original header order.
#[derive(Debug, Clone)]
pub struct AcceptHeader {
	pub media_types: Vec<MediaType>,
}

impl AcceptHeader {
	/// Parses an Accept header string into ranked media ranges
	///
	/// Malformed entries are dropped silently; an empty header yields an
	/// empty ranking (the no-Accept-header default is the caller's
	/// concern, not the parser's).
	///
	/// # Examples
	///
	/// ```
	/// use conneg::negotiation::AcceptHeader;
	///
	/// let accept = AcceptHeader::parse("text/turtle;q=0.5, application/n-triples");
	/// assert_eq!(accept.media_types.len(), 2);
	/// assert_eq!(accept.media_types[0].essence(), "application/n-triples");
	/// assert_eq!(accept.media_types[1].quality, 0.5);
	///
	/// // Specificity breaks quality ties: exact beats wildcard,
	/// // and more parameters beat fewer.
	/// let tied = AcceptHeader::parse("*/*, text/turtle, text/turtle;profile=x");
	/// assert_eq!(tied.media_types[0].to_string(), "text/turtle;profile=x");
	/// assert_eq!(tied.media_types[1].to_string(), "text/turtle");
	/// assert_eq!(tied.media_types[2].essence(), "*/*");
	/// ```
	pub fn parse(header: &str) -> Self {
		let mut media_types: Vec<MediaType> = header
			.split(',')
			.filter_map(|s| MediaType::parse(s.trim()))
			.collect();

		// Stable sort: ties keep the client's original order
		media_types.sort_by(|a, b| {
			b.quality
				.total_cmp(&a.quality)
				.then_with(|| a.wildcard_count().cmp(&b.wildcard_count()))
				.then_with(|| b.params.len().cmp(&a.params.len()))
		});

		Self { media_types }
	}

	/// Creates an empty AcceptHeader with no media ranges
	pub fn empty() -> Self {
		Self {
			media_types: Vec::new(),
		}
	}

	/// True when no entry survived parsing
	pub fn is_empty(&self) -> bool {
		self.media_types.is_empty()
	}

	/// Ranked content-type strings, parameters included, q consumed
	///
	/// # Examples
	///
	/// ```
	/// use conneg::negotiation::AcceptHeader;
	///
	/// let accept = AcceptHeader::parse(
	///     "application/ld+json, application/ld+json;profile=http://example.org/x",
	/// );
	/// assert_eq!(
	///     accept.candidates(),
	///     vec![
	///         "application/ld+json;profile=http://example.org/x".to_string(),
	///         "application/ld+json".to_string(),
	///     ],
	/// );
	/// ```
	pub fn candidates(&self) -> Vec<String> {
		self.media_types.iter().map(|mt| mt.to_string()).collect()
	}

	/// Finds the best matching media type from available options
	///
	/// Walks the ranked ranges and returns the first available type any
	/// of them matches.
	///
	/// # Examples
	///
	/// ```
	/// use conneg::negotiation::{AcceptHeader, MediaType};
	///
	/// let accept = AcceptHeader::parse("application/n-quads, text/*");
	/// let available = vec![
	///     MediaType::new("text", "turtle"),
	///     MediaType::new("application", "n-triples"),
	/// ];
	///
	/// let best = accept.find_best_match(&available).unwrap();
	/// assert_eq!(best.essence(), "text/turtle");
	///
	/// let none = AcceptHeader::parse("image/png");
	/// assert!(none.find_best_match(&available).is_none());
	/// ```
	pub fn find_best_match(&self, available: &[MediaType]) -> Option<MediaType> {
		for accepted in &self.media_types {
			for available_type in available {
				if accepted.matches(available_type) {
					return Some(available_type.clone());
				}
			}
		}
		None
	}
}
