//! Error and result types shared across the crate.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while negotiating and serializing responses
///
/// `Serialization` is the only recoverable variant during negotiation:
/// a writer returning it is treated as having declined the current
/// candidate, and negotiation moves on to the next one. Every other
/// variant aborts the request.
#[derive(Error, Debug)]
pub enum Error {
	/// A writer could not serialize the payload it was given
	#[error("serialization error: {0}")]
	Serialization(String),

	/// Invalid construction-time configuration, e.g. a forced format
	/// identifier unknown to the registry
	#[error("configuration error: {0}")]
	Configuration(String),

	/// Invalid HTTP header name or value
	#[error("http error: {0}")]
	Http(String),
}
