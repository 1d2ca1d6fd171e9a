use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::exception::{Error, Result};
use crate::format::{Format, WriteOptions};

/// Plain-text format
///
/// The out-of-the-box writer for the default `text/plain` media type.
/// String payloads are emitted verbatim; anything else is rendered as
/// compact JSON text.
#[derive(Debug, Clone, Default)]
pub struct TextFormat;

impl TextFormat {
	/// Creates a plain-text format
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl Format for TextFormat {
	fn media_types(&self) -> Vec<String> {
		vec!["text/plain".to_string()]
	}

	fn name(&self) -> &str {
		"text"
	}

	async fn write(&self, data: &Value, _options: &WriteOptions) -> Result<Bytes> {
		let text = match data {
			Value::String(s) => s.clone(),
			other => {
				serde_json::to_string(other).map_err(|e| Error::Serialization(e.to_string()))?
			}
		};

		Ok(Bytes::from(text))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[tokio::test]
	async fn test_text_format_string_verbatim() {
		let format = TextFormat::new();
		let data = json!("Hello, world!");

		let result = format.write(&data, &WriteOptions::new()).await.unwrap();
		assert_eq!(&result[..], b"Hello, world!");
	}

	#[tokio::test]
	async fn test_text_format_structured() {
		let format = TextFormat::new();
		let data = json!({"subject": "a", "predicate": "b"});

		let result = format.write(&data, &WriteOptions::new()).await.unwrap();
		let text = String::from_utf8(result.to_vec()).unwrap();
		assert!(text.contains("\"subject\""));
	}
}
