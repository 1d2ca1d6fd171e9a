use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::exception::{Error, Result};
use crate::format::{Format, WriteOptions};

/// JSON format
///
/// Serializes the structured payload as `application/json`.
#[derive(Debug, Clone, Default)]
pub struct JsonFormat {
	/// Whether to pretty-print the output
	pub pretty: bool,
}

impl JsonFormat {
	/// Creates a JSON format with compact output
	///
	/// # Examples
	///
	/// ```
	/// use conneg::formats::JsonFormat;
	///
	/// let format = JsonFormat::new();
	/// assert!(!format.pretty);
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets pretty-printing
	pub fn pretty(mut self, pretty: bool) -> Self {
		self.pretty = pretty;
		self
	}
}

#[async_trait]
impl Format for JsonFormat {
	fn media_types(&self) -> Vec<String> {
		vec!["application/json".to_string()]
	}

	fn name(&self) -> &str {
		"json"
	}

	async fn write(&self, data: &Value, _options: &WriteOptions) -> Result<Bytes> {
		let bytes = if self.pretty {
			serde_json::to_vec_pretty(data)
		} else {
			serde_json::to_vec(data)
		}
		.map_err(|e| Error::Serialization(e.to_string()))?;

		Ok(Bytes::from(bytes))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[tokio::test]
	async fn test_json_format_compact() {
		let format = JsonFormat::new();
		let data = json!({"name": "test", "value": 123});

		let result = format.write(&data, &WriteOptions::new()).await.unwrap();
		let text = String::from_utf8(result.to_vec()).unwrap();

		assert_eq!(text, r#"{"name":"test","value":123}"#);
	}

	#[tokio::test]
	async fn test_json_format_pretty() {
		let format = JsonFormat::new().pretty(true);
		let data = json!({"name": "test"});

		let result = format.write(&data, &WriteOptions::new()).await.unwrap();
		let text = String::from_utf8(result.to_vec()).unwrap();

		assert!(text.contains('\n'));
		assert!(text.contains("\"name\": \"test\""));
	}
}
