//! Output formatting

use calldata_abi::Token;
use calldata_crypto::to_checksum;
use serde_json::{json, Map, Value};

/// Output builder for formatted CLI output
pub struct Output {
    json_mode: bool,
    fields: Map<String, Value>,
    message: Option<String>,
}

impl Output {
    /// Create a new output builder
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: Map::new(),
            message: None,
        }
    }

    /// Add a string field to the output
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add a u64 field to the output
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), Value::Number(value.into()));
        self
    }

    /// Add a JSON value field to the output
    pub fn field_value(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Set the human-readable message
    pub fn message(mut self, msg: &str) -> Self {
        self.message = Some(msg.to_string());
        self
    }

    /// Print the output
    pub fn print(self) {
        if self.json_mode {
            let json = json!(self.fields);
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        } else if let Some(msg) = self.message {
            println!("{}", msg);
        }
    }
}

/// JSON rendering of a decoded value
///
/// Integers become decimal strings so 256-bit values survive JSON readers.
pub fn token_to_json(token: &Token) -> Value {
    match token {
        Token::Address(addr) => Value::String(to_checksum(addr)),
        Token::Uint(value) => Value::String(value.to_string()),
        Token::Int(value) => Value::String(value.to_string()),
        Token::Bool(b) => Value::Bool(*b),
        Token::Bytes(data) | Token::FixedBytes(data) => Value::String(format!("0x{}", hex::encode(data))),
        Token::String(s) => Value::String(s.clone()),
        Token::Array(items) | Token::FixedArray(items) | Token::Tuple(items) => {
            Value::Array(items.iter().map(token_to_json).collect())
        }
    }
}
