//! Property value encoding.
//!
//! Every persisted property value starts with a single tag byte describing
//! the form of the bytes which follow. All tags except [`TAG_OPAQUE`] encode
//! forms whose byte representation is stable for a given logical value, so
//! equality predicates can be pushed down to the store as literal regex
//! matches. Opaque values carry arbitrary serialized payloads and are never
//! regex-matchable.

use crate::err::Error;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Tag byte for boolean values.
pub const TAG_BOOL: u8 = b'b';
/// Tag byte for 64-bit signed integers.
pub const TAG_INT: u8 = b'i';
/// Tag byte for 64-bit floats.
pub const TAG_FLOAT: u8 = b'f';
/// Tag byte for UTF-8 strings.
pub const TAG_STRING: u8 = b's';
/// Tag byte reserved for opaque serialized payloads.
pub const TAG_OPAQUE: u8 = b'o';

/// A property value attached to a vertex or an edge.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Value {
	/// A boolean value
	Bool(bool),
	/// A 64-bit signed integer
	Int(i64),
	/// A 64-bit floating point number
	Float(f64),
	/// A UTF-8 string
	Str(String),
	/// An opaque serialized payload
	Bytes(Vec<u8>),
}

impl Value {
	/// Encode this value into its persisted byte form.
	pub fn serialize(&self) -> Vec<u8> {
		match self {
			Value::Bool(v) => vec![TAG_BOOL, u8::from(*v)],
			Value::Int(v) => {
				let mut out = Vec::with_capacity(9);
				out.push(TAG_INT);
				out.extend_from_slice(&v.to_be_bytes());
				out
			}
			Value::Float(v) => {
				let mut out = Vec::with_capacity(9);
				out.push(TAG_FLOAT);
				out.extend_from_slice(&v.to_bits().to_be_bytes());
				out
			}
			Value::Str(v) => {
				let mut out = Vec::with_capacity(1 + v.len());
				out.push(TAG_STRING);
				out.extend_from_slice(v.as_bytes());
				out
			}
			Value::Bytes(v) => {
				let mut out = Vec::with_capacity(1 + v.len());
				out.push(TAG_OPAQUE);
				out.extend_from_slice(v);
				out
			}
		}
	}

	/// Decode a value from its persisted byte form.
	pub fn deserialize(bytes: &[u8]) -> Result<Value, Error> {
		// A property cell with no bytes at all carries no value
		let (tag, rest) = match bytes.split_first() {
			Some(v) => v,
			None => return Err(Error::NullProperty),
		};
		// Decode the remaining bytes according to the tag
		match *tag {
			TAG_BOOL => match rest {
				[0] => Ok(Value::Bool(false)),
				[1] => Ok(Value::Bool(true)),
				_ => Err(Error::Encoding("invalid boolean value".to_string())),
			},
			TAG_INT => match <[u8; 8]>::try_from(rest) {
				Ok(v) => Ok(Value::Int(i64::from_be_bytes(v))),
				Err(_) => Err(Error::Encoding("invalid integer value".to_string())),
			},
			TAG_FLOAT => match <[u8; 8]>::try_from(rest) {
				Ok(v) => Ok(Value::Float(f64::from_bits(u64::from_be_bytes(v)))),
				Err(_) => Err(Error::Encoding("invalid float value".to_string())),
			},
			TAG_STRING => Ok(Value::Str(String::from_utf8(rest.to_vec())?)),
			TAG_OPAQUE => Ok(Value::Bytes(rest.to_vec())),
			_ => Err(Error::Encoding(format!("unknown value tag {tag:#04x}"))),
		}
	}

	/// Check whether encoded value bytes are safe to match with a literal regex.
	pub fn is_regex_safe(bytes: &[u8]) -> bool {
		matches!(bytes.first(), Some(tag) if *tag != TAG_OPAQUE)
	}

	/// Pack an arbitrary serializable payload into an opaque value.
	pub fn from_serialize<T: Serialize>(value: &T) -> Result<Value, Error> {
		Ok(Value::Bytes(bincode::serialize(value)?))
	}

	/// Unpack an opaque value into a deserializable payload.
	pub fn to_deserialize<T: DeserializeOwned>(&self) -> Result<T, Error> {
		match self {
			Value::Bytes(v) => Ok(bincode::deserialize(v)?),
			_ => Err(Error::Encoding("value is not an opaque payload".to_string())),
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Bool(v) => write!(f, "{v}"),
			Value::Int(v) => write!(f, "{v}"),
			Value::Float(v) => write!(f, "{v}"),
			Value::Str(v) => write!(f, "{v}"),
			Value::Bytes(v) => write!(f, "<{} opaque bytes>", v.len()),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Value {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Value {
		Value::Int(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Value {
		Value::Int(v as i64)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Value {
		Value::Float(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Value {
		Value::Str(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Value {
		Value::Str(v)
	}
}

impl From<Vec<u8>> for Value {
	fn from(v: Vec<u8>) -> Value {
		Value::Bytes(v)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn roundtrip() {
		let vals = vec![
			Value::Bool(true),
			Value::Bool(false),
			Value::Int(0),
			Value::Int(-42),
			Value::Int(i64::MAX),
			Value::Float(3.25),
			Value::Float(f64::MIN_POSITIVE),
			Value::Str(String::new()),
			Value::Str("hello".to_string()),
			Value::Bytes(vec![0x00, 0xff, 0x55]),
		];
		for val in vals {
			let enc = val.serialize();
			let dec = Value::deserialize(&enc).unwrap();
			assert_eq!(val, dec);
		}
	}

	#[test]
	fn regex_safety() {
		assert!(Value::is_regex_safe(&Value::Str("x".to_string()).serialize()));
		assert!(Value::is_regex_safe(&Value::Int(7).serialize()));
		assert!(Value::is_regex_safe(&Value::Bool(true).serialize()));
		assert!(Value::is_regex_safe(&Value::Float(1.5).serialize()));
		assert!(!Value::is_regex_safe(&Value::Bytes(vec![1, 2]).serialize()));
		assert!(!Value::is_regex_safe(&[]));
	}

	#[test]
	fn empty_cell_is_null() {
		assert!(matches!(Value::deserialize(&[]), Err(Error::NullProperty)));
	}

	#[test]
	fn opaque_payload() {
		let val = Value::from_serialize(&vec![1u32, 2, 3]).unwrap();
		assert!(matches!(val, Value::Bytes(_)));
		let out: Vec<u32> = val.to_deserialize().unwrap();
		assert_eq!(out, vec![1, 2, 3]);
	}

	#[test]
	fn unknown_tag() {
		assert!(matches!(Value::deserialize(&[0x7f, 1]), Err(Error::Encoding(_))));
	}
}
