//! Stores edge label and property cells
use crate::err::Error;
use crate::key::{self, Cell, FAMILY_LABEL};
use crate::kvs::Entry;
use crate::val::Value;

/// The label cell of an edge row, carrying existence, endpoints and label.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Label<'a> {
	pub id: &'a str,
	pub in_vertex: &'a str,
	pub out_vertex: &'a str,
}

impl<'a> Label<'a> {
	pub fn new(id: &'a str, in_vertex: &'a str, out_vertex: &'a str) -> Self {
		Self {
			id,
			in_vertex,
			out_vertex,
		}
	}

	pub fn cell(&self) -> Cell {
		Cell::new(self.id.as_bytes(), FAMILY_LABEL, key::join(self.in_vertex, self.out_vertex))
	}

	/// Encode the value carried by a label cell.
	pub fn value(label: &str) -> Vec<u8> {
		Value::Str(label.to_string()).serialize()
	}

	/// Check whether an entry is an edge label cell.
	pub fn matches(entry: &Entry) -> bool {
		entry.family == FAMILY_LABEL
	}
}

/// A decoded edge label cell.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LabelRef {
	pub in_vertex: String,
	pub out_vertex: String,
	pub label: String,
}

impl LabelRef {
	/// Decode a label entry scanned from an edge row.
	pub fn decode(entry: &Entry) -> Result<LabelRef, Error> {
		// The qualifier holds both endpoint vertex ids
		let (in_vertex, out_vertex) = key::split(&entry.qualifier)?;
		// The value holds the encoded edge label
		let label = match Value::deserialize(&entry.value)? {
			Value::Str(label) => label,
			_ => return Err(Error::Encoding("edge label is not a string".to_string())),
		};
		Ok(LabelRef {
			in_vertex,
			out_vertex,
			label,
		})
	}
}

/// A property cell in an edge row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Property<'a> {
	pub id: &'a str,
	pub key: &'a str,
}

impl<'a> Property<'a> {
	pub fn new(id: &'a str, key: &'a str) -> Self {
		Self {
			id,
			key,
		}
	}

	pub fn cell(&self) -> Cell {
		Cell::new(self.id.as_bytes(), self.key.as_bytes(), Vec::new())
	}
}
