//! Stores secondary index postings
use crate::err::Error;
use crate::key::Cell;
use crate::kvs::Entry;

/// A posting cell mapping an encoded property value back to an element.
///
/// The row is the encoded property value, the family is the property key
/// and the qualifier is the element id, so a single-row scan enumerates
/// every element carrying a given value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Posting<'a> {
	pub value: &'a [u8],
	pub key: &'a str,
	pub element: &'a str,
}

impl<'a> Posting<'a> {
	pub fn new(value: &'a [u8], key: &'a str, element: &'a str) -> Self {
		Self {
			value,
			key,
			element,
		}
	}

	pub fn cell(&self) -> Cell {
		Cell::new(self.value, self.key.as_bytes(), self.element.as_bytes())
	}
}

/// A decoded posting cell.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PostingRef {
	pub value: Vec<u8>,
	pub key: String,
	pub element: String,
}

impl PostingRef {
	/// Decode a posting entry scanned from an index table.
	pub fn decode(entry: &Entry) -> Result<PostingRef, Error> {
		Ok(PostingRef {
			value: entry.row.clone(),
			key: String::from_utf8(entry.family.clone())?,
			element: String::from_utf8(entry.qualifier.clone())?,
		})
	}
}
