//! Stores named-index and key-index registrations
use crate::err::Error;
use crate::gph::Kind;
use crate::key::Cell;
use crate::kvs::Entry;

/// The registration row of a named index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexMeta<'a> {
	pub name: &'a str,
	pub kind: Kind,
}

impl<'a> IndexMeta<'a> {
	pub fn new(name: &'a str, kind: Kind) -> Self {
		Self {
			name,
			kind,
		}
	}

	pub fn cell(&self) -> Cell {
		Cell::new(self.name.as_bytes(), self.kind.family(), Vec::new())
	}

	/// Decode a registration entry into its name and element kind.
	pub fn decode(entry: &Entry) -> Result<(String, Kind), Error> {
		let name = String::from_utf8(entry.row.clone())?;
		let kind = Kind::from_family(&entry.family)?;
		Ok((name, kind))
	}
}

/// The registration row of an indexed property key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyMeta<'a> {
	pub key: &'a str,
	pub kind: Kind,
}

impl<'a> KeyMeta<'a> {
	pub fn new(key: &'a str, kind: Kind) -> Self {
		Self {
			key,
			kind,
		}
	}

	pub fn cell(&self) -> Cell {
		Cell::new(self.key.as_bytes(), self.kind.family(), Vec::new())
	}

	/// Decode a registration entry into its property key and element kind.
	pub fn decode(entry: &Entry) -> Result<(String, Kind), Error> {
		let key = String::from_utf8(entry.row.clone())?;
		let kind = Kind::from_family(&entry.family)?;
		Ok((key, kind))
	}
}
