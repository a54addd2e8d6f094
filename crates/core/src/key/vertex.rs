//! Stores vertex existence, adjacency and property cells
use crate::err::Error;
use crate::gph::Direction;
use crate::key::{self, Cell, FAMILY_IN, FAMILY_LABEL, FAMILY_OUT, QUALIFIER_EXISTS, SEPARATOR};
use crate::kvs::Entry;

/// The existence marker of a vertex row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Exists<'a> {
	pub id: &'a str,
}

impl<'a> Exists<'a> {
	pub fn new(id: &'a str) -> Self {
		Self {
			id,
		}
	}

	pub fn cell(&self) -> Cell {
		Cell::new(self.id.as_bytes(), FAMILY_LABEL, QUALIFIER_EXISTS)
	}

	/// Check whether an entry is a vertex existence marker.
	pub fn matches(entry: &Entry) -> bool {
		entry.family == FAMILY_LABEL && entry.qualifier == QUALIFIER_EXISTS
	}
}

/// An adjacency cell in a vertex row, encoding one incident edge.
///
/// The cell lives under the `I` family when the owning vertex is the in
/// side of the edge, and under the `O` family when it is the out side.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Adjacency<'a> {
	pub id: &'a str,
	pub dir: Direction,
	pub peer: &'a str,
	pub edge: &'a str,
}

impl<'a> Adjacency<'a> {
	pub fn new(id: &'a str, dir: Direction, peer: &'a str, edge: &'a str) -> Self {
		Self {
			id,
			dir,
			peer,
			edge,
		}
	}

	pub fn cell(&self) -> Cell {
		// Adjacency cells are directional, so Both never reaches a cell
		let family = match self.dir {
			Direction::In => FAMILY_IN,
			_ => FAMILY_OUT,
		};
		Cell::new(self.id.as_bytes(), family, key::join(self.peer, self.edge))
	}

	/// Encode the value carried by an adjacency cell.
	pub fn value(label: &str) -> Vec<u8> {
		let mut out = Vec::with_capacity(1 + label.len());
		out.push(SEPARATOR);
		out.extend_from_slice(label.as_bytes());
		out
	}
}

/// A decoded adjacency cell.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdjacencyRef {
	pub dir: Direction,
	pub peer: String,
	pub edge: String,
	pub label: String,
}

impl AdjacencyRef {
	/// Decode an adjacency entry scanned from a vertex row.
	pub fn decode(entry: &Entry) -> Result<AdjacencyRef, Error> {
		// Derive the direction from the column family
		let dir = match entry.family.as_slice() {
			f if f == FAMILY_IN => Direction::In,
			f if f == FAMILY_OUT => Direction::Out,
			_ => return Err(Error::Encoding("entry is not an adjacency cell".to_string())),
		};
		// The qualifier holds the peer vertex id and the edge id
		let (peer, edge) = key::split(&entry.qualifier)?;
		// The value holds the edge label behind a separator byte
		let label = match entry.value.split_first() {
			Some((sep, rest)) if *sep == SEPARATOR => String::from_utf8(rest.to_vec())?,
			_ => return Err(Error::Encoding("adjacency cell has no label".to_string())),
		};
		Ok(AdjacencyRef {
			dir,
			peer,
			edge,
			label,
		})
	}

	/// Check whether an entry belongs to an adjacency family.
	pub fn matches(entry: &Entry) -> bool {
		entry.family == FAMILY_IN || entry.family == FAMILY_OUT
	}
}

/// A property cell in a vertex row.
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
