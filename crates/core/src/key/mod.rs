//! How the graph is laid out as cells in the key value store
///
/// crate::key::vertex::Exists           ({id}, L, E) -> ∅
/// crate::key::vertex::Adjacency        ({id}, I|O, {peer}_{edge}) -> _{label}
/// crate::key::vertex::Property         ({id}, {key}, ∅) -> encoded value
///
/// crate::key::edge::Label              ({id}, L, {in}_{out}) -> encoded label
/// crate::key::edge::Property           ({id}, {key}, ∅) -> encoded value
///
/// crate::key::index::Posting           ({encoded value}, {key}, {id}) -> ∅
///
/// crate::key::meta::IndexMeta          ({name}, Vertex|Edge, ∅) -> ∅
/// crate::key::meta::KeyMeta            ({key}, Vertex|Edge, ∅) -> ∅
///
pub mod edge;
pub mod index;
pub mod meta;
pub mod vertex;

use crate::err::Error;

/// The column family holding existence and label cells.
pub const FAMILY_LABEL: &[u8] = b"L";

/// The column family holding incoming adjacency cells.
pub const FAMILY_IN: &[u8] = b"I";

/// The column family holding outgoing adjacency cells.
pub const FAMILY_OUT: &[u8] = b"O";

/// The qualifier of the vertex existence marker.
pub const QUALIFIER_EXISTS: &[u8] = b"E";

/// The byte separating element ids inside qualifiers and values.
///
/// Element ids and edge labels are validated at the API boundary and never
/// contain this byte.
pub const SEPARATOR: u8 = b'_';

/// The coordinates of a single cell inside one table.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Cell {
	pub row: Vec<u8>,
	pub family: Vec<u8>,
	pub qualifier: Vec<u8>,
}

impl Cell {
	pub fn new(row: impl Into<Vec<u8>>, family: impl Into<Vec<u8>>, qualifier: impl Into<Vec<u8>>) -> Cell {
		Cell {
			row: row.into(),
			family: family.into(),
			qualifier: qualifier.into(),
		}
	}
}

/// Check whether a caller-supplied id or label collides with the separator.
pub fn contains_separator(v: &str) -> bool {
	v.as_bytes().contains(&SEPARATOR)
}

/// Join two element ids into a single qualifier.
pub(crate) fn join(a: &str, b: &str) -> Vec<u8> {
	let mut out = Vec::with_capacity(a.len() + 1 + b.len());
	out.extend_from_slice(a.as_bytes());
	out.push(SEPARATOR);
	out.extend_from_slice(b.as_bytes());
	out
}

/// Split a qualifier back into its two element ids.
pub(crate) fn split(bytes: &[u8]) -> Result<(String, String), Error> {
	// Find the separator between the two ids
	let pos = match bytes.iter().position(|b| *b == SEPARATOR) {
		Some(pos) => pos,
		None => return Err(Error::Encoding("qualifier has no separator".to_string())),
	};
	// Decode both sides as UTF-8 strings
	let a = String::from_utf8(bytes[..pos].to_vec())?;
	let b = String::from_utf8(bytes[pos + 1..].to_vec())?;
	Ok((a, b))
}
