//! Scan-driven element reconstruction.
//!
//! Scans return cells in `(row, family, qualifier)` order, so all cells of
//! one element arrive contiguously. [`RowGroups`] regroups a scan result
//! into per-row bundles which are then decoded back into logical elements.
use crate::err::Error;
use crate::gph::{Edge, Vertex};
use crate::key::{edge, vertex, FAMILY_LABEL};
use crate::kvs::Entry;
use crate::val::Value;
use std::iter::Peekable;
use std::vec::IntoIter;

/// Groups ordered scan entries into contiguous row bundles.
pub(crate) struct RowGroups {
	entries: Peekable<IntoIter<Entry>>,
}

impl RowGroups {
	pub(crate) fn new(entries: Vec<Entry>) -> RowGroups {
		RowGroups {
			entries: entries.into_iter().peekable(),
		}
	}
}

impl Iterator for RowGroups {
	type Item = (Vec<u8>, Vec<Entry>);

	fn next(&mut self) -> Option<Self::Item> {
		// The first entry opens a new row group
		let first = self.entries.next()?;
		let row = first.row.clone();
		let mut cells = vec![first];
		// Take every further entry belonging to the same row
		while self.entries.peek().is_some_and(|e| e.row == row) {
			if let Some(entry) = self.entries.next() {
				cells.push(entry);
			}
		}
		Some((row, cells))
	}
}

/// Rebuild a vertex from the cells of its row.
///
/// Returns None when the row carries no existence marker, which is how an
/// absent vertex presents under a timestamp filter.
pub(crate) fn vertex_from_cells(id: &str, cells: &[Entry]) -> Result<Option<Vertex>, Error> {
	// Absence of the existence marker means absence of the vertex
	if !cells.iter().any(vertex::Exists::matches) {
		return Ok(None);
	}
	let mut out = Vertex::new(id);
	for cell in cells {
		// Skip the existence marker and the adjacency families
		if cell.is_family(FAMILY_LABEL) || vertex::AdjacencyRef::matches(cell) {
			continue;
		}
		// Property cells carry an empty qualifier
		if !cell.qualifier.is_empty() {
			continue;
		}
		let key = String::from_utf8(cell.family.clone())?;
		out.properties.insert(key, Value::deserialize(&cell.value)?);
	}
	Ok(Some(out))
}

/// Rebuild an edge from the cells of its row.
///
/// Returns None when the row carries no label cell.
pub(crate) fn edge_from_cells(id: &str, cells: &[Entry]) -> Result<Option<Edge>, Error> {
	// The label cell carries existence, endpoints and label
	let label = match cells.iter().find(|c| edge::Label::matches(c)) {
		Some(label) => edge::LabelRef::decode(label)?,
		None => return Ok(None),
	};
	let mut out = Edge::new(id, label.label, label.in_vertex, label.out_vertex);
	for cell in cells {
		if cell.is_family(FAMILY_LABEL) || !cell.qualifier.is_empty() {
			continue;
		}
		let key = String::from_utf8(cell.family.clone())?;
		out.properties.insert(key, Value::deserialize(&cell.value)?);
	}
	Ok(Some(out))
}
