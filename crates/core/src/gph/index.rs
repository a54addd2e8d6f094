//! The named-index handle.
//!
//! A named index is a manually maintained secondary mapping backed by its
//! own table. The graph never updates it on property writes; callers put
//! and remove entries through this handle, and element removal sweeps the
//! element out of every named index of its kind.
use crate::err::Error;
use crate::gph::{check_id, check_key, normalize, Inner, Kind};
use crate::key::index::Posting;
use crate::kvs::{Column, Mutation, RowRange, Scan};
use crate::val::Value;
use std::sync::Arc;

/// A handle on one named index.
pub struct Index {
	inner: Arc<Inner>,
	name: String,
	kind: Kind,
	table: String,
}

impl Index {
	pub(crate) fn new(inner: Arc<Inner>, name: String, kind: Kind, table: String) -> Index {
		Index {
			inner,
			name,
			kind,
			table,
		}
	}

	/// The name this index was created under.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The kind of element this index stores.
	pub fn kind(&self) -> Kind {
		self.kind
	}

	/// The backing table of this index.
	pub(crate) fn table(&self) -> &str {
		&self.table
	}

	/// Add an element under a key and value.
	pub fn put(&self, key: &str, value: &Value, element: &str, ts: Option<u64>) -> Result<(), Error> {
		check_key(key)?;
		check_id(element)?;
		let ts = normalize(ts);
		let encoded = value.serialize();
		// Write the posting cell to the backing table
		let cell = Posting::new(&encoded, key, element).cell();
		self.inner.writer.add(&self.table, Mutation::put(cell, ts, Vec::new()))?;
		self.inner.maybe_flush()
	}

	/// Every element id stored under a key and value.
	pub fn get(&self, key: &str, value: &Value) -> Result<Vec<String>, Error> {
		check_key(key)?;
		let encoded = value.serialize();
		// A single-row scan enumerates the postings of this value
		let scan = Scan::table(self.table.as_str())
			.with_range(RowRange::Row(encoded))
			.fetch_column(Column::family(key));
		let mut out = Vec::new();
		for entry in self.inner.store.scan(&scan)? {
			out.push(String::from_utf8(entry.qualifier)?);
		}
		Ok(out)
	}

	/// How many elements are stored under a key and value.
	pub fn count(&self, key: &str, value: &Value) -> Result<u64, Error> {
		Ok(self.get(key, value)?.len() as u64)
	}

	/// Remove an element from under a key and value.
	pub fn remove(&self, key: &str, value: &Value, element: &str, ts: Option<u64>) -> Result<(), Error> {
		check_key(key)?;
		check_id(element)?;
		let ts = normalize(ts);
		let encoded = value.serialize();
		let cell = Posting::new(&encoded, key, element).cell();
		self.inner.writer.add(&self.table, Mutation::delete(cell, ts))?;
		self.inner.maybe_flush()
	}
}
