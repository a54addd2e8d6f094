use crate::kvs::{Filter, RowRange};

/// A ranged delete over one table.
///
/// The delete walks every covered cell, optionally restricted to a single
/// fetched column family and to cells passing the attached regex filters,
/// and removes each matched cell with all of its versions.
#[derive(Clone, Debug)]
pub struct BatchDelete {
	pub table: String,
	pub ranges: Vec<RowRange>,
	/// Restrict the delete to cells of this column family.
	pub fetch_family: Option<Vec<u8>>,
	pub filters: Vec<Filter>,
	/// How many ranges the store may process concurrently.
	pub threads: usize,
}

impl BatchDelete {
	/// Start a delete over a set of row ranges.
	pub fn table(table: impl Into<String>, threads: usize) -> BatchDelete {
		BatchDelete {
			table: table.into(),
			ranges: Vec::new(),
			fetch_family: None,
			filters: Vec::new(),
			threads: threads.max(1),
		}
	}

	pub fn with_range(mut self, range: RowRange) -> BatchDelete {
		self.ranges.push(range);
		self
	}

	pub fn with_ranges(mut self, ranges: impl IntoIterator<Item = RowRange>) -> BatchDelete {
		self.ranges.extend(ranges);
		self
	}

	pub fn with_fetch_family(mut self, family: impl Into<Vec<u8>>) -> BatchDelete {
		self.fetch_family = Some(family.into());
		self
	}

	pub fn with_filter(mut self, filter: Filter) -> BatchDelete {
		self.filters.push(filter);
		self
	}
}
