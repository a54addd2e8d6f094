use crate::kvs::Filter;

/// The rows covered by a scan or a delete.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RowRange {
	/// Every row in the table
	All,
	/// A single row
	Row(Vec<u8>),
	/// Every row starting with a prefix
	Prefix(Vec<u8>),
	/// Every row between two bounds, both inclusive
	Between(Vec<u8>, Vec<u8>),
}

impl RowRange {
	/// The first row bytes possibly covered by this range.
	pub(crate) fn start(&self) -> &[u8] {
		match self {
			RowRange::All => &[],
			RowRange::Row(row) => row,
			RowRange::Prefix(prefix) => prefix,
			RowRange::Between(start, _) => start,
		}
	}

	/// Check whether a row within an ordered walk is still covered.
	pub(crate) fn covers(&self, row: &[u8]) -> bool {
		match self {
			RowRange::All => true,
			RowRange::Row(want) => row == want.as_slice(),
			RowRange::Prefix(prefix) => row.starts_with(prefix),
			RowRange::Between(_, end) => row <= end.as_slice(),
		}
	}
}

/// A fetched column: a whole family, or one `(family, qualifier)` pair.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Column {
	pub family: Vec<u8>,
	pub qualifier: Option<Vec<u8>>,
}

impl Column {
	/// Fetch every qualifier of a column family.
	pub fn family(family: impl Into<Vec<u8>>) -> Column {
		Column {
			family: family.into(),
			qualifier: None,
		}
	}

	/// Fetch a single cell column.
	pub fn pair(family: impl Into<Vec<u8>>, qualifier: impl Into<Vec<u8>>) -> Column {
		Column {
			family: family.into(),
			qualifier: Some(qualifier.into()),
		}
	}

	/// Check whether a cell belongs to this column selection.
	pub(crate) fn matches(&self, family: &[u8], qualifier: &[u8]) -> bool {
		if self.family != family {
			return false;
		}
		match &self.qualifier {
			Some(want) => want.as_slice() == qualifier,
			None => true,
		}
	}
}

/// Which cell versions a scan returns.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Versions {
	/// Only the newest version passing the attached filters
	Latest,
	/// Every retained version passing the attached filters
	All,
}

/// A single-range scan over one table.
#[derive(Clone, Debug)]
pub struct Scan {
	pub table: String,
	pub range: RowRange,
	pub columns: Vec<Column>,
	pub filters: Vec<Filter>,
	pub versions: Versions,
	pub limit: Option<usize>,
}

impl Scan {
	/// Start a scan over every row of a table.
	pub fn table(table: impl Into<String>) -> Scan {
		Scan {
			table: table.into(),
			range: RowRange::All,
			columns: Vec::new(),
			filters: Vec::new(),
			versions: Versions::Latest,
			limit: None,
		}
	}

	pub fn with_range(mut self, range: RowRange) -> Scan {
		self.range = range;
		self
	}

	pub fn fetch_column(mut self, column: Column) -> Scan {
		self.columns.push(column);
		self
	}

	pub fn with_filter(mut self, filter: Filter) -> Scan {
		self.filters.push(filter);
		self
	}

	pub fn with_versions(mut self, versions: Versions) -> Scan {
		self.versions = versions;
		self
	}

	pub fn with_limit(mut self, limit: usize) -> Scan {
		self.limit = Some(limit);
		self
	}
}

/// A multi-range scan over one table.
#[derive(Clone, Debug)]
pub struct BatchScan {
	pub table: String,
	pub ranges: Vec<RowRange>,
	pub columns: Vec<Column>,
	pub filters: Vec<Filter>,
	pub versions: Versions,
	/// How many ranges the store may scan concurrently.
	pub threads: usize,
}

impl BatchScan {
	/// Start a batch scan over a set of row ranges.
	pub fn table(table: impl Into<String>, threads: usize) -> BatchScan {
		BatchScan {
			table: table.into(),
			ranges: Vec::new(),
			columns: Vec::new(),
			filters: Vec::new(),
			versions: Versions::Latest,
			threads: threads.max(1),
		}
	}

	pub fn with_range(mut self, range: RowRange) -> BatchScan {
		self.ranges.push(range);
		self
	}

	pub fn with_ranges(mut self, ranges: impl IntoIterator<Item = RowRange>) -> BatchScan {
		self.ranges.extend(ranges);
		self
	}

	pub fn fetch_column(mut self, column: Column) -> BatchScan {
		self.columns.push(column);
		self
	}

	pub fn with_filter(mut self, filter: Filter) -> BatchScan {
		self.filters.push(filter);
		self
	}

	pub fn with_versions(mut self, versions: Versions) -> BatchScan {
		self.versions = versions;
		self
	}
}
