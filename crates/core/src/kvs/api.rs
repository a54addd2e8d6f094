use crate::err::Error;
use crate::key::Cell;
use crate::kvs::{BatchDelete, BatchScan, Scan};

/// The byte value stored in a cell.
pub type Val = Vec<u8>;

/// A single versioned cell returned by a scan.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
	pub row: Vec<u8>,
	pub family: Vec<u8>,
	pub qualifier: Vec<u8>,
	pub ts: u64,
	pub value: Val,
}

impl Entry {
	/// Check whether this entry belongs to a given column family.
	pub fn is_family(&self, family: &[u8]) -> bool {
		self.family == family
	}
}

/// A single buffered change to one cell.
///
/// When no timestamp is given the store assigns wall-clock time at apply.
/// A delete suppresses every version of the cell at or below its timestamp.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Mutation {
	Put {
		cell: Cell,
		ts: Option<u64>,
		value: Val,
	},
	Delete {
		cell: Cell,
		ts: Option<u64>,
	},
}

impl Mutation {
	pub fn put(cell: Cell, ts: Option<u64>, value: Val) -> Mutation {
		Mutation::Put {
			cell,
			ts,
			value,
		}
	}

	pub fn delete(cell: Cell, ts: Option<u64>) -> Mutation {
		Mutation::Delete {
			cell,
			ts,
		}
	}
}

/// The buffered mutations of one table, applied together.
#[derive(Clone, Debug)]
pub struct TableBatch {
	pub table: String,
	pub mutations: Vec<Mutation>,
}

/// Options used when creating a table.
#[derive(Clone, Debug)]
pub struct TableOptions {
	/// How many versions of a cell the table retains. Zero retains all.
	pub max_versions: u32,
	/// Row boundaries the store may use to pre-split the table.
	pub split_points: Vec<Vec<u8>>,
}

impl Default for TableOptions {
	fn default() -> Self {
		TableOptions {
			max_versions: crate::cnf::DEFAULT_MAX_VERSIONS,
			split_points: Vec::new(),
		}
	}
}

impl TableOptions {
	pub fn with_max_versions(mut self, max_versions: u32) -> Self {
		self.max_versions = max_versions;
		self
	}

	pub fn with_split_points(mut self, split_points: Vec<Vec<u8>>) -> Self {
		self.split_points = split_points;
		self
	}
}

/// The contract of the sorted key-value store the engine consumes.
///
/// Cells sort by `(row, family, qualifier)` with versions kept newest
/// first and truncated to the table's max-versions at write. Applying a
/// batch of mutations is atomic with respect to concurrent scans.
pub trait Store: Send + Sync + 'static {
	/// Create a table if it does not yet exist.
	fn create_table(&self, name: &str, opts: TableOptions) -> Result<(), Error>;

	/// Delete a table and all of its cells.
	fn delete_table(&self, name: &str) -> Result<(), Error>;

	/// Check whether a table exists.
	fn table_exists(&self, name: &str) -> Result<bool, Error>;

	/// List all tables held by the store.
	fn list_tables(&self) -> Result<Vec<String>, Error>;

	/// Add split points to an existing table.
	fn split_table(&self, name: &str, points: &[Vec<u8>]) -> Result<(), Error>;

	/// Run a single-range scan and return the matching entries in order.
	fn scan(&self, scan: &Scan) -> Result<Vec<Entry>, Error>;

	/// Run a multi-range scan. Entries carry no cross-range ordering guarantee.
	fn batch_scan(&self, scan: &BatchScan) -> Result<Vec<Entry>, Error>;

	/// Atomically apply buffered mutations across tables.
	fn apply(&self, batches: Vec<TableBatch>) -> Result<(), Error>;

	/// Delete every cell matched by the given ranges and filters.
	fn batch_delete(&self, delete: &BatchDelete) -> Result<u64, Error>;
}
