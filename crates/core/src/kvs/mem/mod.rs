//! The built-in in-memory sorted key value store.
//!
//! Cells are held in one ordered map per table, keyed by
//! `(row, family, qualifier)` with versions kept newest first. The store
//! assigns strictly monotonic wall-clock millisecond timestamps to
//! mutations which carry none, so writes landing in the same millisecond
//! keep their order under max-versions truncation.
use crate::err::Error;
use crate::key::Cell;
use crate::kvs::{
	BatchDelete, BatchScan, Column, Entry, Filter, Mutation, RowRange, Scan, Store, TableBatch,
	TableOptions, Val, Versions,
};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::time::{SystemTime, UNIX_EPOCH};

/// One retained version of a cell.
struct Version {
	ts: u64,
	value: Val,
}

/// The versions of a single cell, newest first.
#[derive(Default)]
struct VersionList {
	versions: Vec<Version>,
}

impl VersionList {
	/// Insert a version, replacing any version with the same timestamp.
	fn put(&mut self, ts: u64, value: Val, max_versions: u32) {
		match self.versions.iter().position(|v| v.ts <= ts) {
			Some(pos) if self.versions[pos].ts == ts => self.versions[pos].value = value,
			Some(pos) => self.versions.insert(
				pos,
				Version {
					ts,
					value,
				},
			),
			None => self.versions.push(Version {
				ts,
				value,
			}),
		}
		// Retain only the newest versions the table is configured to keep
		if max_versions > 0 {
			self.versions.truncate(max_versions as usize);
		}
	}

	/// Suppress every version at or below the delete timestamp.
	fn delete(&mut self, ts: u64) {
		self.versions.retain(|v| v.ts > ts);
	}

	fn is_empty(&self) -> bool {
		self.versions.is_empty()
	}
}

/// A single sorted table of versioned cells.
struct Table {
	cells: BTreeMap<Cell, VersionList>,
	opts: TableOptions,
}

/// The in-memory store.
pub struct Memory {
	/// All tables held by the store
	tables: DashMap<String, RwLock<Table>>,
	/// Serializes batch applies against concurrent scans
	guard: RwLock<()>,
	/// The last timestamp handed out by the store clock
	clock: Mutex<u64>,
}

impl Default for Memory {
	fn default() -> Self {
		Memory::new()
	}
}

impl Memory {
	/// Open a new empty store.
	pub fn new() -> Memory {
		Memory {
			tables: DashMap::new(),
			guard: RwLock::new(()),
			clock: Mutex::new(0),
		}
	}

	/// Produce a strictly monotonic wall-clock millisecond timestamp.
	fn now(&self) -> u64 {
		let wall = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map(|d| d.as_millis() as u64)
			.unwrap_or(0);
		let mut last = self.clock.lock();
		let ts = wall.max(*last + 1);
		*last = ts;
		ts
	}

	/// Walk one range of a table, appending matching entries.
	fn collect(
		table: &Table,
		range: &RowRange,
		columns: &[Column],
		filters: &[Filter],
		versions: Versions,
		limit: Option<usize>,
		out: &mut Vec<Entry>,
	) {
		let start = Cell::new(range.start().to_vec(), Vec::new(), Vec::new());
		for (cell, list) in table.cells.range((Bound::Included(start), Bound::Unbounded)) {
			// The walk is ordered, so leaving the range ends the scan
			if !range.covers(&cell.row) {
				break;
			}
			// Restrict to the fetched columns, if any were named
			if !columns.is_empty() && !columns.iter().any(|c| c.matches(&cell.family, &cell.qualifier)) {
				continue;
			}
			// Apply the cell-level components of the attached filters
			if !filters.iter().all(|f| f.allows_cell(&cell.row, &cell.qualifier)) {
				continue;
			}
			match versions {
				Versions::Latest => {
					// Select the newest version inside the timestamp window
					let found = list.versions.iter().find(|v| ts_allows(filters, v.ts));
					// The value filters then decide whether the cell appears
					if let Some(v) = found {
						if value_allows(filters, &v.value) {
							out.push(entry(cell, v.ts, &v.value));
						}
					}
				}
				Versions::All => {
					for v in &list.versions {
						if ts_allows(filters, v.ts) && value_allows(filters, &v.value) {
							out.push(entry(cell, v.ts, &v.value));
						}
						if limit.is_some_and(|l| out.len() >= l) {
							return;
						}
					}
				}
			}
			if limit.is_some_and(|l| out.len() >= l) {
				return;
			}
		}
	}
}

fn entry(cell: &Cell, ts: u64, value: &[u8]) -> Entry {
	Entry {
		row: cell.row.clone(),
		family: cell.family.clone(),
		qualifier: cell.qualifier.clone(),
		ts,
		value: value.to_vec(),
	}
}

/// Check the timestamp filters against a version timestamp.
fn ts_allows(filters: &[Filter], ts: u64) -> bool {
	filters.iter().all(|f| match f {
		Filter::Timestamp {
			..
		} => f.allows_version(ts, &[]),
		_ => true,
	})
}

/// Check the value filters against a version value.
fn value_allows(filters: &[Filter], value: &[u8]) -> bool {
	filters.iter().all(|f| match f {
		Filter::Value(_) => f.allows_version(0, value),
		_ => true,
	})
}

impl Store for Memory {
	#[instrument(level = "trace", target = "gravel::kvs::mem", skip(self, opts))]
	fn create_table(&self, name: &str, opts: TableOptions) -> Result<(), Error> {
		// Creating an existing table keeps its cells and options
		self.tables.entry(name.to_string()).or_insert_with(|| {
			RwLock::new(Table {
				cells: BTreeMap::new(),
				opts,
			})
		});
		Ok(())
	}

	#[instrument(level = "trace", target = "gravel::kvs::mem", skip(self))]
	fn delete_table(&self, name: &str) -> Result<(), Error> {
		let _guard = self.guard.write();
		self.tables.remove(name);
		Ok(())
	}

	fn table_exists(&self, name: &str) -> Result<bool, Error> {
		Ok(self.tables.contains_key(name))
	}

	fn list_tables(&self) -> Result<Vec<String>, Error> {
		let mut names: Vec<String> = self.tables.iter().map(|t| t.key().clone()).collect();
		names.sort();
		Ok(names)
	}

	fn split_table(&self, name: &str, points: &[Vec<u8>]) -> Result<(), Error> {
		// Splits only affect physical placement, which the memory store
		// does not model, so the points are recorded and nothing moves
		match self.tables.get(name) {
			Some(table) => {
				table.write().opts.split_points.extend(points.iter().cloned());
				Ok(())
			}
			None => Err(Error::Store(format!("The table '{name}' does not exist"))),
		}
	}

	fn scan(&self, scan: &Scan) -> Result<Vec<Entry>, Error> {
		let _guard = self.guard.read();
		let table = match self.tables.get(&scan.table) {
			Some(table) => table,
			None => return Err(Error::Store(format!("The table '{}' does not exist", scan.table))),
		};
		let table = table.read();
		let mut out = Vec::new();
		Memory::collect(&table, &scan.range, &scan.columns, &scan.filters, scan.versions, scan.limit, &mut out);
		Ok(out)
	}

	fn batch_scan(&self, scan: &BatchScan) -> Result<Vec<Entry>, Error> {
		let _guard = self.guard.read();
		let table = match self.tables.get(&scan.table) {
			Some(table) => table,
			None => return Err(Error::Store(format!("The table '{}' does not exist", scan.table))),
		};
		let table = table.read();
		// Ranges are walked sequentially, which satisfies the contract as
		// batch scans guarantee no ordering across ranges
		let mut out = Vec::new();
		for range in &scan.ranges {
			Memory::collect(&table, range, &scan.columns, &scan.filters, scan.versions, None, &mut out);
		}
		Ok(out)
	}

	fn apply(&self, batches: Vec<TableBatch>) -> Result<(), Error> {
		let _guard = self.guard.write();
		// Verify every target table before mutating anything
		for batch in &batches {
			if !self.tables.contains_key(&batch.table) {
				return Err(Error::Store(format!("The table '{}' does not exist", batch.table)));
			}
		}
		for batch in batches {
			let table = match self.tables.get(&batch.table) {
				Some(table) => table,
				None => return Err(Error::Store(format!("The table '{}' does not exist", batch.table))),
			};
			let mut table = table.write();
			let max_versions = table.opts.max_versions;
			for mutation in batch.mutations {
				match mutation {
					Mutation::Put {
						cell,
						ts,
						value,
					} => {
						let ts = match ts {
							Some(t) if t > 0 => t,
							_ => self.now(),
						};
						table.cells.entry(cell).or_default().put(ts, value, max_versions);
					}
					Mutation::Delete {
						cell,
						ts,
					} => {
						let ts = match ts {
							Some(t) if t > 0 => t,
							_ => self.now(),
						};
						let empty = match table.cells.get_mut(&cell) {
							Some(list) => {
								list.delete(ts);
								list.is_empty()
							}
							None => false,
						};
						if empty {
							table.cells.remove(&cell);
						}
					}
				}
			}
		}
		Ok(())
	}

	fn batch_delete(&self, delete: &BatchDelete) -> Result<u64, Error> {
		let _guard = self.guard.write();
		let table = match self.tables.get(&delete.table) {
			Some(table) => table,
			None => return Err(Error::Store(format!("The table '{}' does not exist", delete.table))),
		};
		let mut table = table.write();
		let mut count = 0u64;
		for range in &delete.ranges {
			// Collect the doomed cells first, then remove them
			let mut doomed = Vec::new();
			let start = Cell::new(range.start().to_vec(), Vec::new(), Vec::new());
			for (cell, _) in table.cells.range((Bound::Included(start), Bound::Unbounded)) {
				if !range.covers(&cell.row) {
					break;
				}
				if let Some(family) = &delete.fetch_family {
					if &cell.family != family {
						continue;
					}
				}
				if !delete.filters.iter().all(|f| f.allows_cell(&cell.row, &cell.qualifier)) {
					continue;
				}
				doomed.push(cell.clone());
			}
			for cell in doomed {
				table.cells.remove(&cell);
				count += 1;
			}
		}
		Ok(count)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn store() -> Memory {
		let mem = Memory::new();
		mem.create_table("t", TableOptions::default().with_max_versions(0)).unwrap();
		mem
	}

	fn put(row: &str, family: &str, qualifier: &str, ts: u64, value: &[u8]) -> Mutation {
		Mutation::put(Cell::new(row, family, qualifier), Some(ts), value.to_vec())
	}

	fn apply(mem: &Memory, mutations: Vec<Mutation>) {
		mem.apply(vec![TableBatch {
			table: "t".to_string(),
			mutations,
		}])
		.unwrap();
	}

	#[test]
	fn sorted_scan() {
		let mem = store();
		apply(&mem, vec![put("b", "f", "", 1, b"2"), put("a", "f", "", 1, b"1"), put("c", "f", "", 1, b"3")]);
		let entries = mem.scan(&Scan::table("t")).unwrap();
		let rows: Vec<_> = entries.iter().map(|e| e.row.clone()).collect();
		assert_eq!(rows, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
	}

	#[test]
	fn latest_version_wins() {
		let mem = store();
		apply(&mem, vec![put("r", "f", "", 10, b"old"), put("r", "f", "", 20, b"new")]);
		let entries = mem.scan(&Scan::table("t")).unwrap();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].value, b"new");
		assert_eq!(entries[0].ts, 20);
	}

	#[test]
	fn all_versions_in_window() {
		let mem = store();
		apply(&mem, vec![put("r", "f", "", 10, b"a"), put("r", "f", "", 20, b"b"), put("r", "f", "", 30, b"c")]);
		let scan = Scan::table("t")
			.with_versions(Versions::All)
			.with_filter(Filter::timestamp(Some(10), Some(20)));
		let entries = mem.scan(&scan).unwrap();
		let values: Vec<_> = entries.iter().map(|e| e.value.clone()).collect();
		assert_eq!(values, vec![b"b".to_vec(), b"a".to_vec()]);
	}

	#[test]
	fn timestamp_window_selects_version() {
		let mem = store();
		apply(&mem, vec![put("r", "f", "", 100, b"old"), put("r", "f", "", 200, b"new")]);
		let scan = Scan::table("t").with_filter(Filter::timestamp(None, Some(150)));
		let entries = mem.scan(&scan).unwrap();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].value, b"old");
	}

	#[test]
	fn delete_suppresses_older_versions() {
		let mem = store();
		apply(&mem, vec![put("r", "f", "", 10, b"a"), put("r", "f", "", 20, b"b")]);
		apply(&mem, vec![Mutation::delete(Cell::new("r", "f", ""), Some(25))]);
		// The cell is gone for every read, including point-in-time reads
		assert!(mem.scan(&Scan::table("t")).unwrap().is_empty());
		let scan = Scan::table("t").with_filter(Filter::timestamp(None, Some(15)));
		assert!(mem.scan(&scan).unwrap().is_empty());
	}

	#[test]
	fn delete_keeps_newer_versions() {
		let mem = store();
		apply(&mem, vec![put("r", "f", "", 10, b"a"), put("r", "f", "", 30, b"b")]);
		apply(&mem, vec![Mutation::delete(Cell::new("r", "f", ""), Some(20))]);
		let entries = mem.scan(&Scan::table("t").with_versions(Versions::All)).unwrap();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].value, b"b");
	}

	#[test]
	fn max_versions_truncates() {
		let mem = Memory::new();
		mem.create_table("t", TableOptions::default().with_max_versions(2)).unwrap();
		apply(&mem, vec![put("r", "f", "", 1, b"a"), put("r", "f", "", 2, b"b"), put("r", "f", "", 3, b"c")]);
		let entries = mem.scan(&Scan::table("t").with_versions(Versions::All)).unwrap();
		let values: Vec<_> = entries.iter().map(|e| e.value.clone()).collect();
		assert_eq!(values, vec![b"c".to_vec(), b"b".to_vec()]);
	}

	#[test]
	fn column_selection() {
		let mem = store();
		apply(&mem, vec![put("r", "f", "q1", 1, b"a"), put("r", "f", "q2", 1, b"b"), put("r", "g", "q1", 1, b"c")]);
		let scan = Scan::table("t").fetch_column(Column::family("f"));
		assert_eq!(mem.scan(&scan).unwrap().len(), 2);
		let scan = Scan::table("t").fetch_column(Column::pair("f", "q2"));
		let entries = mem.scan(&scan).unwrap();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].value, b"b");
	}

	#[test]
	fn row_ranges() {
		let mem = store();
		apply(&mem, vec![put("aa", "f", "", 1, b""), put("ab", "f", "", 1, b""), put("b", "f", "", 1, b"")]);
		let scan = Scan::table("t").with_range(RowRange::Prefix(b"a".to_vec()));
		assert_eq!(mem.scan(&scan).unwrap().len(), 2);
		let scan = Scan::table("t").with_range(RowRange::Row(b"ab".to_vec()));
		assert_eq!(mem.scan(&scan).unwrap().len(), 1);
		let scan = Scan::table("t").with_range(RowRange::Between(b"ab".to_vec(), b"b".to_vec()));
		assert_eq!(mem.scan(&scan).unwrap().len(), 2);
	}

	#[test]
	fn value_regex_filters_cells() {
		let mem = store();
		apply(&mem, vec![put("r1", "f", "", 1, b"_knows"), put("r2", "f", "", 1, b"_likes")]);
		let scan = Scan::table("t").with_filter(Filter::value_regex(".*_knows$").unwrap());
		let entries = mem.scan(&scan).unwrap();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].row, b"r1");
	}

	#[test]
	fn atomic_cross_table_apply() {
		let mem = Memory::new();
		mem.create_table("t1", TableOptions::default()).unwrap();
		mem.create_table("t2", TableOptions::default()).unwrap();
		mem.apply(vec![
			TableBatch {
				table: "t1".to_string(),
				mutations: vec![put("r", "f", "", 1, b"a")],
			},
			TableBatch {
				table: "t2".to_string(),
				mutations: vec![put("r", "f", "", 1, b"b")],
			},
		])
		.unwrap();
		assert_eq!(mem.scan(&Scan::table("t1")).unwrap().len(), 1);
		assert_eq!(mem.scan(&Scan::table("t2")).unwrap().len(), 1);
	}

	#[test]
	fn missing_table_errors() {
		let mem = Memory::new();
		assert!(mem.scan(&Scan::table("nope")).is_err());
		let batch = vec![TableBatch {
			table: "nope".to_string(),
			mutations: vec![put("r", "f", "", 1, b"")],
		}];
		assert!(mem.apply(batch).is_err());
	}

	#[test]
	fn batch_delete_with_family_and_filter() {
		let mem = store();
		apply(
			&mem,
			vec![
				put("r1", "f", "v1", 1, b""),
				put("r1", "f", "v2", 1, b""),
				put("r1", "g", "v1", 1, b""),
			],
		);
		let delete = BatchDelete::table("t", 1)
			.with_range(RowRange::All)
			.with_fetch_family("f")
			.with_filter(Filter::qualifier_regex("^v1$").unwrap());
		assert_eq!(mem.batch_delete(&delete).unwrap(), 1);
		let entries = mem.scan(&Scan::table("t")).unwrap();
		assert_eq!(entries.len(), 2);
	}

	#[test]
	fn store_clock_is_monotonic() {
		let mem = store();
		apply(&mem, vec![put("r", "f", "", 0, b"a")]);
		let first = mem.scan(&Scan::table("t")).unwrap()[0].ts;
		apply(&mem, vec![Mutation::put(Cell::new("r", "f", ""), None, b"b".to_vec())]);
		let entries = mem.scan(&Scan::table("t").with_versions(Versions::All)).unwrap();
		assert!(entries[0].ts > first);
		assert_eq!(entries[0].value, b"b");
	}
}
