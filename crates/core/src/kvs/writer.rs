use crate::err::Error;
use crate::kvs::{Mutation, Store, TableBatch};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A buffered writer multiplexing mutations across tables.
///
/// Mutations accumulate per table until [`MultiWriter::flush`] pushes the
/// whole buffer to the store in one atomic apply. The writer lives for the
/// lifetime of the graph handle and is closed on shutdown; mutations added
/// after closing are rejected.
pub struct MultiWriter {
	store: Arc<dyn Store>,
	buffers: Mutex<HashMap<String, Vec<Mutation>>>,
	closed: AtomicBool,
}

impl MultiWriter {
	/// Create a new writer on top of a store.
	pub fn new(store: Arc<dyn Store>) -> MultiWriter {
		MultiWriter {
			store,
			buffers: Mutex::new(HashMap::new()),
			closed: AtomicBool::new(false),
		}
	}

	/// Get a handle buffering mutations for a single table.
	pub fn writer<'a>(&'a self, table: &str) -> Writer<'a> {
		Writer {
			parent: self,
			table: table.to_string(),
		}
	}

	/// Buffer a single mutation against a table.
	pub fn add(&self, table: &str, mutation: Mutation) -> Result<(), Error> {
		// Reject writes once the graph has been shut down
		if self.closed.load(Ordering::Acquire) {
			return Err(Error::Closed);
		}
		// Append the mutation to the table buffer
		let mut buffers = self.buffers.lock();
		buffers.entry(table.to_string()).or_default().push(mutation);
		Ok(())
	}

	/// Push every buffered mutation to the store atomically.
	pub fn flush(&self) -> Result<(), Error> {
		// Drain the buffers while holding the lock
		let batches: Vec<TableBatch> = {
			let mut buffers = self.buffers.lock();
			buffers
				.drain()
				.filter(|(_, mutations)| !mutations.is_empty())
				.map(|(table, mutations)| TableBatch {
					table,
					mutations,
				})
				.collect()
		};
		// Nothing to do when no mutations are pending
		if batches.is_empty() {
			return Ok(());
		}
		trace!("Flushing {} table batches to the store", batches.len());
		// Apply all batches in one atomic store operation
		self.store.apply(batches)
	}

	/// Discard every buffered mutation without applying it.
	pub fn cancel(&self) {
		self.buffers.lock().clear();
	}

	/// Flush pending mutations and refuse any further writes.
	pub fn close(&self) -> Result<(), Error> {
		if self.closed.swap(true, Ordering::AcqRel) {
			return Ok(());
		}
		self.flush()
	}

	/// Check whether the writer has been closed.
	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::Acquire)
	}
}

/// A single-table view over a [`MultiWriter`].
pub struct Writer<'a> {
	parent: &'a MultiWriter,
	table: String,
}

impl Writer<'_> {
	/// Buffer a single mutation against this table.
	pub fn add(&self, mutation: Mutation) -> Result<(), Error> {
		self.parent.add(&self.table, mutation)
	}
}
