//! The graph engine.
//!
//! A [`Graph`] composes the schema codec, the store adapter and the
//! element caches into the public property-graph operations. All writes
//! funnel through one buffered multi-writer spanning every table; reads
//! are scans decoded back into elements by the [`iter`] helpers.
mod element;
mod index;
mod iter;
mod tsfilter;

#[cfg(test)]
mod tests;

pub use self::element::{Direction, Edge, Element, Kind, Vertex};
pub use self::index::Index;
pub use self::tsfilter::TimeSpan;

use crate::cache::{CachedElement, ElementCache};
use crate::cfg::{named_index_table, GraphConfig, TableNames};
use crate::err::Error;
use crate::key::edge as edgekey;
use crate::key::index::Posting;
use crate::key::meta::{IndexMeta, KeyMeta};
use crate::key::vertex as vertexkey;
use crate::key::{Cell, FAMILY_LABEL, QUALIFIER_EXISTS};
use crate::kvs::mem::Memory;
use crate::kvs::{
	literal, BatchDelete, BatchScan, Column, Filter, MultiWriter, Mutation, RowRange, Scan, Store,
	TableOptions, Versions,
};
use crate::val::Value;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// The shared state of one graph instance.
pub(crate) struct Inner {
	/// Distinguishes this instance in the thread-scoped filter slots
	pub(crate) id: Uuid,
	pub(crate) cfg: GraphConfig,
	pub(crate) tables: TableNames,
	pub(crate) store: Arc<dyn Store>,
	pub(crate) writer: MultiWriter,
	pub(crate) vertices: ElementCache,
	pub(crate) edges: ElementCache,
	/// The registered key-index keys, mirroring the key metadata table
	pub(crate) keyindex: RwLock<HashSet<(Kind, String)>>,
}

impl Inner {
	/// Flush the writer when auto-flush is configured.
	pub(crate) fn maybe_flush(&self) -> Result<(), Error> {
		if self.cfg.auto_flush {
			self.writer.flush()
		} else {
			Ok(())
		}
	}

	/// The time-travel filter of the calling thread, if any.
	fn read_filter(&self) -> Option<Filter> {
		tsfilter::current(self.id).map(|span| span.filter())
	}

	/// Check whether a property key is maintained in the key index.
	fn is_indexed(&self, kind: Kind, key: &str) -> bool {
		self.cfg.auto_index || self.keyindex.read().contains(&(kind, key.to_string()))
	}

	/// The element cache of a kind.
	fn cache(&self, kind: Kind) -> &ElementCache {
		match kind {
			Kind::Vertex => &self.vertices,
			Kind::Edge => &self.edges,
		}
	}
}

/// A handle on one property graph.
///
/// The handle is cheap to clone and safe to share across threads. All
/// operations take `&self`; concurrency control is delegated to the store.
#[derive(Clone)]
pub struct Graph {
	inner: Arc<Inner>,
}

/// Treat an explicit zero timestamp as store-assigned.
pub(crate) fn normalize(ts: Option<u64>) -> Option<u64> {
	ts.filter(|t| *t > 0)
}

/// Validate a caller-supplied element id.
pub(crate) fn check_id(id: &str) -> Result<(), Error> {
	if id.is_empty() {
		return Err(Error::NullId);
	}
	if crate::key::contains_separator(id) {
		return Err(Error::InvalidId(id.to_string()));
	}
	Ok(())
}

/// Validate a caller-supplied edge label.
pub(crate) fn check_label(label: &str) -> Result<(), Error> {
	if label.is_empty() {
		return Err(Error::NullLabel);
	}
	if crate::key::contains_separator(label) {
		return Err(Error::InvalidLabel(label.to_string()));
	}
	Ok(())
}

/// Validate a property key.
///
/// The element accessors `id` and `label` are reserved, as are the fixed
/// single-byte column families of the element tables.
pub(crate) fn check_key(key: &str) -> Result<(), Error> {
	if key.is_empty() {
		return Err(Error::EmptyKey);
	}
	if matches!(key, "id" | "label" | "L" | "I" | "O") {
		return Err(Error::ReservedKey(key.to_string()));
	}
	Ok(())
}

impl Graph {
	/// Open a graph on the built-in in-memory store.
	pub fn open(cfg: GraphConfig) -> Result<Graph, Error> {
		Graph::open_with_store(Arc::new(Memory::new()), cfg)
	}

	/// Open a graph on an existing store, creating its tables as needed.
	pub fn open_with_store(store: Arc<dyn Store>, cfg: GraphConfig) -> Result<Graph, Error> {
		let tables = cfg.tables();
		// The element tables retain history, the index and metadata
		// tables only ever need the latest version of a cell
		for (name, max_versions) in [
			(tables.vertex.as_str(), cfg.max_versions),
			(tables.edge.as_str(), cfg.max_versions),
			(tables.vertex_index.as_str(), 1),
			(tables.edge_index.as_str(), 1),
			(tables.index_meta.as_str(), 1),
			(tables.key_meta.as_str(), 1),
		] {
			let mut opts = TableOptions::default().with_max_versions(max_versions);
			if let Some(points) = cfg.split_points.get(name) {
				opts = opts.with_split_points(points.clone());
			}
			store.create_table(name, opts)?;
		}
		// Load the registered key-index keys
		let mut keyindex = HashSet::new();
		for entry in store.scan(&Scan::table(tables.key_meta.as_str()))? {
			let (key, kind) = KeyMeta::decode(&entry)?;
			keyindex.insert((kind, key));
		}
		let writer = MultiWriter::new(store.clone());
		let vertices =
			ElementCache::new(cfg.cache_capacity, cfg.vertex_cache_ttl, cfg.property_ttls.clone());
		let edges =
			ElementCache::new(cfg.cache_capacity, cfg.edge_cache_ttl, cfg.property_ttls.clone());
		debug!("Opened graph '{}' with prefix '{}'", cfg.name, cfg.prefix());
		Ok(Graph {
			inner: Arc::new(Inner {
				id: Uuid::new_v4(),
				tables,
				store,
				writer,
				vertices,
				edges,
				keyindex: RwLock::new(keyindex),
				cfg,
			}),
		})
	}

	/// The configuration this graph was opened with.
	pub fn config(&self) -> &GraphConfig {
		&self.inner.cfg
	}

	// --------------------------------------------------
	// Vertex operations
	// --------------------------------------------------

	/// Add a vertex, generating a random id when none is supplied.
	#[instrument(level = "trace", target = "gravel::gph", skip(self))]
	pub fn add_vertex(&self, id: Option<&str>, ts: Option<u64>) -> Result<Vertex, Error> {
		let ts = normalize(ts);
		let id = match id {
			Some(id) => {
				check_id(id)?;
				id.to_string()
			}
			None => Uuid::new_v4().to_string(),
		};
		// Check for a duplicate id when existence checks are enabled
		if !self.inner.cfg.skip_existence_checks {
			let scan = Scan::table(self.inner.tables.vertex.as_str())
				.with_range(RowRange::Row(id.as_bytes().to_vec()))
				.fetch_column(Column::pair(FAMILY_LABEL, QUALIFIER_EXISTS))
				.with_limit(1);
			if !self.inner.store.scan(&scan)?.is_empty() {
				return Err(Error::DuplicateId(id));
			}
		}
		// Write the existence marker
		let cell = vertexkey::Exists::new(&id).cell();
		self.inner.writer.add(&self.inner.tables.vertex, Mutation::put(cell, ts, Vec::new()))?;
		// Cache the new vertex
		self.inner.vertices.put(&id, CachedElement::vertex());
		self.inner.maybe_flush()?;
		Ok(Vertex::new(id))
	}

	/// Fetch a vertex by id.
	pub fn get_vertex(&self, id: &str) -> Result<Option<Vertex>, Error> {
		check_id(id)?;
		// Point-in-time reads bypass the cache entirely
		if self.inner.read_filter().is_some() {
			return self.load_vertex(id);
		}
		// Serve from the cache when the entry is fresh
		if let Some(entry) = self.inner.vertices.get(id) {
			let mut out = Vertex::new(id);
			for (key, value) in entry.properties() {
				out.properties.insert(key.clone(), value.clone());
			}
			return Ok(Some(out));
		}
		// Without existence checks the handle is returned unverified
		if self.inner.cfg.skip_existence_checks {
			return Ok(Some(Vertex::new(id)));
		}
		self.load_vertex(id)
	}

	/// Load a vertex row, decoding the preloaded property families.
	fn load_vertex(&self, id: &str) -> Result<Option<Vertex>, Error> {
		// Fetch the existence marker and the preloaded properties
		let mut scan = Scan::table(self.inner.tables.vertex.as_str())
			.with_range(RowRange::Row(id.as_bytes().to_vec()))
			.fetch_column(Column::pair(FAMILY_LABEL, QUALIFIER_EXISTS));
		for key in &self.inner.cfg.preload_properties {
			scan = scan.fetch_column(Column::pair(key.as_str(), ""));
		}
		let filtered = match self.inner.read_filter() {
			Some(filter) => {
				scan = scan.with_filter(filter);
				true
			}
			None => false,
		};
		let entries = self.inner.store.scan(&scan)?;
		let vertex = iter::vertex_from_cells(id, &entries)?;
		// A point-in-time view must never populate the cache
		if let Some(vertex) = vertex.as_ref().filter(|_| !filtered) {
			// Populate the cache with the loaded bindings
			let mut cached = CachedElement::vertex();
			for (key, value) in &vertex.properties {
				cached = cached.with_property(key, value.clone());
			}
			self.inner.vertices.put(id, cached);
			// Warm the edge cache for the configured labels
			if !self.inner.cfg.preload_edge_labels.is_empty() {
				let labels: Vec<&str> =
					self.inner.cfg.preload_edge_labels.iter().map(String::as_str).collect();
				for edge in self.edges_of(id, Direction::Both, &labels)? {
					self.inner
						.edges
						.put(&edge.id, CachedElement::edge(&edge.label, &edge.in_vertex, &edge.out_vertex));
				}
			}
		}
		Ok(vertex)
	}

	/// Remove a vertex, cascading to every incident edge.
	#[instrument(level = "trace", target = "gravel::gph", skip(self))]
	pub fn remove_vertex(&self, id: &str, ts: Option<u64>) -> Result<(), Error> {
		check_id(id)?;
		let ts = normalize(ts);
		// The vertex must exist to be removed
		let scan = Scan::table(self.inner.tables.vertex.as_str())
			.with_range(RowRange::Row(id.as_bytes().to_vec()))
			.fetch_column(Column::pair(FAMILY_LABEL, QUALIFIER_EXISTS))
			.with_limit(1);
		if self.inner.store.scan(&scan)?.is_empty() {
			return Err(Error::NotFound(id.to_string()));
		}
		// Evict the vertex and drop it from every named vertex index
		self.inner.vertices.remove(id);
		self.drop_from_named_indices(Kind::Vertex, id)?;
		// Walk the whole vertex row
		let scan = Scan::table(self.inner.tables.vertex.as_str())
			.with_range(RowRange::Row(id.as_bytes().to_vec()));
		let entries = self.inner.store.scan(&scan)?;
		let mut edge_ids: Vec<String> = Vec::new();
		for entry in &entries {
			if vertexkey::AdjacencyRef::matches(entry) {
				// Stage the inverted adjacency cell on the peer row and
				// collect the edge for full-row deletion
				let adj = vertexkey::AdjacencyRef::decode(entry)?;
				let peer = vertexkey::Adjacency::new(&adj.peer, adj.dir.reverse(), id, &adj.edge);
				self.inner.writer.add(&self.inner.tables.vertex, Mutation::delete(peer.cell(), ts))?;
				edge_ids.push(adj.edge);
			} else if vertexkey::Exists::matches(entry) {
				// The existence marker goes with the row delete below
			} else {
				// Stage the index cell of this property value
				let key = String::from_utf8(entry.family.clone())?;
				let posting = Posting::new(&entry.value, &key, id).cell();
				self.inner.writer.add(&self.inner.tables.vertex_index, Mutation::delete(posting, ts))?;
			}
		}
		// Sweep the key-index cells of the cascade-removed edges
		if !self.inner.cfg.legacy_index_sweep && !edge_ids.is_empty() {
			let scan = BatchScan::table(self.inner.tables.edge.as_str(), self.inner.cfg.query_threads)
				.with_ranges(edge_ids.iter().map(|e| RowRange::Row(e.as_bytes().to_vec())));
			for entry in self.inner.store.batch_scan(&scan)? {
				if edgekey::Label::matches(&entry) {
					continue;
				}
				let key = String::from_utf8(entry.family.clone())?;
				let edge_id = String::from_utf8(entry.row.clone())?;
				let posting = Posting::new(&entry.value, &key, &edge_id).cell();
				self.inner.writer.add(&self.inner.tables.edge_index, Mutation::delete(posting, ts))?;
			}
		}
		// Evict the cascade-removed edges and drop them from every named
		// edge index, exactly as a direct removal would
		for edge_id in &edge_ids {
			self.inner.edges.remove(edge_id);
			self.drop_from_named_indices(Kind::Edge, edge_id)?;
		}
		// Push the staged deletes before removing whole rows
		self.inner.writer.flush()?;
		// Range-delete the collected edge rows in one batch
		if !edge_ids.is_empty() {
			let delete = BatchDelete::table(self.inner.tables.edge.as_str(), self.inner.cfg.write_threads)
				.with_ranges(edge_ids.iter().map(|e| RowRange::Row(e.as_bytes().to_vec())));
			self.inner.store.batch_delete(&delete)?;
		}
		// Range-delete the entire vertex row
		let delete = BatchDelete::table(self.inner.tables.vertex.as_str(), self.inner.cfg.write_threads)
			.with_range(RowRange::Row(id.as_bytes().to_vec()));
		self.inner.store.batch_delete(&delete)?;
		Ok(())
	}

	/// Every vertex of the graph.
	pub fn vertices(&self) -> Result<Vec<Vertex>, Error> {
		let mut scan = Scan::table(self.inner.tables.vertex.as_str());
		if let Some(filter) = self.inner.read_filter() {
			scan = scan.with_filter(filter);
		}
		let entries = self.inner.store.scan(&scan)?;
		let mut out = Vec::new();
		for (row, cells) in iter::RowGroups::new(entries) {
			let id = String::from_utf8(row)?;
			if let Some(vertex) = iter::vertex_from_cells(&id, &cells)? {
				out.push(vertex);
			}
		}
		Ok(out)
	}

	/// Every vertex carrying a property value, served by the key index
	/// when the key is registered.
	pub fn vertices_by(&self, key: &str, value: &Value) -> Result<Vec<Vertex>, Error> {
		let ids = self.elements_by(Kind::Vertex, key, value)?;
		Ok(ids.into_iter().map(Vertex::new).collect())
	}

	/// The vertices reachable over the incident edges of a vertex.
	pub fn vertices_of(
		&self,
		vertex: &str,
		direction: Direction,
		labels: &[&str],
	) -> Result<Vec<Vertex>, Error> {
		let mut seen = HashSet::new();
		let mut out = Vec::new();
		for edge in self.edges_of(vertex, direction, labels)? {
			// The peer is whichever endpoint is not the scanned vertex
			let peer = if edge.in_vertex == vertex {
				edge.out_vertex
			} else {
				edge.in_vertex
			};
			if seen.insert(peer.clone()) {
				out.push(Vertex::new(peer));
			}
		}
		Ok(out)
	}

	// --------------------------------------------------
	// Edge operations
	// --------------------------------------------------

	/// Add an edge between two vertices. Endpoints are never verified.
	#[instrument(level = "trace", target = "gravel::gph", skip(self))]
	pub fn add_edge(
		&self,
		id: Option<&str>,
		out_vertex: &str,
		in_vertex: &str,
		label: &str,
		ts: Option<u64>,
	) -> Result<Edge, Error> {
		check_label(label)?;
		check_id(out_vertex)?;
		check_id(in_vertex)?;
		let ts = normalize(ts);
		let id = match id {
			Some(id) => {
				check_id(id)?;
				id.to_string()
			}
			None => Uuid::new_v4().to_string(),
		};
		// Stage the label cell and both adjacency cells
		let cell = edgekey::Label::new(&id, in_vertex, out_vertex).cell();
		self.inner.writer.add(&self.inner.tables.edge, Mutation::put(cell, ts, edgekey::Label::value(label)))?;
		let cell = vertexkey::Adjacency::new(in_vertex, Direction::In, out_vertex, &id).cell();
		self.inner.writer.add(&self.inner.tables.vertex, Mutation::put(cell, ts, vertexkey::Adjacency::value(label)))?;
		let cell = vertexkey::Adjacency::new(out_vertex, Direction::Out, in_vertex, &id).cell();
		self.inner.writer.add(&self.inner.tables.vertex, Mutation::put(cell, ts, vertexkey::Adjacency::value(label)))?;
		// Cache the new edge
		self.inner.edges.put(&id, CachedElement::edge(label, in_vertex, out_vertex));
		self.inner.maybe_flush()?;
		Ok(Edge::new(id, label, in_vertex, out_vertex))
	}

	/// Fetch an edge by id.
	pub fn get_edge(&self, id: &str) -> Result<Option<Edge>, Error> {
		check_id(id)?;
		// Point-in-time reads bypass the cache entirely
		let filtered = self.inner.read_filter().is_some();
		// Serve from the cache when the entry is fresh
		if !filtered {
			if let Some(entry) = self.inner.edges.get(id) {
				if let (Some(label), Some(in_vertex), Some(out_vertex)) =
					(&entry.label, &entry.in_vertex, &entry.out_vertex)
				{
					let mut out =
						Edge::new(id, label.as_str(), in_vertex.as_str(), out_vertex.as_str());
					for (key, value) in entry.properties() {
						out.properties.insert(key.clone(), value.clone());
					}
					return Ok(Some(out));
				}
			}
		}
		// The label cell is always required to shape the handle, so the
		// scan happens even when existence checks are skipped
		let mut scan = Scan::table(self.inner.tables.edge.as_str())
			.with_range(RowRange::Row(id.as_bytes().to_vec()))
			.fetch_column(Column::family(FAMILY_LABEL));
		for key in &self.inner.cfg.preload_properties {
			scan = scan.fetch_column(Column::pair(key.as_str(), ""));
		}
		if let Some(filter) = self.inner.read_filter() {
			scan = scan.with_filter(filter);
		}
		let entries = self.inner.store.scan(&scan)?;
		let edge = iter::edge_from_cells(id, &entries)?;
		// A point-in-time view must never populate the cache
		if let Some(edge) = edge.as_ref().filter(|_| !filtered) {
			let mut cached = CachedElement::edge(&edge.label, &edge.in_vertex, &edge.out_vertex);
			for (key, value) in &edge.properties {
				cached = cached.with_property(key, value.clone());
			}
			self.inner.edges.put(id, cached);
		}
		Ok(edge)
	}

	/// Remove an edge and both of its adjacency cells.
	#[instrument(level = "trace", target = "gravel::gph", skip(self))]
	pub fn remove_edge(&self, id: &str, ts: Option<u64>) -> Result<(), Error> {
		check_id(id)?;
		let ts = normalize(ts);
		// Walk the edge row to capture endpoints and properties
		let scan = Scan::table(self.inner.tables.edge.as_str())
			.with_range(RowRange::Row(id.as_bytes().to_vec()));
		let entries = self.inner.store.scan(&scan)?;
		let label = match entries.iter().find(|e| edgekey::Label::matches(e)) {
			Some(entry) => edgekey::LabelRef::decode(entry)?,
			None => return Err(Error::NotFound(id.to_string())),
		};
		// Evict the edge and drop it from every named edge index
		self.inner.edges.remove(id);
		self.drop_from_named_indices(Kind::Edge, id)?;
		// Stage the index cell of every property value
		for entry in &entries {
			if edgekey::Label::matches(entry) {
				continue;
			}
			let key = String::from_utf8(entry.family.clone())?;
			let posting = Posting::new(&entry.value, &key, id).cell();
			self.inner.writer.add(&self.inner.tables.edge_index, Mutation::delete(posting, ts))?;
		}
		// Stage the adjacency cells on both endpoint rows
		let cell = vertexkey::Adjacency::new(&label.in_vertex, Direction::In, &label.out_vertex, id).cell();
		self.inner.writer.add(&self.inner.tables.vertex, Mutation::delete(cell, ts))?;
		let cell = vertexkey::Adjacency::new(&label.out_vertex, Direction::Out, &label.in_vertex, id).cell();
		self.inner.writer.add(&self.inner.tables.vertex, Mutation::delete(cell, ts))?;
		// Stage the label cell itself
		let cell = edgekey::Label::new(id, &label.in_vertex, &label.out_vertex).cell();
		self.inner.writer.add(&self.inner.tables.edge, Mutation::delete(cell, ts))?;
		// Push the staged deletes, then clear any remaining row cells
		self.inner.writer.flush()?;
		let delete = BatchDelete::table(self.inner.tables.edge.as_str(), self.inner.cfg.write_threads)
			.with_range(RowRange::Row(id.as_bytes().to_vec()));
		self.inner.store.batch_delete(&delete)?;
		Ok(())
	}

	/// Every edge of the graph.
	pub fn edges(&self) -> Result<Vec<Edge>, Error> {
		let mut scan = Scan::table(self.inner.tables.edge.as_str());
		if let Some(filter) = self.inner.read_filter() {
			scan = scan.with_filter(filter);
		}
		let entries = self.inner.store.scan(&scan)?;
		let mut out = Vec::new();
		for (row, cells) in iter::RowGroups::new(entries) {
			let id = String::from_utf8(row)?;
			if let Some(edge) = iter::edge_from_cells(&id, &cells)? {
				out.push(edge);
			}
		}
		Ok(out)
	}

	/// Every edge carrying a property value, served by the key index when
	/// the key is registered.
	pub fn edges_by(&self, key: &str, value: &Value) -> Result<Vec<Edge>, Error> {
		let ids = self.elements_by(Kind::Edge, key, value)?;
		if ids.is_empty() {
			return Ok(Vec::new());
		}
		// Fetch the label cells of the matched edges in one batch
		let scan = BatchScan::table(self.inner.tables.edge.as_str(), self.inner.cfg.query_threads)
			.with_ranges(ids.iter().map(|id| RowRange::Row(id.as_bytes().to_vec())))
			.fetch_column(Column::family(FAMILY_LABEL));
		let mut out = Vec::new();
		for entry in self.inner.store.batch_scan(&scan)? {
			let id = String::from_utf8(entry.row.clone())?;
			let label = edgekey::LabelRef::decode(&entry)?;
			out.push(Edge::new(id, label.label, label.in_vertex, label.out_vertex));
		}
		Ok(out)
	}

	/// The incident edges of a vertex, optionally restricted by direction
	/// and label set.
	pub fn edges_of(
		&self,
		vertex: &str,
		direction: Direction,
		labels: &[&str],
	) -> Result<Vec<Edge>, Error> {
		check_id(vertex)?;
		// Fetch the adjacency families of the requested direction
		let mut scan = Scan::table(self.inner.tables.vertex.as_str())
			.with_range(RowRange::Row(vertex.as_bytes().to_vec()));
		for family in direction.families() {
			scan = scan.fetch_column(Column::family(*family));
		}
		// Push the label restriction down as a value regex
		if !labels.is_empty() {
			let pattern = labels
				.iter()
				.map(|label| format!(".*_{}$", regex::escape(label)))
				.collect::<Vec<_>>()
				.join("|");
			scan = scan.with_filter(Filter::value_regex(&pattern)?);
		}
		if let Some(filter) = self.inner.read_filter() {
			scan = scan.with_filter(filter);
		}
		let mut out = Vec::new();
		for entry in self.inner.store.scan(&scan)? {
			let adj = vertexkey::AdjacencyRef::decode(&entry)?;
			// The family of the cell decides which side the scanned
			// vertex is on
			let edge = match adj.dir {
				Direction::In => Edge::new(adj.edge, adj.label, vertex, adj.peer),
				_ => Edge::new(adj.edge, adj.label, adj.peer, vertex),
			};
			out.push(edge);
		}
		Ok(out)
	}

	// --------------------------------------------------
	// Property operations
	// --------------------------------------------------

	/// Set a property on an element, maintaining the key index.
	#[instrument(level = "trace", target = "gravel::gph", skip(self, value))]
	pub fn set_property(
		&self,
		kind: Kind,
		id: &str,
		key: &str,
		value: Value,
		ts: Option<u64>,
	) -> Result<(), Error> {
		check_id(id)?;
		check_key(key)?;
		let ts = normalize(ts);
		let encoded = value.serialize();
		// Maintain the key index when this key is registered
		if self.inner.is_indexed(kind, key) {
			// Retire the index cell of the current value, if any
			if let Some(old) = self.fetch_raw_property(kind, id, key)? {
				let posting = Posting::new(&old, key, id).cell();
				self.inner.writer.add(self.inner.tables.index(kind), Mutation::delete(posting, ts))?;
			}
			let posting = Posting::new(&encoded, key, id).cell();
			self.inner.writer.add(self.inner.tables.index(kind), Mutation::put(posting, ts, Vec::new()))?;
		}
		// Write the primary property cell
		let cell = self.property_cell(kind, id, key);
		self.inner.writer.add(self.inner.tables.element(kind), Mutation::put(cell, ts, encoded))?;
		// Re-cache the binding when the element is held
		self.inner.cache(kind).put_property(id, key, value);
		self.inner.maybe_flush()
	}

	/// Fetch a property of an element.
	pub fn get_property(&self, kind: Kind, id: &str, key: &str) -> Result<Option<Value>, Error> {
		check_id(id)?;
		check_key(key)?;
		// Point-in-time reads bypass the cache entirely
		let filtered = self.inner.read_filter().is_some();
		// Serve a fresh binding from the cache
		if !filtered {
			if let Some(value) = self.inner.cache(kind).property(id, key) {
				return Ok(Some(value));
			}
		}
		// A per-property miss triggers a property-only scan
		let mut scan = Scan::table(self.inner.tables.element(kind))
			.with_range(RowRange::Row(id.as_bytes().to_vec()))
			.fetch_column(Column::pair(key, ""))
			.with_limit(1);
		if let Some(filter) = self.inner.read_filter() {
			scan = scan.with_filter(filter);
		}
		match self.inner.store.scan(&scan)?.first() {
			Some(entry) => {
				let value = Value::deserialize(&entry.value)?;
				if !filtered {
					self.inner.cache(kind).put_property(id, key, value.clone());
				}
				Ok(Some(value))
			}
			None => Ok(None),
		}
	}

	/// Remove a property from an element, returning the old value.
	#[instrument(level = "trace", target = "gravel::gph", skip(self))]
	pub fn remove_property(
		&self,
		kind: Kind,
		id: &str,
		key: &str,
		ts: Option<u64>,
	) -> Result<Option<Value>, Error> {
		check_id(id)?;
		check_key(key)?;
		let ts = normalize(ts);
		// Fetch the current value; nothing to do when absent
		let old = match self.fetch_raw_property(kind, id, key)? {
			Some(old) => old,
			None => return Ok(None),
		};
		// Delete the primary cell and its index cell
		let cell = self.property_cell(kind, id, key);
		self.inner.writer.add(self.inner.tables.element(kind), Mutation::delete(cell, ts))?;
		let posting = Posting::new(&old, key, id).cell();
		self.inner.writer.add(self.inner.tables.index(kind), Mutation::delete(posting, ts))?;
		self.inner.cache(kind).remove_property(id, key);
		self.inner.maybe_flush()?;
		Ok(Some(Value::deserialize(&old)?))
	}

	/// The property keys present on an element row.
	pub fn property_keys(&self, kind: Kind, id: &str) -> Result<Vec<String>, Error> {
		check_id(id)?;
		let mut scan = Scan::table(self.inner.tables.element(kind))
			.with_range(RowRange::Row(id.as_bytes().to_vec()));
		if let Some(filter) = self.inner.read_filter() {
			scan = scan.with_filter(filter);
		}
		let mut out = BTreeSet::new();
		for entry in self.inner.store.scan(&scan)? {
			// Skip the fixed families and any qualified cells
			if entry.is_family(FAMILY_LABEL) || vertexkey::AdjacencyRef::matches(&entry) {
				continue;
			}
			if !entry.qualifier.is_empty() {
				continue;
			}
			out.insert(String::from_utf8(entry.family)?);
		}
		Ok(out.into_iter().collect())
	}

	/// The retained versions of a property inside the active window.
	///
	/// Pairs are returned in store order, newest first.
	pub fn versioned_property(
		&self,
		kind: Kind,
		id: &str,
		key: &str,
	) -> Result<Vec<(u64, Value)>, Error> {
		check_id(id)?;
		check_key(key)?;
		let mut scan = Scan::table(self.inner.tables.element(kind))
			.with_range(RowRange::Row(id.as_bytes().to_vec()))
			.fetch_column(Column::pair(key, ""))
			.with_versions(Versions::All);
		if let Some(filter) = self.inner.read_filter() {
			scan = scan.with_filter(filter);
		}
		let mut out = Vec::new();
		for entry in self.inner.store.scan(&scan)? {
			out.push((entry.ts, Value::deserialize(&entry.value)?));
		}
		Ok(out)
	}

	/// The primary property cell of an element.
	fn property_cell(&self, kind: Kind, id: &str, key: &str) -> Cell {
		match kind {
			Kind::Vertex => vertexkey::Property::new(id, key).cell(),
			Kind::Edge => edgekey::Property::new(id, key).cell(),
		}
	}

	/// Fetch the current encoded bytes of a property, bypassing both the
	/// cache and the time-travel filter. Write paths use this to keep the
	/// key index aligned with the latest state.
	fn fetch_raw_property(&self, kind: Kind, id: &str, key: &str) -> Result<Option<Vec<u8>>, Error> {
		let scan = Scan::table(self.inner.tables.element(kind))
			.with_range(RowRange::Row(id.as_bytes().to_vec()))
			.fetch_column(Column::pair(key, ""))
			.with_limit(1);
		Ok(self.inner.store.scan(&scan)?.into_iter().next().map(|e| e.value))
	}

	/// Resolve element ids by property value, using the key index when
	/// registered and a pushed-down literal predicate otherwise.
	fn elements_by(&self, kind: Kind, key: &str, value: &Value) -> Result<Vec<String>, Error> {
		check_key(key)?;
		let encoded = value.serialize();
		if self.inner.is_indexed(kind, key) {
			// Fast path: a single-row scan of the key index table
			let scan = Scan::table(self.inner.tables.index(kind))
				.with_range(RowRange::Row(encoded))
				.fetch_column(Column::family(key));
			let mut out = Vec::new();
			for entry in self.inner.store.scan(&scan)? {
				out.push(String::from_utf8(entry.qualifier)?);
			}
			return Ok(out);
		}
		// Opaque payloads cannot be matched byte-for-byte by the store
		if !Value::is_regex_safe(&encoded) {
			return Err(Error::UnsupportedFilter);
		}
		// Fall back to a filtered scan of the primary table
		let pattern = format!("^{}$", literal(&encoded));
		let mut scan = BatchScan::table(self.inner.tables.element(kind), self.inner.cfg.query_threads)
			.with_range(RowRange::All)
			.fetch_column(Column::pair(key, ""))
			.with_filter(Filter::value_regex(&pattern)?);
		if let Some(filter) = self.inner.read_filter() {
			scan = scan.with_filter(filter);
		}
		let mut out = Vec::new();
		for entry in self.inner.store.batch_scan(&scan)? {
			out.push(String::from_utf8(entry.row)?);
		}
		Ok(out)
	}

	// --------------------------------------------------
	// Named indices
	// --------------------------------------------------

	/// Create a named index, registering it and its backing table.
	#[instrument(level = "trace", target = "gravel::gph", skip(self))]
	pub fn create_index(&self, name: &str, kind: Kind, ts: Option<u64>) -> Result<Index, Error> {
		if !self.inner.cfg.indexable {
			return Err(Error::IndexingDisabled);
		}
		if name.is_empty() {
			return Err(Error::NullId);
		}
		let ts = normalize(ts);
		// Reject a second index under the same name, whatever its kind
		let scan = Scan::table(self.inner.tables.index_meta.as_str())
			.with_range(RowRange::Row(name.as_bytes().to_vec()))
			.with_limit(1);
		if !self.inner.store.scan(&scan)?.is_empty() {
			return Err(Error::IndexAlreadyExists(name.to_string()));
		}
		// Register the index, then create its backing table
		let cell = IndexMeta::new(name, kind).cell();
		self.inner.writer.add(&self.inner.tables.index_meta, Mutation::put(cell, ts, Vec::new()))?;
		self.inner.writer.flush()?;
		let table = named_index_table(self.inner.cfg.prefix(), name);
		self.inner.store.create_table(&table, TableOptions::default())?;
		Ok(Index::new(self.inner.clone(), name.to_string(), kind, table))
	}

	/// Fetch a named index by name and kind.
	pub fn get_index(&self, name: &str, kind: Kind) -> Result<Option<Index>, Error> {
		if !self.inner.cfg.indexable {
			return Err(Error::IndexingDisabled);
		}
		let scan = Scan::table(self.inner.tables.index_meta.as_str())
			.with_range(RowRange::Row(name.as_bytes().to_vec()));
		let entries = self.inner.store.scan(&scan)?;
		let entry = match entries.first() {
			Some(entry) => entry,
			None => return Ok(None),
		};
		let (name, stored) = IndexMeta::decode(entry)?;
		// The stored kind must agree with the requested kind
		if stored != kind {
			return Err(Error::IndexClassMismatch(name, kind));
		}
		let table = named_index_table(self.inner.cfg.prefix(), &name);
		Ok(Some(Index::new(self.inner.clone(), name, kind, table)))
	}

	/// Every named index of the graph.
	pub fn get_indices(&self) -> Result<Vec<Index>, Error> {
		if !self.inner.cfg.indexable {
			return Err(Error::IndexingDisabled);
		}
		let entries = self.inner.store.scan(&Scan::table(self.inner.tables.index_meta.as_str()))?;
		let mut out = Vec::new();
		for entry in entries {
			let (name, kind) = IndexMeta::decode(&entry)?;
			let table = named_index_table(self.inner.cfg.prefix(), &name);
			out.push(Index::new(self.inner.clone(), name, kind, table));
		}
		Ok(out)
	}

	/// Drop a named index and its backing table. Dropping an index that
	/// does not exist is a no-op.
	#[instrument(level = "trace", target = "gravel::gph", skip(self))]
	pub fn drop_index(&self, name: &str, ts: Option<u64>) -> Result<(), Error> {
		if !self.inner.cfg.indexable {
			return Err(Error::IndexingDisabled);
		}
		let ts = normalize(ts);
		let scan = Scan::table(self.inner.tables.index_meta.as_str())
			.with_range(RowRange::Row(name.as_bytes().to_vec()));
		let entries = self.inner.store.scan(&scan)?;
		if entries.is_empty() {
			return Ok(());
		}
		// Drop the registration rows, then the backing table
		for entry in entries {
			let cell = Cell::new(entry.row, entry.family, entry.qualifier);
			self.inner.writer.add(&self.inner.tables.index_meta, Mutation::delete(cell, ts))?;
		}
		self.inner.writer.flush()?;
		self.inner.store.delete_table(&named_index_table(self.inner.cfg.prefix(), name))?;
		Ok(())
	}

	/// Drop an element from every named index of its kind.
	fn drop_from_named_indices(&self, kind: Kind, element: &str) -> Result<(), Error> {
		if !self.inner.cfg.indexable {
			return Ok(());
		}
		let pattern = format!("^{}$", literal(element.as_bytes()));
		for index in self.get_indices()? {
			if index.kind() != kind {
				continue;
			}
			// Postings keep the element id in the qualifier
			let delete = BatchDelete::table(index.table(), self.inner.cfg.write_threads)
				.with_range(RowRange::All)
				.with_filter(Filter::qualifier_regex(&pattern)?);
			self.inner.store.batch_delete(&delete)?;
		}
		Ok(())
	}

	// --------------------------------------------------
	// Key indices
	// --------------------------------------------------

	/// Register a property key for automatic indexing and re-index the
	/// whole kind table for it.
	#[instrument(level = "trace", target = "gravel::gph", skip(self))]
	pub fn create_key_index(&self, key: &str, kind: Kind, ts: Option<u64>) -> Result<(), Error> {
		check_key(key)?;
		let ts = normalize(ts);
		// Register the key
		let cell = KeyMeta::new(key, kind).cell();
		self.inner.writer.add(&self.inner.tables.key_meta, Mutation::put(cell, ts, Vec::new()))?;
		self.inner.writer.flush()?;
		self.inner.keyindex.write().insert((kind, key.to_string()));
		// Re-index every element currently carrying this key
		let scan = BatchScan::table(self.inner.tables.element(kind), self.inner.cfg.query_threads)
			.with_range(RowRange::All)
			.fetch_column(Column::pair(key, ""));
		for entry in self.inner.store.batch_scan(&scan)? {
			let id = String::from_utf8(entry.row)?;
			let posting = Posting::new(&entry.value, key, &id).cell();
			self.inner.writer.add(self.inner.tables.index(kind), Mutation::put(posting, ts, Vec::new()))?;
		}
		self.inner.writer.flush()
	}

	/// Unregister a property key and clear its postings.
	#[instrument(level = "trace", target = "gravel::gph", skip(self))]
	pub fn drop_key_index(&self, key: &str, kind: Kind, ts: Option<u64>) -> Result<(), Error> {
		check_key(key)?;
		let ts = normalize(ts);
		// Unregister the key
		let cell = KeyMeta::new(key, kind).cell();
		self.inner.writer.add(&self.inner.tables.key_meta, Mutation::delete(cell, ts))?;
		self.inner.writer.flush()?;
		self.inner.keyindex.write().remove(&(kind, key.to_string()));
		// Clear every posting of this key from the index table
		let delete = BatchDelete::table(self.inner.tables.index(kind), self.inner.cfg.write_threads)
			.with_range(RowRange::All)
			.with_fetch_family(key);
		self.inner.store.batch_delete(&delete)?;
		Ok(())
	}

	/// The registered key-index keys of a kind.
	pub fn indexed_keys(&self, kind: Kind) -> Result<Vec<String>, Error> {
		let entries = self.inner.store.scan(&Scan::table(self.inner.tables.key_meta.as_str()))?;
		let mut out = Vec::new();
		for entry in entries {
			let (key, stored) = KeyMeta::decode(&entry)?;
			if stored == kind {
				out.push(key);
			}
		}
		Ok(out)
	}

	// --------------------------------------------------
	// Time travel
	// --------------------------------------------------

	/// Restrict element reads on this thread to a timestamp window.
	///
	/// The window is inclusive on both ends and applies only to scans
	/// issued by the calling thread.
	pub fn enable_timestamp_filter(&self, start: Option<u64>, end: Option<u64>) -> Result<(), Error> {
		let span = TimeSpan::new(start, end)?;
		tsfilter::enable(self.inner.id, span);
		Ok(())
	}

	/// Clear the timestamp window of the calling thread.
	pub fn disable_timestamp_filter(&self) {
		tsfilter::disable(self.inner.id);
	}

	// --------------------------------------------------
	// Lifecycle
	// --------------------------------------------------

	/// Push every buffered mutation to the store.
	pub fn flush(&self) -> Result<(), Error> {
		self.inner.writer.flush()
	}

	/// Check whether the graph holds any elements.
	pub fn is_empty(&self) -> Result<bool, Error> {
		let scan = Scan::table(self.inner.tables.vertex.as_str()).with_limit(1);
		if !self.inner.store.scan(&scan)?.is_empty() {
			return Ok(false);
		}
		let scan = Scan::table(self.inner.tables.edge.as_str()).with_limit(1);
		Ok(self.inner.store.scan(&scan)?.is_empty())
	}

	/// Drop every element, index and pending write of the graph.
	#[instrument(level = "trace", target = "gravel::gph", skip(self))]
	pub fn clear(&self) -> Result<(), Error> {
		// Discard pending writes and wipe the caches
		self.inner.writer.cancel();
		self.inner.vertices.clear();
		self.inner.edges.clear();
		// Capture the named index tables before their metadata goes
		let named: Vec<String> = if self.inner.cfg.indexable {
			self.get_indices()?.iter().map(|i| i.table().to_string()).collect()
		} else {
			Vec::new()
		};
		// Truncate the fixed tables and drop the named index tables
		for table in self.inner.tables.all() {
			let delete = BatchDelete::table(table, self.inner.cfg.write_threads).with_range(RowRange::All);
			self.inner.store.batch_delete(&delete)?;
		}
		for table in named {
			self.inner.store.delete_table(&table)?;
		}
		self.inner.keyindex.write().clear();
		Ok(())
	}

	/// Flush pending writes, close the writer and wipe the caches. The
	/// handle refuses further mutations once shut down.
	pub fn shutdown(&self) -> Result<(), Error> {
		self.inner.writer.close()?;
		self.inner.vertices.clear();
		self.inner.edges.clear();
		Ok(())
	}
}
