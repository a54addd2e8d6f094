//! Graph configuration.
use crate::cnf;
use crate::gph::Kind;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// The recognized options of a graph instance.
///
/// A configuration is built with chained `with_*` calls and handed to
/// [`crate::gph::Graph::open`].
#[derive(Clone, Debug)]
pub struct GraphConfig {
	/// The graph name, doubling as the default table name prefix
	pub name: String,
	/// An explicit table name prefix overriding the graph name
	pub table_prefix: Option<String>,
	/// Flush the multi-writer after every public mutation
	pub auto_flush: bool,
	/// Skip duplicate checks on add and return lazy handles on get
	pub skip_existence_checks: bool,
	/// Treat every property key as key-indexed
	pub auto_index: bool,
	/// Allow named-index management on this graph
	pub indexable: bool,
	/// Keep the original behaviour of leaking edge index cells on
	/// vertex removal instead of sweeping them
	pub legacy_index_sweep: bool,
	/// The capacity of each element cache, zero disables caching
	pub cache_capacity: usize,
	/// The entry TTL of the vertex cache
	pub vertex_cache_ttl: Option<Duration>,
	/// The entry TTL of the edge cache
	pub edge_cache_ttl: Option<Duration>,
	/// Per-property cache TTLs in milliseconds, -1 disables caching
	pub property_ttls: HashMap<String, i64>,
	/// Property keys fetched eagerly on every element load
	pub preload_properties: HashSet<String>,
	/// Edge labels whose adjacency is fetched on every vertex load
	pub preload_edge_labels: HashSet<String>,
	/// Row boundaries used to pre-split tables at creation
	pub split_points: HashMap<String, Vec<Vec<u8>>>,
	/// How many threads multi-range scans may use
	pub query_threads: usize,
	/// How many threads batched deletes may use
	pub write_threads: usize,
	/// How many cell versions the element tables retain, zero retains all
	pub max_versions: u32,
}

impl GraphConfig {
	/// Create a configuration with defaults for a named graph.
	pub fn new(name: impl Into<String>) -> GraphConfig {
		GraphConfig {
			name: name.into(),
			table_prefix: None,
			auto_flush: true,
			skip_existence_checks: false,
			auto_index: false,
			indexable: true,
			legacy_index_sweep: false,
			cache_capacity: *cnf::DEFAULT_CACHE_CAPACITY,
			vertex_cache_ttl: Some(Duration::from_millis(*cnf::DEFAULT_CACHE_TTL)),
			edge_cache_ttl: Some(Duration::from_millis(*cnf::DEFAULT_CACHE_TTL)),
			property_ttls: HashMap::new(),
			preload_properties: HashSet::new(),
			preload_edge_labels: HashSet::new(),
			split_points: HashMap::new(),
			query_threads: *cnf::DEFAULT_QUERY_THREADS,
			write_threads: *cnf::DEFAULT_WRITE_THREADS,
			max_versions: cnf::DEFAULT_MAX_VERSIONS,
		}
	}

	pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> GraphConfig {
		self.table_prefix = Some(prefix.into());
		self
	}

	pub fn with_auto_flush(mut self, auto_flush: bool) -> GraphConfig {
		self.auto_flush = auto_flush;
		self
	}

	pub fn with_skip_existence_checks(mut self, skip: bool) -> GraphConfig {
		self.skip_existence_checks = skip;
		self
	}

	pub fn with_auto_index(mut self, auto_index: bool) -> GraphConfig {
		self.auto_index = auto_index;
		self
	}

	pub fn with_indexable(mut self, indexable: bool) -> GraphConfig {
		self.indexable = indexable;
		self
	}

	pub fn with_legacy_index_sweep(mut self, legacy: bool) -> GraphConfig {
		self.legacy_index_sweep = legacy;
		self
	}

	pub fn with_cache_capacity(mut self, capacity: usize) -> GraphConfig {
		self.cache_capacity = capacity;
		self
	}

	pub fn with_vertex_cache_ttl(mut self, ttl: Option<Duration>) -> GraphConfig {
		self.vertex_cache_ttl = ttl;
		self
	}

	pub fn with_edge_cache_ttl(mut self, ttl: Option<Duration>) -> GraphConfig {
		self.edge_cache_ttl = ttl;
		self
	}

	pub fn with_property_ttl(mut self, key: impl Into<String>, ttl_millis: i64) -> GraphConfig {
		self.property_ttls.insert(key.into(), ttl_millis);
		self
	}

	pub fn with_preload_property(mut self, key: impl Into<String>) -> GraphConfig {
		self.preload_properties.insert(key.into());
		self
	}

	pub fn with_preload_edge_label(mut self, label: impl Into<String>) -> GraphConfig {
		self.preload_edge_labels.insert(label.into());
		self
	}

	pub fn with_split_points(mut self, table: impl Into<String>, points: Vec<Vec<u8>>) -> GraphConfig {
		self.split_points.insert(table.into(), points);
		self
	}

	pub fn with_query_threads(mut self, threads: usize) -> GraphConfig {
		self.query_threads = threads.max(1);
		self
	}

	pub fn with_write_threads(mut self, threads: usize) -> GraphConfig {
		self.write_threads = threads.max(1);
		self
	}

	pub fn with_max_versions(mut self, max_versions: u32) -> GraphConfig {
		self.max_versions = max_versions;
		self
	}

	/// The effective table name prefix.
	pub(crate) fn prefix(&self) -> &str {
		self.table_prefix.as_deref().unwrap_or(&self.name)
	}

	/// The names of the six fixed tables.
	pub(crate) fn tables(&self) -> TableNames {
		TableNames::new(self.prefix())
	}
}

/// The names of the six fixed tables of one graph.
#[derive(Clone, Debug)]
pub(crate) struct TableNames {
	pub vertex: String,
	pub edge: String,
	pub vertex_index: String,
	pub edge_index: String,
	pub index_meta: String,
	pub key_meta: String,
}

impl TableNames {
	fn new(prefix: &str) -> TableNames {
		TableNames {
			vertex: format!("{prefix}{}", cnf::TABLE_VERTEX),
			edge: format!("{prefix}{}", cnf::TABLE_EDGE),
			vertex_index: format!("{prefix}{}", cnf::TABLE_VERTEX_INDEX),
			edge_index: format!("{prefix}{}", cnf::TABLE_EDGE_INDEX),
			index_meta: format!("{prefix}{}", cnf::TABLE_INDEX_METADATA),
			key_meta: format!("{prefix}{}", cnf::TABLE_KEY_METADATA),
		}
	}

	/// The primary table of an element kind.
	pub fn element(&self, kind: Kind) -> &str {
		match kind {
			Kind::Vertex => &self.vertex,
			Kind::Edge => &self.edge,
		}
	}

	/// The key-index table of an element kind.
	pub fn index(&self, kind: Kind) -> &str {
		match kind {
			Kind::Vertex => &self.vertex_index,
			Kind::Edge => &self.edge_index,
		}
	}

	/// Every fixed table name.
	pub fn all(&self) -> [&str; 6] {
		[
			&self.vertex,
			&self.edge,
			&self.vertex_index,
			&self.edge_index,
			&self.index_meta,
			&self.key_meta,
		]
	}
}

/// The backing table name of a named index.
pub(crate) fn named_index_table(prefix: &str, name: &str) -> String {
	format!("{prefix}{}{name}", cnf::NAMED_INDEX_INFIX)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn table_names() {
		let cfg = GraphConfig::new("social");
		let tables = cfg.tables();
		assert_eq!(tables.vertex, "social_vertex");
		assert_eq!(tables.edge, "social_edge");
		assert_eq!(tables.vertex_index, "social_vertex_index");
		assert_eq!(tables.edge_index, "social_edge_index");
		assert_eq!(tables.index_meta, "social_index_metadata");
		assert_eq!(tables.key_meta, "social_key_metadata");
		assert_eq!(named_index_table(cfg.prefix(), "people"), "social_index_people");
	}

	#[test]
	fn prefix_override() {
		let cfg = GraphConfig::new("social").with_table_prefix("acme");
		assert_eq!(cfg.tables().vertex, "acme_vertex");
	}
}
