use once_cell::sync::Lazy;

/// Specifies the default maximum number of elements held in each element cache.
pub static DEFAULT_CACHE_CAPACITY: Lazy<usize> =
	lazy_env_parse!("GRAVEL_CACHE_CAPACITY", usize, 10_000);

/// Specifies the default time-to-live in milliseconds for cached elements.
pub static DEFAULT_CACHE_TTL: Lazy<u64> = lazy_env_parse!("GRAVEL_CACHE_TTL", u64, 60_000);

/// Specifies the default number of threads used for multi-range batch scans.
pub static DEFAULT_QUERY_THREADS: Lazy<usize> = lazy_env_parse!("GRAVEL_QUERY_THREADS", usize, 3);

/// Specifies the default number of threads used for batched deletes.
pub static DEFAULT_WRITE_THREADS: Lazy<usize> = lazy_env_parse!("GRAVEL_WRITE_THREADS", usize, 3);

/// The number of cell versions retained by the element tables unless configured otherwise.
pub const DEFAULT_MAX_VERSIONS: u32 = 1;

/// Table name suffix for the vertex table.
pub const TABLE_VERTEX: &str = "_vertex";

/// Table name suffix for the edge table.
pub const TABLE_EDGE: &str = "_edge";

/// Table name suffix for the vertex index table.
pub const TABLE_VERTEX_INDEX: &str = "_vertex_index";

/// Table name suffix for the edge index table.
pub const TABLE_EDGE_INDEX: &str = "_edge_index";

/// Table name suffix for the named-index metadata table.
pub const TABLE_INDEX_METADATA: &str = "_index_metadata";

/// Table name suffix for the key-index metadata table.
pub const TABLE_KEY_METADATA: &str = "_key_metadata";

/// The infix used when naming the backing table of a named index.
pub const NAMED_INDEX_INFIX: &str = "_index_";
