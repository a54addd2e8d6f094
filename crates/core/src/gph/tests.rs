use super::*;
use crate::kvs::mem::Memory;

fn config() -> GraphConfig {
	GraphConfig::new("test").with_max_versions(0)
}

fn graph() -> Graph {
	Graph::open(config()).unwrap()
}

/// Two handles on one store: the second always starts with cold caches.
fn graph_pair() -> (Graph, Graph) {
	let store = Arc::new(Memory::new());
	let one = Graph::open_with_store(store.clone(), config()).unwrap();
	let two = Graph::open_with_store(store, config()).unwrap();
	(one, two)
}

#[test_log::test]
fn property_roundtrip() {
	let (warm, cold) = graph_pair();
	let vals = vec![
		Value::from(true),
		Value::from(-42i64),
		Value::from(3.25),
		Value::from("alice"),
		Value::from(vec![0u8, 255, 7]),
	];
	for (n, val) in vals.into_iter().enumerate() {
		let id = format!("v{n}");
		warm.add_vertex(Some(&id), None).unwrap();
		warm.set_property(Kind::Vertex, &id, "data", val.clone(), None).unwrap();
		warm.flush().unwrap();
		// Read back through the populated cache
		assert_eq!(warm.get_property(Kind::Vertex, &id, "data").unwrap(), Some(val.clone()));
		// Read back through a clean cache
		assert_eq!(cold.get_property(Kind::Vertex, &id, "data").unwrap(), Some(val));
	}
}

#[test_log::test]
fn adjacency_symmetry() {
	let g = graph();
	g.add_vertex(Some("A"), None).unwrap();
	g.add_vertex(Some("B"), None).unwrap();
	g.add_edge(Some("e1"), "A", "B", "knows", None).unwrap();
	// The out side reaches the in side over its outgoing adjacency
	let peers = g.vertices_of("A", Direction::Out, &["knows"]).unwrap();
	assert_eq!(peers.iter().map(|v| v.id.as_str()).collect::<Vec<_>>(), vec!["B"]);
	// The in side reaches the out side over its incoming adjacency
	let peers = g.vertices_of("B", Direction::In, &["knows"]).unwrap();
	assert_eq!(peers.iter().map(|v| v.id.as_str()).collect::<Vec<_>>(), vec!["A"]);
}

#[test_log::test]
fn index_roundtrip() {
	let g = graph();
	g.create_key_index("name", Kind::Vertex, None).unwrap();
	g.add_vertex(Some("v1"), None).unwrap();
	g.add_vertex(Some("v2"), None).unwrap();
	g.add_vertex(Some("v3"), None).unwrap();
	g.set_property(Kind::Vertex, "v1", "name", Value::from("alice"), None).unwrap();
	g.set_property(Kind::Vertex, "v2", "name", Value::from("alice"), None).unwrap();
	g.set_property(Kind::Vertex, "v3", "name", Value::from("bob"), None).unwrap();
	// The indexed read returns exactly the matching vertices
	let mut ids: Vec<String> =
		g.vertices_by("name", &Value::from("alice")).unwrap().into_iter().map(|v| v.id).collect();
	ids.sort();
	assert_eq!(ids, vec!["v1", "v2"]);
	// Overwriting retires the old index cell
	g.set_property(Kind::Vertex, "v1", "name", Value::from("bob"), None).unwrap();
	let ids: Vec<String> =
		g.vertices_by("name", &Value::from("alice")).unwrap().into_iter().map(|v| v.id).collect();
	assert_eq!(ids, vec!["v2"]);
}

#[test_log::test]
fn cascade_on_vertex_removal() {
	let g = graph();
	g.add_vertex(Some("A"), None).unwrap();
	g.add_vertex(Some("B"), None).unwrap();
	g.add_edge(Some("e"), "A", "B", "l", None).unwrap();
	g.remove_vertex("A", None).unwrap();
	// The incident edge is gone from the edge table
	assert!(g.get_edge("e").unwrap().is_none());
	// No adjacency cell on the peer row references the vertex
	assert!(g.edges_of("B", Direction::Both, &[]).unwrap().is_empty());
	// The peer itself is untouched
	assert!(g.get_vertex("B").unwrap().is_some());
}

#[test_log::test]
fn time_travel_monotonicity() {
	let g = graph();
	g.add_vertex(Some("X"), Some(100)).unwrap();
	g.set_property(Kind::Vertex, "X", "name", Value::from("old"), Some(100)).unwrap();
	g.set_property(Kind::Vertex, "X", "name", Value::from("new"), Some(200)).unwrap();
	g.flush().unwrap();
	// An upper bound between the writes sees the first value
	g.enable_timestamp_filter(None, Some(150)).unwrap();
	assert_eq!(g.get_property(Kind::Vertex, "X", "name").unwrap(), Some(Value::from("old")));
	// An upper bound after both writes sees the second value
	g.enable_timestamp_filter(None, Some(250)).unwrap();
	assert_eq!(g.get_property(Kind::Vertex, "X", "name").unwrap(), Some(Value::from("new")));
	// An upper bound before the first write sees nothing
	g.enable_timestamp_filter(None, Some(50)).unwrap();
	assert_eq!(g.get_property(Kind::Vertex, "X", "name").unwrap(), None);
	assert!(g.get_vertex("X").unwrap().is_none());
	g.disable_timestamp_filter();
	assert_eq!(g.get_property(Kind::Vertex, "X", "name").unwrap(), Some(Value::from("new")));
}

#[test_log::test]
fn tombstones_cover_every_window() {
	let g = graph();
	g.add_vertex(Some("V"), Some(100)).unwrap();
	g.set_property(Kind::Vertex, "V", "name", Value::from("x"), Some(100)).unwrap();
	g.remove_vertex("V", Some(500)).unwrap();
	// A point-in-time read before the deletion still returns nothing
	g.enable_timestamp_filter(None, Some(200)).unwrap();
	assert!(g.get_vertex("V").unwrap().is_none());
	g.disable_timestamp_filter();
	assert!(g.get_vertex("V").unwrap().is_none());
}

#[test_log::test]
fn opaque_values_reject_predicates() {
	let g = graph();
	g.add_vertex(Some("v1"), None).unwrap();
	g.set_property(Kind::Vertex, "v1", "blob", Value::from(vec![1u8, 2]), None).unwrap();
	// Opaque payloads cannot be filtered server side
	let res = g.vertices_by("blob", &Value::from(vec![1u8, 2]));
	assert!(matches!(res, Err(Error::UnsupportedFilter)));
	// But an indexed opaque value is matched by row equality
	g.create_key_index("blob", Kind::Vertex, None).unwrap();
	let ids: Vec<String> =
		g.vertices_by("blob", &Value::from(vec![1u8, 2])).unwrap().into_iter().map(|v| v.id).collect();
	assert_eq!(ids, vec!["v1"]);
}

#[test_log::test]
fn predicate_scan_has_no_false_positives() {
	let g = graph();
	g.add_vertex(Some("v1"), None).unwrap();
	g.add_vertex(Some("v2"), None).unwrap();
	g.set_property(Kind::Vertex, "v1", "name", Value::from("a"), None).unwrap();
	g.set_property(Kind::Vertex, "v2", "name", Value::from("ab"), None).unwrap();
	// The literal predicate must not match the longer value
	let ids: Vec<String> =
		g.vertices_by("name", &Value::from("a")).unwrap().into_iter().map(|v| v.id).collect();
	assert_eq!(ids, vec!["v1"]);
}

#[test_log::test]
fn cache_coherence_across_threads() {
	let g = graph();
	g.add_vertex(Some("v1"), None).unwrap();
	g.set_property(Kind::Vertex, "v1", "k", Value::from(1i64), None).unwrap();
	g.set_property(Kind::Vertex, "v1", "k", Value::from(2i64), None).unwrap();
	g.flush().unwrap();
	// Any thread observes the latest value once flushed
	let other = g.clone();
	let seen = std::thread::spawn(move || other.get_property(Kind::Vertex, "v1", "k").unwrap())
		.join()
		.unwrap();
	assert_eq!(seen, Some(Value::from(2i64)));
	assert_eq!(g.get_property(Kind::Vertex, "v1", "k").unwrap(), Some(Value::from(2i64)));
}

#[test_log::test]
fn basic_traversal() {
	let g = graph();
	g.add_vertex(Some("A"), None).unwrap();
	g.add_vertex(Some("B"), None).unwrap();
	g.add_edge(Some("e1"), "A", "B", "knows", None).unwrap();
	let edges = g.edges_of("A", Direction::Out, &["knows"]).unwrap();
	assert_eq!(edges.len(), 1);
	assert_eq!(edges[0].id, "e1");
	assert_eq!(edges[0].label, "knows");
	assert_eq!(edges[0].out_vertex, "A");
	assert_eq!(edges[0].in_vertex, "B");
	// A label filter for a different label matches nothing
	assert!(g.edges_of("A", Direction::Out, &["likes"]).unwrap().is_empty());
	// The unfiltered scan returns the edge in both directions
	assert_eq!(g.edges_of("A", Direction::Both, &[]).unwrap().len(), 1);
	assert_eq!(g.edges_of("B", Direction::In, &[]).unwrap().len(), 1);
	assert!(g.edges_of("B", Direction::Out, &[]).unwrap().is_empty());
}

#[test_log::test]
fn duplicate_ids() {
	// With existence checks the second add fails
	let g = graph();
	g.add_vertex(Some("1"), None).unwrap();
	assert!(matches!(g.add_vertex(Some("1"), None), Err(Error::DuplicateId(_))));
	// Without them the second add overwrites the existence cell
	let g = Graph::open(config().with_skip_existence_checks(true)).unwrap();
	g.add_vertex(Some("1"), None).unwrap();
	g.add_vertex(Some("1"), None).unwrap();
	assert_eq!(g.vertices().unwrap().len(), 1);
}

#[test_log::test]
fn invalid_filter_configurations() {
	let g = graph();
	assert!(matches!(g.enable_timestamp_filter(None, None), Err(Error::InvalidFilter)));
	assert!(matches!(g.enable_timestamp_filter(Some(5), Some(3)), Err(Error::InvalidFilter)));
	// Equal bounds are a valid single-instant window
	g.enable_timestamp_filter(Some(3), Some(3)).unwrap();
	g.disable_timestamp_filter();
}

#[test_log::test]
fn argument_validation() {
	let g = graph();
	assert!(matches!(g.add_vertex(Some(""), None), Err(Error::NullId)));
	assert!(matches!(g.add_vertex(Some("a_b"), None), Err(Error::InvalidId(_))));
	assert!(matches!(g.get_vertex(""), Err(Error::NullId)));
	g.add_vertex(Some("A"), None).unwrap();
	g.add_vertex(Some("B"), None).unwrap();
	assert!(matches!(g.add_edge(None, "A", "B", "", None), Err(Error::NullLabel)));
	assert!(matches!(g.add_edge(None, "A", "B", "a_b", None), Err(Error::InvalidLabel(_))));
	assert!(matches!(
		g.set_property(Kind::Vertex, "A", "", Value::from(1i64), None),
		Err(Error::EmptyKey)
	));
	for key in ["id", "label", "L", "I", "O"] {
		assert!(matches!(
			g.set_property(Kind::Vertex, "A", key, Value::from(1i64), None),
			Err(Error::ReservedKey(_))
		));
	}
	assert!(matches!(g.remove_vertex("missing", None), Err(Error::NotFound(_))));
}

#[test_log::test]
fn generated_ids_are_unique() {
	let g = graph();
	let one = g.add_vertex(None, None).unwrap();
	let two = g.add_vertex(None, None).unwrap();
	assert_ne!(one.id, two.id);
	assert!(g.get_vertex(&one.id).unwrap().is_some());
}

#[test_log::test]
fn lazy_handles_without_existence_checks() {
	let g = Graph::open(config().with_skip_existence_checks(true)).unwrap();
	// A lazy vertex handle comes back without any scan
	assert!(g.get_vertex("ghost").unwrap().is_some());
	// Edges still need their label cell to take shape
	assert!(g.get_edge("ghost").unwrap().is_none());
}

#[test_log::test]
fn buffered_writes_need_a_flush() {
	let store = Arc::new(Memory::new());
	let writer = Graph::open_with_store(store.clone(), config().with_auto_flush(false)).unwrap();
	let reader = Graph::open_with_store(store, config()).unwrap();
	writer.add_vertex(Some("v1"), None).unwrap();
	// The write is invisible until the writer flushes
	assert!(reader.get_vertex("v1").unwrap().is_none());
	writer.flush().unwrap();
	assert!(reader.get_vertex("v1").unwrap().is_some());
}

#[test_log::test]
fn named_index_lifecycle() {
	let g = graph();
	let index = g.create_index("people", Kind::Vertex, None).unwrap();
	assert_eq!(index.name(), "people");
	assert_eq!(index.kind(), Kind::Vertex);
	// A second index under the same name is rejected, whatever the kind
	assert!(matches!(
		g.create_index("people", Kind::Edge, None),
		Err(Error::IndexAlreadyExists(_))
	));
	// Fetching with the wrong kind is a class mismatch
	assert!(matches!(g.get_index("people", Kind::Edge), Err(Error::IndexClassMismatch(..))));
	assert!(g.get_index("people", Kind::Vertex).unwrap().is_some());
	assert!(g.get_index("missing", Kind::Vertex).unwrap().is_none());
	// Manual maintenance round-trip
	g.add_vertex(Some("v1"), None).unwrap();
	index.put("name", &Value::from("alice"), "v1", None).unwrap();
	assert_eq!(index.get("name", &Value::from("alice")).unwrap(), vec!["v1"]);
	assert_eq!(index.count("name", &Value::from("alice")).unwrap(), 1);
	index.remove("name", &Value::from("alice"), "v1", None).unwrap();
	assert!(index.get("name", &Value::from("alice")).unwrap().is_empty());
	// Dropping removes the registration and the backing table
	g.drop_index("people", None).unwrap();
	assert!(g.get_index("people", Kind::Vertex).unwrap().is_none());
	assert_eq!(g.get_indices().unwrap().len(), 0);
}

#[test_log::test]
fn element_removal_sweeps_named_indices() {
	let g = graph();
	let index = g.create_index("people", Kind::Vertex, None).unwrap();
	g.add_vertex(Some("v1"), None).unwrap();
	index.put("name", &Value::from("alice"), "v1", None).unwrap();
	g.remove_vertex("v1", None).unwrap();
	assert!(index.get("name", &Value::from("alice")).unwrap().is_empty());
}

#[test_log::test]
fn cascade_sweeps_named_edge_indices() {
	let g = graph();
	let index = g.create_index("links", Kind::Edge, None).unwrap();
	g.add_vertex(Some("A"), None).unwrap();
	g.add_vertex(Some("B"), None).unwrap();
	g.add_edge(Some("e"), "A", "B", "l", None).unwrap();
	index.put("kind", &Value::from("work"), "e", None).unwrap();
	// Removing the endpoint cascades to the edge, which must leave the
	// named edge index just as a direct removal would
	g.remove_vertex("A", None).unwrap();
	assert!(index.get("kind", &Value::from("work")).unwrap().is_empty());
}

#[test_log::test]
fn indexing_can_be_disabled() {
	let g = Graph::open(config().with_indexable(false)).unwrap();
	assert!(matches!(g.create_index("x", Kind::Vertex, None), Err(Error::IndexingDisabled)));
	assert!(matches!(g.get_indices(), Err(Error::IndexingDisabled)));
	assert!(matches!(g.drop_index("x", None), Err(Error::IndexingDisabled)));
}

#[test_log::test]
fn key_index_registration() {
	let g = graph();
	// Re-indexing covers properties written before registration
	g.add_vertex(Some("v1"), None).unwrap();
	g.set_property(Kind::Vertex, "v1", "name", Value::from("alice"), None).unwrap();
	g.create_key_index("name", Kind::Vertex, None).unwrap();
	assert_eq!(g.indexed_keys(Kind::Vertex).unwrap(), vec!["name"]);
	assert!(g.indexed_keys(Kind::Edge).unwrap().is_empty());
	let ids: Vec<String> =
		g.vertices_by("name", &Value::from("alice")).unwrap().into_iter().map(|v| v.id).collect();
	assert_eq!(ids, vec!["v1"]);
	// Dropping the registration clears the postings but the fallback
	// scan still answers the query
	g.drop_key_index("name", Kind::Vertex, None).unwrap();
	assert!(g.indexed_keys(Kind::Vertex).unwrap().is_empty());
	let ids: Vec<String> =
		g.vertices_by("name", &Value::from("alice")).unwrap().into_iter().map(|v| v.id).collect();
	assert_eq!(ids, vec!["v1"]);
}

#[test_log::test]
fn cascade_sweeps_edge_key_index() {
	let g = graph();
	g.create_key_index("weight", Kind::Edge, None).unwrap();
	g.add_vertex(Some("A"), None).unwrap();
	g.add_vertex(Some("B"), None).unwrap();
	g.add_edge(Some("e"), "A", "B", "l", None).unwrap();
	g.set_property(Kind::Edge, "e", "weight", Value::from(5i64), None).unwrap();
	assert_eq!(g.edges_by("weight", &Value::from(5i64)).unwrap().len(), 1);
	// Removing the endpoint cascades to the edge and its index cells
	g.remove_vertex("A", None).unwrap();
	assert!(g.edges_by("weight", &Value::from(5i64)).unwrap().is_empty());
}

#[test_log::test]
fn legacy_sweep_leaks_edge_postings() {
	let g = Graph::open(config().with_legacy_index_sweep(true)).unwrap();
	g.create_key_index("weight", Kind::Edge, None).unwrap();
	g.add_vertex(Some("A"), None).unwrap();
	g.add_vertex(Some("B"), None).unwrap();
	g.add_edge(Some("e"), "A", "B", "l", None).unwrap();
	g.set_property(Kind::Edge, "e", "weight", Value::from(5i64), None).unwrap();
	g.remove_vertex("A", None).unwrap();
	// The stale posting survives, as the original engine left it behind
	let stale = g.edges_by("weight", &Value::from(5i64)).unwrap();
	assert!(stale.is_empty() || stale.iter().all(|e| e.id == "e"));
	let index_rows = g
		.inner
		.store
		.scan(&Scan::table(g.inner.tables.edge_index.as_str()))
		.unwrap();
	assert_eq!(index_rows.len(), 1);
}

#[test_log::test]
fn edge_removal_cleans_both_sides() {
	let g = graph();
	g.create_key_index("weight", Kind::Edge, None).unwrap();
	g.add_vertex(Some("A"), None).unwrap();
	g.add_vertex(Some("B"), None).unwrap();
	g.add_edge(Some("e"), "A", "B", "l", None).unwrap();
	g.set_property(Kind::Edge, "e", "weight", Value::from(1i64), None).unwrap();
	g.remove_edge("e", None).unwrap();
	assert!(g.get_edge("e").unwrap().is_none());
	assert!(g.edges_of("A", Direction::Both, &[]).unwrap().is_empty());
	assert!(g.edges_of("B", Direction::Both, &[]).unwrap().is_empty());
	assert!(g.edges_by("weight", &Value::from(1i64)).unwrap().is_empty());
	assert!(matches!(g.remove_edge("e", None), Err(Error::NotFound(_))));
}

#[test_log::test]
fn property_surface() {
	let g = graph();
	g.add_vertex(Some("v1"), None).unwrap();
	g.set_property(Kind::Vertex, "v1", "name", Value::from("alice"), None).unwrap();
	g.set_property(Kind::Vertex, "v1", "age", Value::from(30i64), None).unwrap();
	assert_eq!(g.property_keys(Kind::Vertex, "v1").unwrap(), vec!["age", "name"]);
	// Removing returns the old value and retires the binding
	let old = g.remove_property(Kind::Vertex, "v1", "age", None).unwrap();
	assert_eq!(old, Some(Value::from(30i64)));
	assert_eq!(g.get_property(Kind::Vertex, "v1", "age").unwrap(), None);
	assert_eq!(g.remove_property(Kind::Vertex, "v1", "age", None).unwrap(), None);
	assert_eq!(g.property_keys(Kind::Vertex, "v1").unwrap(), vec!["name"]);
}

#[test_log::test]
fn versioned_property_reads() {
	let g = graph();
	g.add_vertex(Some("v1"), Some(10)).unwrap();
	g.set_property(Kind::Vertex, "v1", "k", Value::from("a"), Some(10)).unwrap();
	g.set_property(Kind::Vertex, "v1", "k", Value::from("b"), Some(20)).unwrap();
	g.set_property(Kind::Vertex, "v1", "k", Value::from("c"), Some(30)).unwrap();
	g.flush().unwrap();
	// The full history arrives newest first
	let all = g.versioned_property(Kind::Vertex, "v1", "k").unwrap();
	assert_eq!(
		all,
		vec![(30, Value::from("c")), (20, Value::from("b")), (10, Value::from("a"))]
	);
	// The active window slices the history
	g.enable_timestamp_filter(Some(15), Some(25)).unwrap();
	let windowed = g.versioned_property(Kind::Vertex, "v1", "k").unwrap();
	assert_eq!(windowed, vec![(20, Value::from("b"))]);
	g.disable_timestamp_filter();
}

#[test_log::test]
fn preloaded_properties_arrive_with_the_vertex() {
	let store = Arc::new(Memory::new());
	let writer = Graph::open_with_store(store.clone(), config()).unwrap();
	writer.add_vertex(Some("v1"), None).unwrap();
	writer.set_property(Kind::Vertex, "v1", "name", Value::from("alice"), None).unwrap();
	writer.set_property(Kind::Vertex, "v1", "bio", Value::from("long"), None).unwrap();
	// A cold handle configured to preload only one key
	let reader =
		Graph::open_with_store(store, config().with_preload_property("name")).unwrap();
	let vertex = reader.get_vertex("v1").unwrap().unwrap();
	assert_eq!(vertex.property("name"), Some(&Value::from("alice")));
	assert!(vertex.property("bio").is_none());
	// The unloaded property is still reachable on demand
	assert_eq!(reader.get_property(Kind::Vertex, "v1", "bio").unwrap(), Some(Value::from("long")));
}

#[test_log::test]
fn full_iteration() {
	let g = graph();
	g.add_vertex(Some("A"), None).unwrap();
	g.add_vertex(Some("B"), None).unwrap();
	g.add_edge(Some("e1"), "A", "B", "knows", None).unwrap();
	g.set_property(Kind::Edge, "e1", "since", Value::from(2020i64), None).unwrap();
	let mut ids: Vec<String> = g.vertices().unwrap().into_iter().map(|v| v.id).collect();
	ids.sort();
	assert_eq!(ids, vec!["A", "B"]);
	let edges = g.edges().unwrap();
	assert_eq!(edges.len(), 1);
	assert_eq!(edges[0].label, "knows");
	assert_eq!(edges[0].property("since"), Some(&Value::from(2020i64)));
}

#[test_log::test]
fn lifecycle() {
	let g = graph();
	assert!(g.is_empty().unwrap());
	g.add_vertex(Some("v1"), None).unwrap();
	g.add_vertex(Some("v2"), None).unwrap();
	g.add_edge(Some("e1"), "v1", "v2", "l", None).unwrap();
	let index = g.create_index("people", Kind::Vertex, None).unwrap();
	index.put("name", &Value::from("x"), "v1", None).unwrap();
	assert!(!g.is_empty().unwrap());
	// Clearing drops every element and named index
	g.clear().unwrap();
	assert!(g.is_empty().unwrap());
	assert!(g.get_vertex("v1").unwrap().is_none());
	assert_eq!(g.get_indices().unwrap().len(), 0);
	// Shutting down refuses further writes
	g.add_vertex(Some("v3"), None).unwrap();
	g.shutdown().unwrap();
	assert!(matches!(g.add_vertex(Some("v4"), None), Err(Error::Closed)));
	// Reads still work against the flushed state
	assert!(g.get_vertex("v3").unwrap().is_some());
}

#[test_log::test]
fn auto_index_treats_every_key_as_indexed() {
	let g = Graph::open(config().with_auto_index(true)).unwrap();
	g.add_vertex(Some("v1"), None).unwrap();
	g.set_property(Kind::Vertex, "v1", "anything", Value::from("x"), None).unwrap();
	// The read is served by the index table without any registration
	let ids: Vec<String> =
		g.vertices_by("anything", &Value::from("x")).unwrap().into_iter().map(|v| v.id).collect();
	assert_eq!(ids, vec!["v1"]);
}

#[test_log::test]
fn filter_is_thread_scoped() {
	let g = graph();
	g.add_vertex(Some("v1"), Some(100)).unwrap();
	g.flush().unwrap();
	// A window on this thread hides the vertex
	g.enable_timestamp_filter(None, Some(50)).unwrap();
	assert!(g.get_vertex("v1").unwrap().is_none());
	// Another thread is unaffected by it
	let other = g.clone();
	let seen =
		std::thread::spawn(move || other.get_vertex("v1").unwrap().is_some()).join().unwrap();
	assert!(seen);
	g.disable_timestamp_filter();
	assert!(g.get_vertex("v1").unwrap().is_some());
}

#[test_log::test]
fn edges_by_returns_full_handles() {
	let g = graph();
	g.create_key_index("kind", Kind::Edge, None).unwrap();
	g.add_vertex(Some("A"), None).unwrap();
	g.add_vertex(Some("B"), None).unwrap();
	g.add_edge(Some("e1"), "A", "B", "knows", None).unwrap();
	g.set_property(Kind::Edge, "e1", "kind", Value::from("work"), None).unwrap();
	let edges = g.edges_by("kind", &Value::from("work")).unwrap();
	assert_eq!(edges.len(), 1);
	assert_eq!(edges[0].id, "e1");
	assert_eq!(edges[0].label, "knows");
	assert_eq!(edges[0].in_vertex, "B");
	assert_eq!(edges[0].out_vertex, "A");
}
