//! The element caches.
//!
//! The graph holds one cache per element kind. Each cache is a bounded LRU
//! map from element id to a cached element shape, with a kind-level entry
//! TTL and optional per-property TTL overrides. The cache is a pure hint:
//! correctness never depends on it, and a stale entry is simply treated as
//! absent.
use crate::gph::Kind;
use crate::val::Value;
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// The cached shape of an element, holding ids only, never live handles.
#[derive(Clone, Debug)]
pub struct CachedElement {
	pub kind: Kind,
	pub label: Option<String>,
	pub in_vertex: Option<String>,
	pub out_vertex: Option<String>,
	/// Pre-decoded property bindings with their store time
	properties: HashMap<String, (Value, Instant)>,
	/// When the element itself was cached
	stored: Instant,
}

impl CachedElement {
	/// Build a cache entry for a vertex.
	pub fn vertex() -> CachedElement {
		CachedElement {
			kind: Kind::Vertex,
			label: None,
			in_vertex: None,
			out_vertex: None,
			properties: HashMap::new(),
			stored: Instant::now(),
		}
	}

	/// Build a cache entry for an edge.
	pub fn edge(label: &str, in_vertex: &str, out_vertex: &str) -> CachedElement {
		CachedElement {
			kind: Kind::Edge,
			label: Some(label.to_string()),
			in_vertex: Some(in_vertex.to_string()),
			out_vertex: Some(out_vertex.to_string()),
			properties: HashMap::new(),
			stored: Instant::now(),
		}
	}

	/// Attach a pre-decoded property binding.
	pub fn with_property(mut self, key: &str, value: Value) -> CachedElement {
		self.properties.insert(key.to_string(), (value, Instant::now()));
		self
	}

	/// Every property binding currently held, regardless of freshness.
	pub fn properties(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.properties.iter().map(|(k, (v, _))| (k, v))
	}
}

/// A bounded LRU cache of elements for one element kind.
pub struct ElementCache {
	/// The LRU map, absent when the capacity is configured to zero
	inner: Option<Mutex<LruCache<String, CachedElement>>>,
	/// The kind-level entry TTL
	ttl: Option<Duration>,
	/// Per-property TTL overrides in milliseconds, -1 disables caching
	property_ttls: HashMap<String, i64>,
}

impl ElementCache {
	/// Create a cache with the given capacity and TTLs.
	pub fn new(capacity: usize, ttl: Option<Duration>, property_ttls: HashMap<String, i64>) -> ElementCache {
		ElementCache {
			inner: NonZeroUsize::new(capacity).map(|c| Mutex::new(LruCache::new(c))),
			ttl,
			property_ttls,
		}
	}

	/// Check whether caching is enabled at all.
	pub fn is_enabled(&self) -> bool {
		self.inner.is_some()
	}

	/// Fetch an element by id, treating expired entries as absent.
	pub fn get(&self, id: &str) -> Option<CachedElement> {
		let cache = self.inner.as_ref()?;
		let mut cache = cache.lock();
		let expired = match cache.get(id) {
			Some(entry) => self.ttl.is_some_and(|ttl| entry.stored.elapsed() > ttl),
			None => return None,
		};
		if expired {
			cache.pop(id);
			return None;
		}
		cache.get(id).cloned()
	}

	/// Insert or replace an element.
	pub fn put(&self, id: &str, element: CachedElement) {
		if let Some(cache) = self.inner.as_ref() {
			cache.lock().put(id.to_string(), element);
		}
	}

	/// Evict an element by id.
	pub fn remove(&self, id: &str) {
		if let Some(cache) = self.inner.as_ref() {
			cache.lock().pop(id);
		}
	}

	/// Wipe the whole cache.
	pub fn clear(&self) {
		if let Some(cache) = self.inner.as_ref() {
			cache.lock().clear();
		}
	}

	/// Fetch a fresh property binding from a held element.
	///
	/// Returns None when the element is not held, the element expired, the
	/// binding is missing, or the binding outlived its per-property TTL. The
	/// caller then falls back to a property-only scan.
	pub fn property(&self, id: &str, key: &str) -> Option<Value> {
		let cache = self.inner.as_ref()?;
		let mut cache = cache.lock();
		let expired = match cache.get(id) {
			Some(entry) => self.ttl.is_some_and(|ttl| entry.stored.elapsed() > ttl),
			None => return None,
		};
		if expired {
			cache.pop(id);
			return None;
		}
		let entry = cache.get(id)?;
		let (value, stored) = entry.properties.get(key)?;
		match self.property_ttls.get(key) {
			// A negative TTL disables caching for this property entirely
			Some(ttl) if *ttl < 0 => None,
			Some(ttl) => {
				if stored.elapsed() > Duration::from_millis(*ttl as u64) {
					None
				} else {
					Some(value.clone())
				}
			}
			None => Some(value.clone()),
		}
	}

	/// Re-cache a property binding on a held element.
	pub fn put_property(&self, id: &str, key: &str, value: Value) {
		// Never store bindings for properties with caching disabled
		if matches!(self.property_ttls.get(key), Some(ttl) if *ttl < 0) {
			return;
		}
		if let Some(cache) = self.inner.as_ref() {
			let mut cache = cache.lock();
			if let Some(entry) = cache.get_mut(id) {
				entry.properties.insert(key.to_string(), (value, Instant::now()));
			}
		}
	}

	/// Drop a property binding from a held element.
	pub fn remove_property(&self, id: &str, key: &str) {
		if let Some(cache) = self.inner.as_ref() {
			let mut cache = cache.lock();
			if let Some(entry) = cache.get_mut(id) {
				entry.properties.remove(key);
			}
		}
	}
}
