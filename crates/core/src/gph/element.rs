//! The logical elements of the graph.
//!
//! Vertices and edges share one property surface and differ only in the
//! shape carried by their variant, so the two are modelled as tagged
//! variants of [`Element`] rather than as a type hierarchy.
use crate::err::Error;
use crate::key::{FAMILY_IN, FAMILY_OUT};
use crate::val::Value;
use std::collections::HashMap;
use std::fmt;

/// The kind of a graph element.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Kind {
	Vertex,
	Edge,
}

impl Kind {
	/// The column family marking this kind in the metadata tables.
	pub fn family(&self) -> &'static [u8] {
		match self {
			Kind::Vertex => b"Vertex",
			Kind::Edge => b"Edge",
		}
	}

	/// Decode a metadata column family back into a kind.
	pub fn from_family(family: &[u8]) -> Result<Kind, Error> {
		match family {
			b"Vertex" => Ok(Kind::Vertex),
			b"Edge" => Ok(Kind::Edge),
			_ => Err(Error::Encoding("unknown element kind".to_string())),
		}
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Kind::Vertex => write!(f, "vertex"),
			Kind::Edge => write!(f, "edge"),
		}
	}
}

/// The direction of an adjacency traversal.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
	In,
	Out,
	Both,
}

impl Direction {
	/// The opposite direction. Both is its own opposite.
	pub fn reverse(&self) -> Direction {
		match self {
			Direction::In => Direction::Out,
			Direction::Out => Direction::In,
			Direction::Both => Direction::Both,
		}
	}

	/// The adjacency families fetched when scanning in this direction.
	pub(crate) fn families(&self) -> &'static [&'static [u8]] {
		match self {
			Direction::In => &[FAMILY_IN],
			Direction::Out => &[FAMILY_OUT],
			Direction::Both => &[FAMILY_IN, FAMILY_OUT],
		}
	}
}

/// A vertex of the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
	pub id: String,
	pub properties: HashMap<String, Value>,
}

impl Vertex {
	pub(crate) fn new(id: impl Into<String>) -> Vertex {
		Vertex {
			id: id.into(),
			properties: HashMap::new(),
		}
	}

	/// A property binding loaded with this vertex, if any.
	pub fn property(&self, key: &str) -> Option<&Value> {
		self.properties.get(key)
	}
}

/// An edge of the graph. The label and endpoints are immutable.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub id: String,
	pub label: String,
	pub in_vertex: String,
	pub out_vertex: String,
	pub properties: HashMap<String, Value>,
}

impl Edge {
	pub(crate) fn new(
		id: impl Into<String>,
		label: impl Into<String>,
		in_vertex: impl Into<String>,
		out_vertex: impl Into<String>,
	) -> Edge {
		Edge {
			id: id.into(),
			label: label.into(),
			in_vertex: in_vertex.into(),
			out_vertex: out_vertex.into(),
			properties: HashMap::new(),
		}
	}

	/// The id of the vertex this edge points into.
	pub fn in_vertex(&self) -> &str {
		&self.in_vertex
	}

	/// The id of the vertex this edge leaves from.
	pub fn out_vertex(&self) -> &str {
		&self.out_vertex
	}

	/// A property binding loaded with this edge, if any.
	pub fn property(&self, key: &str) -> Option<&Value> {
		self.properties.get(key)
	}
}

/// A graph element: either a vertex or an edge.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
	Vertex(Vertex),
	Edge(Edge),
}

impl Element {
	/// The element id.
	pub fn id(&self) -> &str {
		match self {
			Element::Vertex(v) => &v.id,
			Element::Edge(e) => &e.id,
		}
	}

	/// The element kind.
	pub fn kind(&self) -> Kind {
		match self {
			Element::Vertex(_) => Kind::Vertex,
			Element::Edge(_) => Kind::Edge,
		}
	}

	/// The edge label, when this element is an edge.
	pub fn label(&self) -> Option<&str> {
		match self {
			Element::Vertex(_) => None,
			Element::Edge(e) => Some(&e.label),
		}
	}

	/// The in vertex id, when this element is an edge.
	pub fn in_vertex(&self) -> Option<&str> {
		match self {
			Element::Vertex(_) => None,
			Element::Edge(e) => Some(e.in_vertex()),
		}
	}

	/// The out vertex id, when this element is an edge.
	pub fn out_vertex(&self) -> Option<&str> {
		match self {
			Element::Vertex(_) => None,
			Element::Edge(e) => Some(e.out_vertex()),
		}
	}

	/// A property binding loaded with this element, if any.
	pub fn property(&self, key: &str) -> Option<&Value> {
		match self {
			Element::Vertex(v) => v.property(key),
			Element::Edge(e) => e.property(key),
		}
	}

	/// The keys of every property binding loaded with this element.
	pub fn property_keys(&self) -> Vec<&str> {
		let properties = match self {
			Element::Vertex(v) => &v.properties,
			Element::Edge(e) => &e.properties,
		};
		properties.keys().map(String::as_str).collect()
	}

	pub fn as_vertex(&self) -> Option<&Vertex> {
		match self {
			Element::Vertex(v) => Some(v),
			Element::Edge(_) => None,
		}
	}

	pub fn as_edge(&self) -> Option<&Edge> {
		match self {
			Element::Vertex(_) => None,
			Element::Edge(e) => Some(e),
		}
	}
}

impl From<Vertex> for Element {
	fn from(v: Vertex) -> Element {
		Element::Vertex(v)
	}
}

impl From<Edge> for Element {
	fn from(e: Edge) -> Element {
		Element::Edge(e)
	}
}
