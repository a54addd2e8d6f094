//! The core library of the Gravel property-graph engine.
//!
//! Gravel maps a property graph (vertices, edges, properties, indices)
//! onto a small fixed set of sorted, versioned key-value tables. The [`gph`] module holds the graph engine itself,
//! the [`key`] module defines how graph elements are laid out as cells,
//! and the [`kvs`] module defines the store contract the engine runs on,
//! together with the built-in in-memory store.

#[macro_use]
extern crate tracing;

#[macro_use]
mod mac;

pub mod cache;
pub mod cfg;
pub mod cnf;
pub mod err;
pub mod gph;
pub mod key;
pub mod kvs;
pub mod val;

pub use self::cfg::GraphConfig;
pub use self::err::Error;
pub use self::gph::{Direction, Edge, Element, Graph, Index, Kind, Vertex};
pub use self::val::Value;
