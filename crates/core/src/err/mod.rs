use crate::gph::Kind;
use thiserror::Error;

/// The errors raised by the graph engine.
///
/// Argument validation errors are raised before any store call is made.
/// Failures inside the underlying key-value store surface as [`Error::Store`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// No id was provided where one is required
	#[error("No element id was provided")]
	NullId,

	/// No label was provided when creating an edge
	#[error("No edge label was provided")]
	NullLabel,

	/// A property cell held no value bytes
	#[error("No value was provided for the property")]
	NullProperty,

	/// The property key was empty
	#[error("The property key is empty")]
	EmptyKey,

	/// The property key is reserved by the engine
	#[error("The property key '{0}' is reserved")]
	ReservedKey(String),

	/// The element id contains bytes reserved by the cell layout
	#[error("The id '{0}' contains reserved characters")]
	InvalidId(String),

	/// The edge label contains bytes reserved by the cell layout
	#[error("The label '{0}' contains reserved characters")]
	InvalidLabel(String),

	/// An element with this id already exists
	#[error("An element with the id '{0}' already exists")]
	DuplicateId(String),

	/// The element does not exist
	#[error("The element '{0}' does not exist")]
	NotFound(String),

	/// The timestamp filter was misconfigured
	#[error("The timestamp filter is invalid")]
	InvalidFilter,

	/// A value predicate was requested on an opaque property value
	#[error("Value predicates are not supported on opaque property values")]
	UnsupportedFilter,

	/// A named index with this name already exists
	#[error("An index with the name '{0}' already exists")]
	IndexAlreadyExists(String),

	/// The named index stores a different kind of element
	#[error("The index '{0}' does not index {1} elements")]
	IndexClassMismatch(String, Kind),

	/// Index management is disabled for this graph
	#[error("Indexing is disabled for this graph")]
	IndexingDisabled,

	/// The graph handle or its writer has been shut down
	#[error("The graph has been shut down")]
	Closed,

	/// A value or cell could not be encoded or decoded
	#[error("There was a problem encoding or decoding data: {0}")]
	Encoding(String),

	/// There was a problem with the underlying key-value store
	#[error("There was a problem with the underlying datastore: {0}")]
	Store(String),
}

impl From<regex::Error> for Error {
	fn from(e: regex::Error) -> Error {
		Error::Encoding(e.to_string())
	}
}

impl From<bincode::Error> for Error {
	fn from(e: bincode::Error) -> Error {
		Error::Encoding(e.to_string())
	}
}

impl From<std::string::FromUtf8Error> for Error {
	fn from(e: std::string::FromUtf8Error) -> Error {
		Error::Encoding(e.to_string())
	}
}
