//! The per-caller time-travel filter.
//!
//! Each thread may hold one timestamp window per graph instance. The
//! window is attached to element scans opened by read operations on that
//! thread, and never to index scans, write-path scans or writers, so
//! enabling it on one thread cannot affect scans issued on another.
use crate::err::Error;
use crate::kvs::Filter;
use std::cell::RefCell;
use std::collections::HashMap;
use uuid::Uuid;

/// An inclusive timestamp window over the graph history.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeSpan {
	pub start: Option<u64>,
	pub end: Option<u64>,
}

impl TimeSpan {
	/// Build a window, rejecting empty and inverted configurations.
	pub fn new(start: Option<u64>, end: Option<u64>) -> Result<TimeSpan, Error> {
		// At least one bound must be provided
		if start.is_none() && end.is_none() {
			return Err(Error::InvalidFilter);
		}
		// When both bounds are provided they must be ordered
		if let (Some(start), Some(end)) = (start, end) {
			if start > end {
				return Err(Error::InvalidFilter);
			}
		}
		Ok(TimeSpan {
			start,
			end,
		})
	}

	/// The server-side filter for this window.
	pub(crate) fn filter(&self) -> Filter {
		Filter::timestamp(self.start, self.end)
	}
}

thread_local! {
	/// The active windows of this thread, keyed by graph instance
	static ACTIVE: RefCell<HashMap<Uuid, TimeSpan>> = RefCell::new(HashMap::new());
}

/// Set the window of a graph instance on this thread.
pub(crate) fn enable(graph: Uuid, span: TimeSpan) {
	ACTIVE.with(|active| {
		active.borrow_mut().insert(graph, span);
	});
}

/// Clear the window of a graph instance on this thread.
pub(crate) fn disable(graph: Uuid) {
	ACTIVE.with(|active| {
		active.borrow_mut().remove(&graph);
	});
}

/// The window of a graph instance on this thread, if any.
pub(crate) fn current(graph: Uuid) -> Option<TimeSpan> {
	ACTIVE.with(|active| active.borrow().get(&graph).copied())
}
