use crate::err::Error;
use regex::bytes::{Regex, RegexBuilder};
use std::fmt;

/// A filter evaluated by the store while scanning or deleting.
///
/// Timestamp windows are inclusive on both ends. Regex filters match one
/// cell component against a byte-oriented pattern.
#[derive(Clone, Debug)]
pub enum Filter {
	/// Keep versions whose timestamp falls inside the window
	Timestamp {
		start: Option<u64>,
		end: Option<u64>,
	},
	/// Keep cells whose row matches the pattern
	Row(CellRegex),
	/// Keep cells whose qualifier matches the pattern
	Qualifier(CellRegex),
	/// Keep versions whose value matches the pattern
	Value(CellRegex),
}

impl Filter {
	/// Build an inclusive timestamp window filter.
	pub fn timestamp(start: Option<u64>, end: Option<u64>) -> Filter {
		Filter::Timestamp {
			start,
			end,
		}
	}

	/// Build a row regex filter from a pattern.
	pub fn row_regex(pattern: &str) -> Result<Filter, Error> {
		Ok(Filter::Row(CellRegex::new(pattern)?))
	}

	/// Build a qualifier regex filter from a pattern.
	pub fn qualifier_regex(pattern: &str) -> Result<Filter, Error> {
		Ok(Filter::Qualifier(CellRegex::new(pattern)?))
	}

	/// Build a value regex filter from a pattern.
	pub fn value_regex(pattern: &str) -> Result<Filter, Error> {
		Ok(Filter::Value(CellRegex::new(pattern)?))
	}

	/// Check the cell-level components of a candidate cell.
	pub(crate) fn allows_cell(&self, row: &[u8], qualifier: &[u8]) -> bool {
		match self {
			Filter::Row(regex) => regex.is_match(row),
			Filter::Qualifier(regex) => regex.is_match(qualifier),
			_ => true,
		}
	}

	/// Check the version-level components of a candidate version.
	pub(crate) fn allows_version(&self, ts: u64, value: &[u8]) -> bool {
		match self {
			Filter::Timestamp {
				start,
				end,
			} => start.map_or(true, |s| ts >= s) && end.map_or(true, |e| ts <= e),
			Filter::Value(regex) => regex.is_match(value),
			_ => true,
		}
	}
}

/// A byte-oriented regular expression over one cell component.
#[derive(Clone)]
pub struct CellRegex(Regex);

impl CellRegex {
	/// Compile a pattern in byte mode, with `.` matching any byte.
	pub fn new(pattern: &str) -> Result<CellRegex, Error> {
		let regex = RegexBuilder::new(pattern)
			.unicode(false)
			.dot_matches_new_line(true)
			.build()?;
		Ok(CellRegex(regex))
	}

	pub fn is_match(&self, bytes: &[u8]) -> bool {
		self.0.is_match(bytes)
	}
}

impl fmt::Debug for CellRegex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "CellRegex({})", self.0.as_str())
	}
}

/// Render arbitrary bytes as a literal regex fragment.
///
/// Encoded property values are not generally valid UTF-8, so literal
/// fragments are written as hex escapes rather than quoted text.
pub fn literal(bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len() * 4);
	for byte in bytes {
		out.push_str(&format!("\\x{byte:02x}"));
	}
	out
}
