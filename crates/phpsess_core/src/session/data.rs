use bstr::{BStr, BString};
use indexmap::IndexMap;

use crate::session::Value;

/// Decoded session: variable names mapped to values in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Session {
	entries: IndexMap<BString, Value>,
}

impl Session {
	/// Create an empty session.
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert or replace a variable. A replaced name keeps its original slot.
	pub fn insert(&mut self, name: impl Into<BString>, value: Value) -> Option<Value> {
		self.entries.insert(name.into(), value)
	}

	/// Look up a variable by name.
	pub fn get(&self, name: impl AsRef<[u8]>) -> Option<&Value> {
		self.entries.get(BStr::new(name.as_ref()))
	}

	/// Number of variables.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the session holds no variables.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Variable names in order.
	pub fn names(&self) -> impl Iterator<Item = &BString> {
		self.entries.keys()
	}

	/// Iterate `(name, value)` pairs in order.
	pub fn iter(&self) -> indexmap::map::Iter<'_, BString, Value> {
		self.entries.iter()
	}
}

impl PartialEq for Session {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().zip(other.iter()).all(|(l, r)| l == r)
	}
}

impl<'a> IntoIterator for &'a Session {
	type Item = (&'a BString, &'a Value);
	type IntoIter = indexmap::map::Iter<'a, BString, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}

impl IntoIterator for Session {
	type Item = (BString, Value);
	type IntoIter = indexmap::map::IntoIter<BString, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

impl<N: Into<BString>> FromIterator<(N, Value)> for Session {
	fn from_iter<I: IntoIterator<Item = (N, Value)>>(iter: I) -> Self {
		let mut session = Self::new();
		for (name, value) in iter {
			session.insert(name, value);
		}
		session
	}
}
