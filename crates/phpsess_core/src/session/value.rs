use bstr::{BStr, BString, ByteSlice};
use indexmap::IndexMap;

/// Ordered member mapping of an array or object.
pub type Members = IndexMap<Key, Value>;

/// Decoded session value.
#[derive(Debug, Clone)]
pub enum Value {
	/// `N;`
	Null,
	/// `b:0;` or `b:1;`
	Bool(bool),
	/// `i:<n>;`
	Int(i64),
	/// `d:<f>;`
	Float(f64),
	/// Length-prefixed byte string, kept verbatim.
	Str(BString),
	/// Associative array with int and string keys in parse order.
	Array(Members),
	/// Class-tagged member mapping.
	Object(Object),
}

/// Serialized object: class name plus members.
#[derive(Debug, Clone)]
pub struct Object {
	/// Class name as written, never resolved.
	pub class: BString,
	/// Member values in parse order.
	pub members: Members,
}

/// Array or object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
	/// Integer key.
	Int(i64),
	/// Byte string key.
	Str(BString),
}

/// Value discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	/// [`Value::Null`]
	Null,
	/// [`Value::Bool`]
	Bool,
	/// [`Value::Int`]
	Int,
	/// [`Value::Float`]
	Float,
	/// [`Value::Str`]
	Str,
	/// [`Value::Array`]
	Array,
	/// [`Value::Object`]
	Object,
}

impl ValueKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Float => "float",
			Self::Str => "string",
			Self::Array => "array",
			Self::Object => "object",
		}
	}
}

impl Value {
	/// Discriminant of this value.
	pub fn kind(&self) -> ValueKind {
		match self {
			Self::Null => ValueKind::Null,
			Self::Bool(_) => ValueKind::Bool,
			Self::Int(_) => ValueKind::Int,
			Self::Float(_) => ValueKind::Float,
			Self::Str(_) => ValueKind::Str,
			Self::Array(_) => ValueKind::Array,
			Self::Object(_) => ValueKind::Object,
		}
	}

	/// Whether this is [`Value::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Boolean payload.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Integer payload.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Float payload.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(v) => Some(*v),
			_ => None,
		}
	}

	/// Raw string bytes.
	pub fn as_bytes(&self) -> Option<&BStr> {
		match self {
			Self::Str(v) => Some(v.as_bstr()),
			_ => None,
		}
	}

	/// String payload when it is valid UTF-8.
	pub fn as_str(&self) -> Option<&str> {
		self.as_bytes().and_then(|bytes| bytes.to_str().ok())
	}

	/// Array members.
	pub fn as_array(&self) -> Option<&Members> {
		match self {
			Self::Array(members) => Some(members),
			_ => None,
		}
	}

	/// Object payload.
	pub fn as_object(&self) -> Option<&Object> {
		match self {
			Self::Object(object) => Some(object),
			_ => None,
		}
	}

	/// Member lookup on arrays and objects.
	pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
		let members = match self {
			Self::Array(members) => members,
			Self::Object(object) => &object.members,
			_ => return None,
		};
		let key: Key = key.into();
		members.get(&key)
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Null, Self::Null) => true,
			(Self::Bool(left), Self::Bool(right)) => left == right,
			(Self::Int(left), Self::Int(right)) => left == right,
			(Self::Float(left), Self::Float(right)) => left.to_bits() == right.to_bits(),
			(Self::Str(left), Self::Str(right)) => left == right,
			(Self::Array(left), Self::Array(right)) => members_eq(left, right),
			(Self::Object(left), Self::Object(right)) => left == right,
			_ => false,
		}
	}
}

impl PartialEq for Object {
	fn eq(&self, other: &Self) -> bool {
		self.class == other.class && members_eq(&self.members, &other.members)
	}
}

/// Order-sensitive member comparison; `IndexMap` equality ignores order.
fn members_eq(left: &Members, right: &Members) -> bool {
	left.len() == right.len() && left.iter().zip(right.iter()).all(|(l, r)| l == r)
}

impl From<i64> for Key {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<&str> for Key {
	fn from(value: &str) -> Self {
		Self::Str(BString::from(value))
	}
}

impl From<&[u8]> for Key {
	fn from(value: &[u8]) -> Self {
		Self::Str(BString::from(value))
	}
}

impl From<BString> for Key {
	fn from(value: BString) -> Self {
		Self::Str(value)
	}
}

impl TryFrom<Value> for Key {
	type Error = ValueKind;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Int(v) => Ok(Self::Int(v)),
			Value::Str(v) => Ok(Self::Str(v)),
			other => Err(other.kind()),
		}
	}
}

impl From<Key> for Value {
	fn from(key: Key) -> Self {
		match key {
			Key::Int(v) => Self::Int(v),
			Key::Str(v) => Self::Str(v),
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::Str(BString::from(value))
	}
}

impl From<Object> for Value {
	fn from(value: Object) -> Self {
		Self::Object(value)
	}
}
