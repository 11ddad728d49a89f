use bstr::BString;
use thiserror::Error;

use crate::session::Session;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors produced while decoding session payloads.
///
/// Every variant records `at`, the cursor offset at which the failure was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// A fixed grammar byte did not match.
	#[error("expected {} at offset {at}, got {}", show_byte(.expected), show_byte(.got))]
	MismatchedByte {
		/// Byte offset of the mismatching byte.
		at: usize,
		/// Byte required by the grammar.
		expected: u8,
		/// Byte actually present.
		got: u8,
	},
	/// Type tag is not part of the format.
	#[error("unknown type tag {} at offset {at}", show_byte(.tag))]
	UnknownTag {
		/// Byte offset of the tag.
		at: usize,
		/// Offending tag byte.
		tag: u8,
	},
	/// Boolean payload was neither `0` nor `1`.
	#[error("invalid bool payload {} at offset {at}", show_byte(.got))]
	InvalidBool {
		/// Byte offset of the payload byte.
		at: usize,
		/// Offending payload byte.
		got: u8,
	},
	/// Integer payload did not parse or overflowed `i64`.
	#[error("invalid int {raw:?} at offset {at}")]
	InvalidInt {
		/// Byte offset where the payload starts.
		at: usize,
		/// Raw payload bytes.
		raw: BString,
	},
	/// Float payload did not parse.
	#[error("invalid float {raw:?} at offset {at}")]
	InvalidFloat {
		/// Byte offset where the payload starts.
		at: usize,
		/// Raw payload bytes.
		raw: BString,
	},
	/// String length prefix is not a non-negative integer.
	#[error("invalid string length {raw:?} at offset {at}")]
	InvalidStringLength {
		/// Byte offset where the prefix starts.
		at: usize,
		/// Raw prefix bytes.
		raw: BString,
	},
	/// Array or object member count is not a non-negative integer.
	#[error("invalid array length {raw:?} at offset {at}")]
	InvalidArrayLength {
		/// Byte offset where the prefix starts.
		at: usize,
		/// Raw prefix bytes.
		raw: BString,
	},
	/// Array or object key decoded to something other than an int or string.
	#[error("non-scalar {kind} key at offset {at}")]
	NonScalarKey {
		/// Byte offset where the key starts.
		at: usize,
		/// Kind of the offending key value.
		kind: &'static str,
	},
	/// Composite nesting exceeded the configured cap.
	#[error("recursion limit exceeded at offset {at} (max={max_depth})")]
	RecursionLimit {
		/// Byte offset of the composite that crossed the limit.
		at: usize,
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Declared member count exceeded the configured cap.
	#[error("array too large at offset {at}: count={count}, max={max}")]
	MemberLimit {
		/// Byte offset where the prefix starts.
		at: usize,
		/// Declared member count.
		count: usize,
		/// Maximum permitted member count.
		max: usize,
	},
}

impl SessionError {
	/// Cursor offset where the failure was detected.
	pub fn offset(&self) -> usize {
		match self {
			Self::UnexpectedEof { at, .. }
			| Self::MismatchedByte { at, .. }
			| Self::UnknownTag { at, .. }
			| Self::InvalidBool { at, .. }
			| Self::InvalidInt { at, .. }
			| Self::InvalidFloat { at, .. }
			| Self::InvalidStringLength { at, .. }
			| Self::InvalidArrayLength { at, .. }
			| Self::NonScalarKey { at, .. }
			| Self::RecursionLimit { at, .. }
			| Self::MemberLimit { at, .. } => *at,
		}
	}
}

/// Aborted session decode, carrying everything decoded before the failure.
#[derive(Debug, Error)]
#[error("{}", render_failure(.name.as_ref(), .source))]
pub struct DecodeFailure {
	/// Entries decoded before the failing one.
	pub partial: Session,
	/// Variable name of the failing entry, when it was read completely.
	pub name: Option<BString>,
	/// Underlying decode error.
	#[source]
	pub source: SessionError,
}

impl DecodeFailure {
	/// Split into the partial session and the error.
	pub fn into_parts(self) -> (Session, SessionError) {
		(self.partial, self.source)
	}
}

fn show_byte(byte: &u8) -> String {
	if byte.is_ascii_graphic() || *byte == b' ' {
		format!("'{}'", char::from(*byte))
	} else {
		format!("0x{byte:02x}")
	}
}

fn render_failure(name: Option<&BString>, source: &SessionError) -> String {
	match name {
		Some(name) => format!("can not read variable {name:?}: {source}"),
		None => format!("can not read variable name: {source}"),
	}
}
