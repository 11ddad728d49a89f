use bstr::BString;

use crate::session::bytes::Cursor;
use crate::session::value::{Key, Members, Object, Value, ValueKind};
use crate::session::{DecodeFailure, Result, Session, SessionError};

const NAME_SEPARATOR: u8 = b'|';
const TYPE_SEPARATOR: u8 = b':';
const TERMINATOR: u8 = b';';
const OPEN_BRACE: u8 = b'{';
const CLOSE_BRACE: u8 = b'}';
const QUOTE: u8 = b'"';

/// Runtime limits for session decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum composite nesting depth.
	pub max_depth: u32,
	/// Maximum declared member count of one array or object.
	pub max_members: usize,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 512,
			max_members: 1 << 20,
		}
	}
}

/// Top-level decoder producing a [`Session`] from `name|value` entries.
pub struct SessionDecoder<'a> {
	cursor: Cursor<'a>,
	options: DecodeOptions,
}

impl<'a> SessionDecoder<'a> {
	/// Create a decoder with default options.
	pub fn new(input: &'a [u8]) -> Self {
		Self::with_options(input, DecodeOptions::default())
	}

	/// Create a decoder with explicit options.
	pub fn with_options(input: &'a [u8], options: DecodeOptions) -> Self {
		Self {
			cursor: Cursor::new(input),
			options,
		}
	}

	/// Current input offset.
	pub fn pos(&self) -> usize {
		self.cursor.pos()
	}

	/// Bytes not yet consumed.
	pub fn remaining(&self) -> usize {
		self.cursor.remaining()
	}

	/// Decode every remaining entry.
	///
	/// Stops cleanly when input is exhausted at an entry boundary. Any other
	/// failure aborts and hands back the entries decoded so far.
	pub fn decode(&mut self) -> std::result::Result<Session, DecodeFailure> {
		let mut session = Session::new();

		while !self.cursor.is_empty() {
			let entry_at = self.cursor.pos();
			let name = match self.cursor.read_until(NAME_SEPARATOR) {
				Ok(name) => BString::from(name),
				Err(source) => return Err(self.fail(session, None, source)),
			};

			match decode_tree(&mut self.cursor, &self.options) {
				Ok(value) => {
					tracing::trace!(name = ?name, at = entry_at, kind = value.kind().as_str(), "decoded session entry");
					session.insert(name, value);
				}
				Err(source) => return Err(self.fail(session, Some(name), source)),
			}
		}

		Ok(session)
	}

	/// Decode a single value at the current offset.
	///
	/// Returns `Ok(None)` when the input is already exhausted.
	pub fn decode_value(&mut self) -> Result<Option<Value>> {
		decode_value(&mut self.cursor, &self.options)
	}

	fn fail(&self, partial: Session, name: Option<BString>, source: SessionError) -> DecodeFailure {
		tracing::debug!(name = ?name, at = source.offset(), entries = partial.len(), error = %source, "session decode aborted");
		DecodeFailure { partial, name, source }
	}
}

/// Decode a whole session payload with default options.
pub fn decode(input: impl AsRef<[u8]>) -> std::result::Result<Session, DecodeFailure> {
	SessionDecoder::new(input.as_ref()).decode()
}

/// Decode a whole session payload with explicit options.
pub fn decode_with_options(input: impl AsRef<[u8]>, opt: &DecodeOptions) -> std::result::Result<Session, DecodeFailure> {
	SessionDecoder::with_options(input.as_ref(), opt.clone()).decode()
}

/// Decode one value from `cursor`, or `Ok(None)` if no bytes remain.
pub fn decode_value(cursor: &mut Cursor<'_>, opt: &DecodeOptions) -> Result<Option<Value>> {
	if cursor.is_empty() {
		return Ok(None);
	}
	decode_tree(cursor, opt).map(Some)
}

/// Array or object whose members are still being read.
struct Frame {
	class: Option<BString>,
	members: Members,
	left: usize,
	key: Option<Key>,
}

impl Frame {
	fn kind(&self) -> ValueKind {
		if self.class.is_some() { ValueKind::Object } else { ValueKind::Array }
	}

	fn into_value(self) -> Value {
		match self.class {
			Some(class) => Value::Object(Object { class, members: self.members }),
			None => Value::Array(self.members),
		}
	}
}

enum Token {
	Scalar(Value),
	Open(Frame),
}

/// Decode one complete value.
///
/// Open composites live on an explicit stack, so nesting costs heap rather
/// than call frames.
fn decode_tree(cursor: &mut Cursor<'_>, opt: &DecodeOptions) -> Result<Value> {
	let mut stack: Vec<Frame> = Vec::new();

	loop {
		let at = cursor.pos();
		let reading_key = stack.last().is_some_and(|frame| frame.key.is_none());
		let mut value = match decode_token(cursor, opt, stack.len(), at)? {
			Token::Scalar(value) => value,
			Token::Open(frame) if reading_key => {
				return Err(SessionError::NonScalarKey {
					at,
					kind: frame.kind().as_str(),
				});
			}
			Token::Open(frame) if frame.left > 0 => {
				stack.push(frame);
				continue;
			}
			Token::Open(frame) => {
				cursor.expect(CLOSE_BRACE)?;
				frame.into_value()
			}
		};

		// Hand `value` to the innermost frame, closing every frame it completes.
		loop {
			let Some(mut frame) = stack.pop() else {
				return Ok(value);
			};
			let Some(key) = frame.key.take() else {
				let key = Key::try_from(value).map_err(|kind| SessionError::NonScalarKey { at, kind: kind.as_str() })?;
				frame.key = Some(key);
				stack.push(frame);
				break;
			};

			frame.members.insert(key, value);
			frame.left -= 1;
			if frame.left > 0 {
				stack.push(frame);
				break;
			}
			cursor.expect(CLOSE_BRACE)?;
			value = frame.into_value();
		}
	}
}

/// Read one scalar, or the header of a composite up to and including `{`.
fn decode_token(cursor: &mut Cursor<'_>, opt: &DecodeOptions, depth: usize, at: usize) -> Result<Token> {
	let tag = cursor.read()?;
	if tag == b'N' {
		cursor.expect(TERMINATOR)?;
		return Ok(Token::Scalar(Value::Null));
	}
	if !matches!(tag, b'b' | b'i' | b'd' | b's' | b'a' | b'O') {
		return Err(SessionError::UnknownTag { at, tag });
	}
	cursor.expect(TYPE_SEPARATOR)?;

	let value = match tag {
		b'b' => {
			let payload_at = cursor.pos();
			let value = match cursor.read()? {
				b'0' => false,
				b'1' => true,
				got => return Err(SessionError::InvalidBool { at: payload_at, got }),
			};
			cursor.expect(TERMINATOR)?;
			Value::Bool(value)
		}
		b'i' => {
			let payload_at = cursor.pos();
			let raw = cursor.read_until(TERMINATOR)?;
			let value = parse_int(raw).ok_or_else(|| SessionError::InvalidInt {
				at: payload_at,
				raw: BString::from(raw),
			})?;
			Value::Int(value)
		}
		b'd' => {
			let payload_at = cursor.pos();
			let raw = cursor.read_until(TERMINATOR)?;
			let value = parse_float(raw).ok_or_else(|| SessionError::InvalidFloat {
				at: payload_at,
				raw: BString::from(raw),
			})?;
			Value::Float(value)
		}
		b's' => {
			let value = decode_string(cursor)?;
			cursor.expect(TERMINATOR)?;
			Value::Str(value)
		}
		b'a' => {
			check_depth(opt, depth, at)?;
			return open_members(cursor, opt, None).map(Token::Open);
		}
		_ => {
			check_depth(opt, depth, at)?;
			let class = decode_string(cursor)?;
			cursor.expect(TYPE_SEPARATOR)?;
			return open_members(cursor, opt, Some(class)).map(Token::Open);
		}
	};

	Ok(Token::Scalar(value))
}

fn check_depth(opt: &DecodeOptions, depth: usize, at: usize) -> Result<()> {
	if depth >= opt.max_depth as usize {
		return Err(SessionError::RecursionLimit { at, max_depth: opt.max_depth });
	}
	Ok(())
}

/// Read `<len>:"<bytes>"` without the trailing terminator.
fn decode_string(cursor: &mut Cursor<'_>) -> Result<BString> {
	let at = cursor.pos();
	let raw = cursor.read_until(TYPE_SEPARATOR)?;
	let len = parse_len(raw).ok_or_else(|| SessionError::InvalidStringLength { at, raw: BString::from(raw) })?;

	cursor.expect(QUOTE)?;
	let bytes = cursor.read_exact(len)?;
	cursor.expect(QUOTE)?;
	Ok(BString::from(bytes))
}

/// Read `<len>:{` and set up a frame for the members that follow.
fn open_members(cursor: &mut Cursor<'_>, opt: &DecodeOptions, class: Option<BString>) -> Result<Frame> {
	let len_at = cursor.pos();
	let raw = cursor.read_until(TYPE_SEPARATOR)?;
	let count = parse_len(raw).ok_or_else(|| SessionError::InvalidArrayLength {
		at: len_at,
		raw: BString::from(raw),
	})?;
	if count > opt.max_members {
		return Err(SessionError::MemberLimit {
			at: len_at,
			count,
			max: opt.max_members,
		});
	}

	cursor.expect(OPEN_BRACE)?;
	// Smallest pair is `i:0;N;`, so the remaining input bounds the real count.
	Ok(Frame {
		class,
		members: Members::with_capacity(count.min(cursor.remaining() / 6)),
		left: count,
		key: None,
	})
}

fn parse_len(raw: &[u8]) -> Option<usize> {
	if raw.is_empty() {
		return None;
	}

	let mut value = 0_usize;
	for byte in raw {
		if !byte.is_ascii_digit() {
			return None;
		}
		value = value.checked_mul(10)?.checked_add(usize::from(*byte - b'0'))?;
	}
	Some(value)
}

/// Canonical integers only: no `+`, no leading zeros, no `-0`.
fn parse_int(raw: &[u8]) -> Option<i64> {
	let (negative, digits) = match raw.strip_prefix(b"-") {
		Some(digits) => (true, digits),
		None => (false, raw),
	};
	if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
		return None;
	}
	if (digits.len() > 1 && digits[0] == b'0') || (negative && digits == b"0") {
		return None;
	}
	std::str::from_utf8(raw).ok()?.parse().ok()
}

fn parse_float(raw: &[u8]) -> Option<f64> {
	match raw {
		b"INF" => Some(f64::INFINITY),
		b"-INF" => Some(f64::NEG_INFINITY),
		b"NAN" => Some(f64::NAN),
		_ => {
			let text = std::str::from_utf8(raw).ok()?;
			if !text.bytes().all(|byte| byte.is_ascii_digit() || matches!(byte, b'-' | b'+' | b'.' | b'e' | b'E')) {
				return None;
			}
			text.parse().ok()
		}
	}
}
