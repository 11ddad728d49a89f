use crate::session::{Result, SessionError};

/// Forward-only cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Whether every byte has been consumed.
	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	/// Return the next byte without advancing.
	pub fn peek(&self) -> Option<u8> {
		self.bytes.get(self.pos).copied()
	}

	/// Consume and return the next byte.
	pub fn read(&mut self) -> Result<u8> {
		let byte = self.peek().ok_or(SessionError::UnexpectedEof {
			at: self.pos,
			need: 1,
			rem: 0,
		})?;
		self.pos += 1;
		Ok(byte)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(SessionError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read bytes up to `stop`, consuming the stop byte but not returning it.
	pub fn read_until(&mut self, stop: u8) -> Result<&'a [u8]> {
		let start = self.pos;
		let rem = &self.bytes[start.min(self.bytes.len())..];
		let Some(rel_end) = rem.iter().position(|byte| *byte == stop) else {
			return Err(SessionError::UnexpectedEof {
				at: self.bytes.len(),
				need: 1,
				rem: 0,
			});
		};

		let end = start + rel_end;
		self.pos = end + 1;
		Ok(&self.bytes[start..end])
	}

	/// Consume one byte and require it to equal `expected`.
	pub fn expect(&mut self, expected: u8) -> Result<()> {
		let at = self.pos;
		let got = self.read()?;
		if got != expected {
			return Err(SessionError::MismatchedByte { at, expected, got });
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::Cursor;
	use crate::session::SessionError;

	#[test]
	fn read_until_consumes_stop_byte() {
		let mut cursor = Cursor::new(b"name|rest");
		assert_eq!(cursor.read_until(b'|').expect("stop byte present"), b"name");
		assert_eq!(cursor.pos(), 5);
		assert_eq!(cursor.peek(), Some(b'r'));
	}

	#[test]
	fn read_until_without_stop_reports_eof() {
		let mut cursor = Cursor::new(b"abc");
		let err = cursor.read_until(b';').expect_err("missing stop byte should fail");
		assert_eq!(err, SessionError::UnexpectedEof { at: 3, need: 1, rem: 0 });
	}

	#[test]
	fn read_exact_reports_shortfall() {
		let mut cursor = Cursor::new(b"ab");
		let _ = cursor.read().expect("one byte");
		let err = cursor.read_exact(4).expect_err("short read should fail");
		assert_eq!(err, SessionError::UnexpectedEof { at: 1, need: 4, rem: 1 });
	}

	#[test]
	fn expect_fails_only_on_mismatch() {
		let mut cursor = Cursor::new(b"{}");
		cursor.expect(b'{').expect("matching byte passes");
		let err = cursor.expect(b';').expect_err("mismatching byte fails");
		assert_eq!(
			err,
			SessionError::MismatchedByte {
				at: 1,
				expected: b';',
				got: b'}'
			}
		);
		let err = cursor.expect(b'}').expect_err("exhausted input fails");
		assert!(matches!(err, SessionError::UnexpectedEof { at: 2, .. }));
	}
}
