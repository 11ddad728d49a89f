use std::io::Read;
use std::path::Path;

use bstr::ByteSlice;
use phpsess::session::{DecodeOptions, Key};

use crate::cmd::{CliError, Result};

/// Read the whole input, treating `-` as stdin.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
	let read_err = |source: std::io::Error| CliError::Read {
		path: path.to_path_buf(),
		source,
	};

	let input = if path == Path::new("-") {
		let mut buf = Vec::new();
		std::io::stdin().read_to_end(&mut buf).map_err(read_err)?;
		buf
	} else {
		std::fs::read(path).map_err(read_err)?
	};
	tracing::debug!(path = %path_label(path), bytes = input.len(), "read session input");
	Ok(input)
}

/// Build decode options from optional CLI overrides.
pub(crate) fn decode_options(max_depth: Option<u32>, max_members: Option<usize>) -> DecodeOptions {
	let mut decode = DecodeOptions::default();
	if let Some(max_depth) = max_depth {
		decode.max_depth = max_depth;
	}
	if let Some(max_members) = max_members {
		decode.max_members = max_members;
	}
	decode
}

/// Render bytes as a quoted label, escaping anything non-printable.
pub(crate) fn quote_bytes(bytes: &[u8]) -> String {
	format!("{:?}", bytes.as_bstr())
}

/// Render an array key as `[0]` or `["name"]`.
pub(crate) fn key_label(key: &Key) -> String {
	match key {
		Key::Int(v) => format!("[{v}]"),
		Key::Str(v) => format!("[{}]", quote_bytes(v)),
	}
}

/// Display label for an input path.
pub(crate) fn path_label(path: &Path) -> String {
	if path.as_os_str() == "-" { "<stdin>".to_owned() } else { path.display().to_string() }
}

#[cfg(test)]
mod tests {
	use phpsess::session::Key;

	use super::{decode_options, key_label, quote_bytes};

	#[test]
	fn quote_bytes_escapes_control_and_invalid_utf8() {
		assert_eq!(quote_bytes(b"a\"b"), "\"a\\\"b\"");
		assert_eq!(quote_bytes(b"\0*\0p"), "\"\\0*\\0p\"");
		assert_eq!(quote_bytes(b"\xff"), "\"\\xFF\"");
	}

	#[test]
	fn key_labels_keep_variant() {
		assert_eq!(key_label(&Key::Int(3)), "[3]");
		assert_eq!(key_label(&Key::from("3")), "[\"3\"]");
	}

	#[test]
	fn overrides_apply_to_defaults() {
		let decode = decode_options(Some(4), None);
		assert_eq!(decode.max_depth, 4);
		assert_eq!(decode.max_members, 1 << 20);
	}
}
