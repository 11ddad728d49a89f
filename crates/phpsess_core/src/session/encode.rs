use std::io::Write as _;

use crate::session::value::{Key, Members, Value};
use crate::session::Session;

/// Encode a session as `name|value` entries.
pub fn encode(session: &Session) -> Vec<u8> {
	let mut out = Vec::new();
	for (name, value) in session {
		out.extend_from_slice(name);
		out.push(b'|');
		encode_value(value, &mut out);
	}
	out
}

/// Append one encoded value to `out`.
pub fn encode_value(value: &Value, out: &mut Vec<u8>) {
	match value {
		Value::Null => out.extend_from_slice(b"N;"),
		Value::Bool(v) => out.extend_from_slice(if *v { b"b:1;" } else { b"b:0;" }),
		Value::Int(v) => write_scalar(out, b'i', format_args!("{v}")),
		Value::Float(v) => write_float(out, *v),
		Value::Str(v) => {
			out.extend_from_slice(b"s:");
			write_string(out, v);
			out.push(b';');
		}
		Value::Array(members) => {
			out.extend_from_slice(b"a:");
			write_members(out, members);
		}
		Value::Object(object) => {
			out.extend_from_slice(b"O:");
			write_string(out, &object.class);
			out.push(b':');
			write_members(out, &object.members);
		}
	}
}

fn write_scalar(out: &mut Vec<u8>, tag: u8, payload: std::fmt::Arguments<'_>) {
	out.push(tag);
	out.push(b':');
	// Writing into a Vec never fails.
	let _ = out.write_fmt(payload);
	out.push(b';');
}

fn write_float(out: &mut Vec<u8>, value: f64) {
	if value.is_nan() {
		out.extend_from_slice(b"d:NAN;");
	} else if value.is_infinite() {
		out.extend_from_slice(if value > 0.0 { &b"d:INF;"[..] } else { &b"d:-INF;"[..] });
	} else {
		// Exponent form outside [1e-4, 1e15), spelled `1.0E+25` / `1.5E-5`.
		let sci = format!("{value:e}");
		let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
		let exp: i32 = exp.parse().unwrap_or(0);
		if (-4..15).contains(&exp) {
			write_scalar(out, b'd', format_args!("{value}"));
		} else {
			let frac = if mantissa.contains('.') { "" } else { ".0" };
			let sign = if exp < 0 { '-' } else { '+' };
			write_scalar(out, b'd', format_args!("{mantissa}{frac}E{sign}{}", exp.unsigned_abs()));
		}
	}
}

fn write_string(out: &mut Vec<u8>, bytes: &[u8]) {
	let _ = write!(out, "{}:\"", bytes.len());
	out.extend_from_slice(bytes);
	out.push(b'"');
}

fn write_members(out: &mut Vec<u8>, members: &Members) {
	let _ = write!(out, "{}:{{", members.len());
	for (key, value) in members {
		match key {
			Key::Int(v) => write_scalar(out, b'i', format_args!("{v}")),
			Key::Str(v) => {
				out.extend_from_slice(b"s:");
				write_string(out, v);
				out.push(b';');
			}
		}
		encode_value(value, out);
	}
	out.push(b'}');
}

#[cfg(test)]
mod tests {
	use bstr::BString;

	use crate::session::{Key, Members, Object, Session, Value, decode, encode, encode_value};

	fn encoded(value: &Value) -> String {
		let mut out = Vec::new();
		encode_value(value, &mut out);
		String::from_utf8(out).expect("test values are utf-8")
	}

	#[test]
	fn encodes_scalars() {
		assert_eq!(encoded(&Value::Null), "N;");
		assert_eq!(encoded(&Value::Bool(true)), "b:1;");
		assert_eq!(encoded(&Value::Int(-3)), "i:-3;");
		assert_eq!(encoded(&Value::Float(0.1)), "d:0.1;");
		assert_eq!(encoded(&Value::Float(2.0)), "d:2;");
		assert_eq!(encoded(&Value::Float(f64::NEG_INFINITY)), "d:-INF;");
		assert_eq!(encoded(&Value::Float(f64::NAN)), "d:NAN;");
		assert_eq!(encoded(&Value::from("héllo")), "s:6:\"héllo\";");
	}

	#[test]
	fn encodes_object_members_in_order() {
		let mut members = Members::new();
		members.insert(Key::from("id"), Value::Int(7));
		members.insert(Key::Int(3), Value::from("Bob"));
		let value = Value::Object(Object {
			class: BString::from("User"),
			members,
		});
		assert_eq!(encoded(&value), "O:4:\"User\":2:{s:2:\"id\";i:7;i:3;s:3:\"Bob\";}");
	}

	#[test]
	fn session_round_trips_byte_for_byte() {
		let input: &[u8] = b"name|s:5:\"Alice\";arr|a:2:{i:0;s:1:\"a\";i:1;s:1:\"b\";}x|N;f|d:-0.25;u|O:4:\"User\":0:{}";
		let session = decode(input).expect("session decodes");
		assert_eq!(encode(&session), input);
	}

	#[test]
	fn large_and_small_floats_use_exponent_form() {
		assert_eq!(encoded(&Value::Float(1.0e25)), "d:1.0E+25;");
		assert_eq!(encoded(&Value::Float(1.0e15)), "d:1.0E+15;");
		assert_eq!(encoded(&Value::Float(-1.5e-5)), "d:-1.5E-5;");
		assert_eq!(encoded(&Value::Float(1.0e14)), "d:100000000000000;");
		assert_eq!(encoded(&Value::Float(0.0001)), "d:0.0001;");
		assert_eq!(encoded(&Value::Float(-0.0)), "d:-0;");
	}

	#[test]
	fn exponent_floats_round_trip_byte_for_byte() {
		for input in ["f|d:1.0E+25;", "f|d:1.0E-5;", "f|d:1.0E+15;", "f|d:-1.5E+30;"] {
			let session = decode(input).expect("session decodes");
			assert_eq!(encode(&session), input.as_bytes(), "{input}");
		}
	}

	#[test]
	fn empty_session_encodes_to_nothing() {
		assert!(encode(&Session::new()).is_empty());
	}
}
