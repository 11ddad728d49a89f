use std::fmt::Write as _;

use phpsess::session::{Members, Session, Value};

use crate::cmd::util::{key_label, quote_bytes};

/// Output truncation limits for decoded values.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of bytes printed for strings.
	pub max_string_len: usize,
	/// Maximum number of members printed per array or object.
	pub max_members: usize,
	/// Maximum recursive print depth for nested composites.
	pub max_print_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_string_len: 200,
			max_members: 64,
			max_print_depth: 8,
		}
	}
}

/// Render every session entry as `name = value`.
pub fn render_session(session: &Session, options: PrintOptions) -> String {
	let mut out = String::new();
	for (name, value) in session {
		let _ = write!(out, "{} = ", quote_bytes(name));
		render_value(&mut out, value, 0, 0, options);
	}
	out
}

/// Render one value tree; composites span multiple lines.
pub fn render_value(out: &mut String, value: &Value, indent: usize, depth: u32, options: PrintOptions) {
	match value {
		Value::Null => out.push_str("null\n"),
		Value::Bool(v) => {
			let _ = writeln!(out, "{v}");
		}
		Value::Int(v) => {
			let _ = writeln!(out, "{v}");
		}
		Value::Float(v) => {
			let _ = writeln!(out, "{}", format_float(*v));
		}
		Value::Str(v) => {
			let _ = writeln!(out, "{}", truncate(v, options.max_string_len));
		}
		Value::Array(members) => {
			let _ = write!(out, "array({})", members.len());
			render_members(out, members, indent, depth, options);
		}
		Value::Object(object) => {
			let _ = write!(out, "object {}({})", quote_bytes(&object.class), object.members.len());
			render_members(out, &object.members, indent, depth, options);
		}
	}
}

fn render_members(out: &mut String, members: &Members, indent: usize, depth: u32, options: PrintOptions) {
	if members.is_empty() {
		out.push_str(" {}\n");
		return;
	}
	if depth >= options.max_print_depth {
		out.push_str(" { ... }\n");
		return;
	}

	let pad = " ".repeat(indent + 2);
	out.push_str(" {\n");
	for (key, value) in members.iter().take(options.max_members) {
		let _ = write!(out, "{pad}{} => ", key_label(key));
		render_value(out, value, indent + 2, depth + 1, options);
	}
	if members.len() > options.max_members {
		let _ = writeln!(out, "{pad}... {} more", members.len() - options.max_members);
	}
	let _ = writeln!(out, "{}}}", " ".repeat(indent));
}

/// Float text in the same spelling the encoder uses.
pub(crate) fn format_float(value: f64) -> String {
	if value.is_nan() {
		"NAN".to_owned()
	} else if value.is_infinite() {
		if value > 0.0 { "INF".to_owned() } else { "-INF".to_owned() }
	} else {
		format!("{value}")
	}
}

fn truncate(bytes: &[u8], max_len: usize) -> String {
	if bytes.len() <= max_len {
		return quote_bytes(bytes);
	}
	format!("{}... ({} bytes)", quote_bytes(&bytes[..max_len]), bytes.len())
}
