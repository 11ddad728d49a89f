use std::path::PathBuf;

use bstr::ByteSlice;
use phpsess::session::{Key, Members, Session, SessionDecoder, Value};

use crate::cmd::print::{PrintOptions, format_float, render_session};
use crate::cmd::util::{decode_options, path_label, read_input};
use crate::cmd::{CliError, Result};

#[derive(clap::Args)]
pub struct Args {
	/// Session file, or `-` for stdin.
	pub path: PathBuf,
	/// Emit JSON instead of the indented tree.
	#[arg(long)]
	pub json: bool,
	/// Maximum array/object nesting depth (default 512).
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
	/// Maximum declared member count per array or object (default 1048576).
	#[arg(long = "max-members")]
	pub max_members: Option<usize>,
	/// Truncate printed strings to this many bytes.
	#[arg(long = "max-string", default_value_t = 200)]
	pub max_string: usize,
}

/// Decode a session payload and print it as a tree or JSON.
///
/// Entries decoded before a failure are still printed.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		json,
		max_depth,
		max_members,
		max_string,
	} = args;

	let input = read_input(&path)?;
	let decode = decode_options(max_depth, max_members);
	let (session, failure) = match SessionDecoder::with_options(&input, decode).decode() {
		Ok(session) => (session, None),
		Err(mut failure) => (std::mem::take(&mut failure.partial), Some(failure)),
	};

	if json {
		let payload = ShowJson {
			path: path_label(&path),
			entries: session_to_json(&session),
			error: failure.as_ref().map(|failure| ErrorJson {
				message: failure.source.to_string(),
				offset: failure.source.offset(),
				name: failure.name.as_ref().map(|name| name.to_str_lossy().into_owned()),
			}),
		};
		emit_json(&payload);
	} else {
		let print = PrintOptions {
			max_string_len: max_string,
			..PrintOptions::default()
		};
		println!("path: {}", path_label(&path));
		println!("entries: {}", session.len());
		print!("{}", render_session(&session, print));
	}

	match failure {
		Some(failure) => Err(CliError::Decode(Box::new(failure))),
		None => Ok(()),
	}
}

fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: json encode: {err}"),
	}
}

pub(crate) fn session_to_json(session: &Session) -> serde_json::Value {
	let entries: serde_json::Map<String, serde_json::Value> = session
		.iter()
		.map(|(name, value)| (name.to_str_lossy().into_owned(), value_to_json_value(value)))
		.collect();
	serde_json::Value::Object(entries)
}

pub(crate) fn value_to_json_value(value: &Value) -> serde_json::Value {
	use serde_json::Value as JsonValue;

	match value {
		Value::Null => JsonValue::Null,
		Value::Bool(v) => serde_json::json!(v),
		Value::Int(v) => serde_json::json!(v),
		Value::Float(v) if v.is_finite() => serde_json::json!(v),
		Value::Float(v) => serde_json::json!(format_float(*v)),
		Value::Str(v) => serde_json::json!(v.to_str_lossy()),
		Value::Array(members) => serde_json::json!({
			"type": "array",
			"entries": members_to_json(members),
		}),
		Value::Object(object) => serde_json::json!({
			"type": "object",
			"class": object.class.to_str_lossy(),
			"entries": members_to_json(&object.members),
		}),
	}
}

fn members_to_json(members: &Members) -> serde_json::Value {
	let pairs: Vec<serde_json::Value> = members
		.iter()
		.map(|(key, value)| {
			let key = match key {
				Key::Int(v) => serde_json::json!(v),
				Key::Str(v) => serde_json::json!(v.to_str_lossy()),
			};
			serde_json::json!([key, value_to_json_value(value)])
		})
		.collect();
	serde_json::Value::Array(pairs)
}

#[derive(serde::Serialize)]
struct ShowJson {
	path: String,
	entries: serde_json::Value,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<ErrorJson>,
}

#[derive(serde::Serialize)]
struct ErrorJson {
	message: String,
	offset: usize,
	name: Option<String>,
}
