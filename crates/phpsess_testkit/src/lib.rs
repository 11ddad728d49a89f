//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

use bstr::BString;
use phpsess::session::{Key, Members, Object, Session, Value};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Read a fixture file into memory.
pub fn fixture_bytes(name: &str) -> Vec<u8> {
	let path = fixture_path(name);
	std::fs::read(&path).unwrap_or_else(|err| panic!("fixture {} readable: {err}", path.display()))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Parse JSON text emitted by the CLI.
pub fn parse_json(bytes: &[u8]) -> serde_json::Value {
	serde_json::from_slice(bytes).expect("stdout should be valid json")
}

/// Build a deterministic pseudo-random session.
///
/// Names never contain `|`; composites nest at most `max_depth` levels.
pub fn random_session(seed: u64, max_depth: u32) -> Session {
	let mut rng = StdRng::seed_from_u64(seed);
	let entries = rng.random_range(0..6);
	let mut session = Session::new();
	for idx in 0..entries {
		let name = format!("var{idx}_{}", random_ascii(&mut rng, 4));
		let value = random_value(&mut rng, max_depth);
		session.insert(name, value);
	}
	session
}

/// Build one pseudo-random value nested at most `depth` composite levels.
pub fn random_value(rng: &mut impl Rng, depth: u32) -> Value {
	let choices = if depth == 0 { 5 } else { 7 };
	match rng.random_range(0..choices) {
		0 => Value::Null,
		1 => Value::Bool(rng.random()),
		2 => Value::Int(rng.random()),
		3 => Value::Float(random_float(rng)),
		4 => Value::Str(random_bytes(rng)),
		5 => Value::Array(random_members(rng, depth - 1)),
		_ => Value::Object(Object {
			class: BString::from(format!("Class{}", random_ascii(rng, 3))),
			members: random_members(rng, depth - 1),
		}),
	}
}

fn random_members(rng: &mut impl Rng, depth: u32) -> Members {
	let count = rng.random_range(0..5);
	let mut members = Members::new();
	for _ in 0..count {
		let key = if rng.random() {
			Key::Int(rng.random_range(-50..50))
		} else {
			Key::Str(random_bytes(rng))
		};
		members.insert(key, random_value(rng, depth));
	}
	members
}

fn random_float(rng: &mut impl Rng) -> f64 {
	match rng.random_range(0..8) {
		0 => f64::INFINITY,
		1 => f64::NEG_INFINITY,
		2 => f64::NAN,
		3 => 0.0,
		_ => (rng.random::<f64>() - 0.5) * 10_f64.powi(rng.random_range(-10..20)),
	}
}

/// Arbitrary bytes, biased toward grammar delimiters and non-UTF-8 data.
fn random_bytes(rng: &mut impl Rng) -> BString {
	const SPECIAL: &[u8] = b"|:;{}\"\\\0\xff\xc3";
	let len = rng.random_range(0..12);
	let bytes: Vec<u8> = (0..len)
		.map(|_| {
			if rng.random_bool(0.3) {
				SPECIAL[rng.random_range(0..SPECIAL.len())]
			} else {
				rng.random_range(b' '..=b'~')
			}
		})
		.collect();
	BString::from(bytes)
}

fn random_ascii(rng: &mut impl Rng, len: usize) -> String {
	(0..len).map(|_| char::from(rng.random_range(b'a'..=b'z'))).collect()
}
