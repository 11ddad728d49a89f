#![allow(missing_docs)]

use bstr::BString;
use phpsess::session::{Key, Members, Object, Session, SessionDecoder, Value, decode};

fn session_of(entries: Vec<(&str, Value)>) -> Session {
	entries.into_iter().collect()
}

fn members_of(entries: Vec<(Key, Value)>) -> Members {
	entries.into_iter().collect()
}

#[test]
fn end_to_end_table() {
	let cases: Vec<(&str, Session)> = vec![
		("name|s:5:\"Alice\";", session_of(vec![("name", Value::from("Alice"))])),
		("n|i:42;", session_of(vec![("n", Value::Int(42))])),
		("flag|b:1;", session_of(vec![("flag", Value::Bool(true))])),
		("x|N;", session_of(vec![("x", Value::Null)])),
		(
			"arr|a:2:{i:0;s:1:\"a\";i:1;s:1:\"b\";}",
			session_of(vec![(
				"arr",
				Value::Array(members_of(vec![(Key::Int(0), Value::from("a")), (Key::Int(1), Value::from("b"))])),
			)]),
		),
		(
			"u|O:4:\"User\":2:{s:2:\"id\";i:7;s:4:\"name\";s:3:\"Bob\";}",
			session_of(vec![(
				"u",
				Value::Object(Object {
					class: BString::from("User"),
					members: members_of(vec![(Key::from("id"), Value::Int(7)), (Key::from("name"), Value::from("Bob"))]),
				}),
			)]),
		),
		("s|s:3:\"a|b\";", session_of(vec![("s", Value::from("a|b"))])),
	];

	for (input, expected) in cases {
		let mut decoder = SessionDecoder::new(input.as_bytes());
		let session = decoder.decode().expect("scenario decodes");
		assert_eq!(session, expected, "input {input}");
		assert_eq!(decoder.remaining(), 0, "decoder should stop at end of input");
	}
}

#[test]
fn empty_input_is_empty_session() {
	let session = decode("").expect("empty input decodes");
	assert!(session.is_empty());
}

#[test]
fn decoding_is_deterministic() {
	let input = b"a|a:2:{i:0;d:NAN;s:1:\"k\";O:1:\"C\":1:{i:3;d:0.5;}}b|N;";
	let first = decode(input).expect("decodes once");
	let second = decode(input).expect("decodes twice");
	assert_eq!(first, second);
}
