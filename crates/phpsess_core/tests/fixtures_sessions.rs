#![allow(missing_docs)]

use bstr::BString;
use phpsess::session::{Key, SessionError, Value, decode, encode};
use phpsess_testkit::fixture_bytes;

#[test]
fn login_fixture_decodes() {
	let input = fixture_bytes("login.sess");
	let session = decode(&input).expect("fixture decodes");

	let names: Vec<String> = session.names().map(|name| name.to_string()).collect();
	assert_eq!(names, ["user_id", "username", "logged_in", "cart", "last_seen", "flash"]);
	assert_eq!(session.get("user_id"), Some(&Value::Int(1042)));
	assert_eq!(session.get("username").and_then(Value::as_str), Some("alice"));
	assert_eq!(session.get("logged_in"), Some(&Value::Bool(true)));
	assert_eq!(session.get("last_seen"), Some(&Value::Float(1_717_171_717.25)));
	assert_eq!(session.get("flash"), Some(&Value::Null));

	let cart = session.get("cart").and_then(Value::as_array).expect("cart is an array");
	assert_eq!(cart.len(), 2);
	let second = cart.get(&Key::Int(1)).expect("second line item");
	assert_eq!(second.get("sku").and_then(Value::as_str), Some("B-2002"));
	assert_eq!(second.get("qty"), Some(&Value::Int(1)));
}

#[test]
fn object_fixture_keeps_class_and_raw_member_names() {
	let input = fixture_bytes("object.sess");
	let session = decode(&input).expect("fixture decodes");

	let auth = session.get("auth").and_then(Value::as_object).expect("auth is an object");
	assert_eq!(auth.class, "App\\User");
	assert_eq!(auth.members.len(), 4);
	assert_eq!(auth.members.get(&Key::from("name")).and_then(Value::as_str), Some("Zoë B."));

	let token = auth.members.get(&Key::from(&b"\0*\0token"[..])).expect("protected member present");
	assert_eq!(token.as_bytes().map(|bytes| bytes.to_vec()), Some(vec![0xde, 0xad, 0xbe, 0xef]));

	let roles: Vec<&str> = auth.members[&Key::from("roles")]
		.as_array()
		.expect("roles is an array")
		.values()
		.filter_map(Value::as_str)
		.collect();
	assert_eq!(roles, ["admin", "editor"]);
	assert_eq!(session.get("csrf").and_then(Value::as_bytes).map(|bytes| bytes.len()), Some(32));
}

#[test]
fn fixtures_round_trip_byte_for_byte() {
	for name in ["login.sess", "object.sess"] {
		let input = fixture_bytes(name);
		let session = decode(&input).expect("fixture decodes");
		assert_eq!(encode(&session), input, "{name} should re-encode identically");
	}
}

#[test]
fn mislength_fixture_keeps_partial_session() {
	let input = fixture_bytes("mislength.sess");
	let err = decode(&input).expect_err("string length overruns its quotes");

	assert_eq!(err.name, Some(BString::from("b")));
	assert_eq!(err.partial.len(), 1);
	assert_eq!(err.partial.get("a"), Some(&Value::Int(1)));
	assert_eq!(
		err.source,
		SessionError::MismatchedByte {
			at: 24,
			expected: b'"',
			got: b';'
		}
	);
}
