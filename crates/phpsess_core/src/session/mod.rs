mod bytes;
mod data;
mod decode;
mod encode;
mod error;
mod value;

/// Forward-only byte cursor used by the decoder.
pub use bytes::Cursor;
/// Ordered variable-name to value mapping.
pub use data::Session;
/// Decoding entry points and options.
pub use decode::{DecodeOptions, SessionDecoder, decode, decode_value, decode_with_options};
/// Encoding entry points.
pub use encode::{encode, encode_value};
/// Error and result aliases.
pub use error::{DecodeFailure, Result, SessionError};
/// Decoded value types.
pub use value::{Key, Members, Object, Value, ValueKind};
