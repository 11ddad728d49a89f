//! Public library API for decoding and encoding PHP session payloads.

/// Session value model, byte cursor, decoder, and encoder.
pub mod session;
