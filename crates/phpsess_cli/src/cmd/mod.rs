use std::path::PathBuf;

use phpsess::session::DecodeFailure;
use thiserror::Error;

/// Session validation command.
pub mod check;
/// Indented tree rendering of decoded values.
pub mod print;
/// Decode-and-print command.
pub mod show;
/// Shared input and option helpers.
pub mod util;

#[cfg(test)]
mod test_support;

/// Command result type.
pub type Result<T> = std::result::Result<T, CliError>;

/// Failures surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
	/// Input file or stdin could not be read.
	#[error("read {}: {source}", .path.display())]
	Read {
		/// Requested input path (`-` for stdin).
		path: PathBuf,
		/// Underlying IO error.
		source: std::io::Error,
	},
	/// Session payload failed to decode.
	#[error(transparent)]
	Decode(#[from] Box<DecodeFailure>),
}
