use std::path::PathBuf;

use phpsess::session::SessionDecoder;

use crate::cmd::util::{decode_options, read_input};
use crate::cmd::{CliError, Result};

#[derive(clap::Args)]
pub struct Args {
	/// Session file, or `-` for stdin.
	pub path: PathBuf,
	/// Maximum array/object nesting depth (default 512).
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
	/// Maximum declared member count per array or object (default 1048576).
	#[arg(long = "max-members")]
	pub max_members: Option<usize>,
}

/// Validate a session payload and report the entry count.
pub fn run(args: Args) -> Result<()> {
	let Args { path, max_depth, max_members } = args;

	let input = read_input(&path)?;
	let mut decoder = SessionDecoder::with_options(&input, decode_options(max_depth, max_members));
	match decoder.decode() {
		Ok(session) => {
			println!("ok: {} entries, {} bytes", session.len(), decoder.pos());
			Ok(())
		}
		Err(failure) => {
			println!("failed after {} entries at offset {}", failure.partial.len(), failure.source.offset());
			Err(CliError::Decode(Box::new(failure)))
		}
	}
}
