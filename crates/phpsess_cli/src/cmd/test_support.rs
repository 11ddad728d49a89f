use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

use phpsess_testkit::{fixture_path as shared_fixture_path, target_dir as workspace_target_dir};

static PHPSESS_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn fixture_path(name: &str) -> PathBuf {
	shared_fixture_path(name)
}

pub(crate) fn run_phpsess(args: &[&str]) -> Output {
	Command::new(phpsess_bin()).args(args).output().expect("phpsess command executes")
}

pub(crate) fn run_phpsess_json(args: &[&str]) -> serde_json::Value {
	let output = run_phpsess(args);
	assert!(
		output.status.success(),
		"phpsess command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	phpsess_testkit::parse_json(&output.stdout)
}

fn phpsess_bin() -> &'static PathBuf {
	PHPSESS_BIN.get_or_init(resolve_phpsess_bin)
}

fn resolve_phpsess_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_phpsess") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "phpsess.exe" } else { "phpsess" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "phpsess"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build phpsess binary at {}", bin.display());

	bin
}
