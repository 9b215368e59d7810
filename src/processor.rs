//! Per-file drive loop: gate a candidate file through the size/line-count
//! limits, detect its comment indicator, and scroll `state::process_line`
//! across every line, rewriting the file atomically if anything changed.
//!
//! Grounded in `optionset.py`'s `_process_file`.

use std::path::Path;

use crate::comment::{self, FileLimits};
use crate::error::OptionsetError;
use crate::input::InputRequest;
use crate::state::{process_line, FileState, RunDatabases};

/// Process one file against `limits`/`input`, updating `dbs` in place.
/// Returns `true` if the file's content was rewritten. A file skipped for
/// size, binary content, or lacking a recognized comment indicator returns
/// `Ok(false)` without error — only a malformed variable-setting regex
/// aborts the whole run.
pub fn process_file(
	path: &Path,
	limits: &FileLimits,
	input: &InputRequest,
	dbs: &mut RunDatabases,
) -> Result<bool, OptionsetError> {
	log::debug!("FILE CANDIDATE: {}", path.display());

	let lines = match comment::read_gated(path, limits) {
		Ok(lines) => lines,
		Err(reason) => {
			log::info!("Skipping: {}\n\t{reason}", path.display());
			return Ok(false);
		}
	};

	let com_ind = match comment::detect_comment_indicator(&lines) {
		Some(ind) => ind,
		None => return Ok(false),
	};
	log::debug!("FILE MATCHED [{com_ind}]: {}", path.display());

	let mut state = FileState::new(path, &com_ind);
	let mut newlines = Vec::with_capacity(lines.len());
	for (idx, line) in lines.iter().enumerate() {
		let line_num = idx + 1;
		newlines.push(process_line(&mut state, line, line_num, input, dbs)?);
	}

	if state.modified {
		write_atomic(path, &newlines)?;
		crate::print_msg!("File modified: {}", path.display());
		return Ok(true);
	}

	Ok(false)
}

/// Write `lines` to a sibling temp file and rename it over `path`, so a
/// crash mid-write never truncates the original.
fn write_atomic(path: &Path, lines: &[String]) -> Result<(), OptionsetError> {
	let file_name = path
		.file_name()
		.ok_or_else(|| OptionsetError::Io(format!("invalid file path {}", path.display())))?;
	let tmp_name = format!("{}.optionset-tmp", file_name.to_string_lossy());
	let tmp_path = path.with_file_name(tmp_name);
	std::fs::write(&tmp_path, lines.concat())?;
	std::fs::rename(&tmp_path, path)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::input::Mode;
	use tempfile::tempdir;

	fn request(tag: &str, raw_opt: &str, setting: &str) -> InputRequest {
		InputRequest {
			mode: Mode::ApplySetting,
			tag: tag.to_string(),
			raw_opt: raw_opt.to_string(),
			setting: setting.to_string(),
			rename_option: None,
			rename_setting: None,
			bashcomp: false,
		}
	}

	fn limits() -> FileLimits {
		FileLimits { max_flines: 9999, max_fsize_kb: 10 }
	}

	#[test]
	fn rewrites_file_in_place_when_setting_applied() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("config.txt");
		std::fs::write(&path, "air=1 # @visc air\n# water=1 # @visc water\n").unwrap();

		let req = request("\\@", "visc", "water");
		let mut dbs = RunDatabases::default();
		let changed = process_file(&path, &limits(), &req, &mut dbs).unwrap();

		assert!(changed);
		let content = std::fs::read_to_string(&path).unwrap();
		assert_eq!(content, "#air=1 # @visc air\n water=1 # @visc water\n");
	}

	#[test]
	fn leaves_file_untouched_without_a_matching_annotation() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("plain.txt");
		std::fs::write(&path, "nothing interesting here\n").unwrap();

		let req = request("\\@", "visc", "water");
		let mut dbs = RunDatabases::default();
		let changed = process_file(&path, &limits(), &req, &mut dbs).unwrap();

		assert!(!changed);
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "nothing interesting here\n");
	}

	#[test]
	fn skips_oversized_file_without_touching_it() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("big.txt");
		std::fs::write(&path, "x".repeat(20_000)).unwrap();

		let req = request("\\@", "visc", "water");
		let mut dbs = RunDatabases::default();
		let small_limits = FileLimits { max_flines: 9999, max_fsize_kb: 1 };
		let changed = process_file(&path, &small_limits, &req, &mut dbs).unwrap();
		assert!(!changed);
	}
}
