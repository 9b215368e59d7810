//! Directory discovery: walks a tree collecting files whose path components
//! don't match any of the configured ignore globs.
//!
//! Grounded in `optionset.py`'s `_gen_valid_files`/`_fn_compare`: an
//! `os.walk` that checks every path component of a directory against a set
//! of glob patterns, and every file's basename against another set. Symlinks
//! are followed, matching `os.walk(..., followlinks=True)`.

use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::OptionsetError;

fn compile_patterns(globs: &[String]) -> Result<Vec<Pattern>, OptionsetError> {
	globs
		.iter()
		.map(|g| Pattern::new(g).map_err(|e| OptionsetError::InvalidConfigFile(format!("bad glob '{g}': {e}"))))
		.collect()
}

fn matches_any(patterns: &[Pattern], value: &str) -> bool {
	patterns.iter().any(|p| p.matches(value))
}

/// Walk `root` and return every non-ignored regular file, in a deterministic
/// depth-first, per-directory-sorted order.
pub fn discover_files(
	root: &Path,
	ignore_dirs: &[String],
	ignore_files: &[String],
) -> Result<Vec<PathBuf>, OptionsetError> {
	let dir_patterns = compile_patterns(ignore_dirs)?;
	let file_patterns = compile_patterns(ignore_files)?;
	let mut out = Vec::new();
	walk(root, &dir_patterns, &file_patterns, &mut out)?;
	Ok(out)
}

fn walk(
	dir: &Path,
	dir_patterns: &[Pattern],
	file_patterns: &[Pattern],
	out: &mut Vec<PathBuf>,
) -> Result<(), OptionsetError> {
	let mut entries: Vec<_> = std::fs::read_dir(dir)
		.map_err(|e| OptionsetError::InputError(format!("cannot read directory {}: {e}", dir.display())))?
		.filter_map(|e| e.ok())
		.collect();
	entries.sort_by_key(|e| e.file_name());

	for entry in entries {
		let path = entry.path();
		let file_type = match entry.file_type() {
			Ok(ft) => ft,
			Err(_) => continue,
		};
		let is_dir = if file_type.is_symlink() {
			path.metadata().map(|m| m.is_dir()).unwrap_or(false)
		} else {
			file_type.is_dir()
		};

		if is_dir {
			let name = entry.file_name();
			let name = name.to_string_lossy();
			if matches_any(dir_patterns, &name) {
				continue;
			}
			walk(&path, dir_patterns, file_patterns, out)?;
		} else {
			let name = entry.file_name();
			let name = name.to_string_lossy();
			if matches_any(file_patterns, &name) {
				continue;
			}
			out.push(path);
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use tempfile::tempdir;

	fn strings(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn skips_ignored_directories_and_files() {
		let dir = tempdir().unwrap();
		fs::create_dir_all(dir.path().join("__pycache__")).unwrap();
		fs::write(dir.path().join("__pycache__/cache.txt"), "x").unwrap();
		fs::create_dir_all(dir.path().join("src")).unwrap();
		fs::write(dir.path().join("src/main.rs"), "x").unwrap();
		fs::write(dir.path().join("optionset.log"), "x").unwrap();

		let files = discover_files(
			dir.path(),
			&strings(&["__pycache__"]),
			&strings(&["*.log"]),
		)
		.unwrap();

		assert_eq!(files, vec![dir.path().join("src/main.rs")]);
	}

	#[test]
	fn deterministic_order_within_a_directory() {
		let dir = tempdir().unwrap();
		fs::write(dir.path().join("b.txt"), "x").unwrap();
		fs::write(dir.path().join("a.txt"), "x").unwrap();

		let files = discover_files(dir.path(), &[], &[]).unwrap();
		assert_eq!(files, vec![dir.path().join("a.txt"), dir.path().join("b.txt")]);
	}

	#[test]
	fn nested_directory_under_ignored_parent_is_skipped() {
		let dir = tempdir().unwrap();
		fs::create_dir_all(dir.path().join("build/nested")).unwrap();
		fs::write(dir.path().join("build/nested/file.txt"), "x").unwrap();

		let files = discover_files(dir.path(), &strings(&["build"]), &[]).unwrap();
		assert!(files.is_empty());
	}
}
