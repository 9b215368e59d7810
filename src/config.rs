//! The `[Files]` section of `<auxiliary-dir>/optionset.cfg`: ignore globs and
//! the size/line-count gate. Hand-rolled INI scanner, since the ambient
//! surface is one section with four keys and nothing in the pack carries an
//! INI crate.
//!
//! Grounded in `optionset.py`'s `_load_program_settings`/`_array_from_str`/
//! `_str_dict`.

use std::path::{Path, PathBuf};

use crate::comment::FileLimits;
use crate::error::OptionsetError;

pub const CONFIG_FILE_NAME: &str = "optionset.cfg";

pub fn default_ignore_dirs() -> Vec<String> {
	[
		".[a-zA-Z0-9]*", "__pycache__", "[0-9]", "[0-9][0-9]*", "[0-9].[0-9]*",
		"log", "logs", "processor[0-9]*", "archive", "trash",
	]
	.iter()
	.map(|s| s.to_string())
	.collect()
}

pub fn default_ignore_files() -> Vec<String> {
	[
		crate::cli::BASENAME, crate::logging::LOG_NAME, crate::completion::BASHCOMP_NAME,
		CONFIG_FILE_NAME, ".*", "log.*", "log_*", "*.log", "*.pyc", "*.gz", "*.png", "*.jpg",
		"*.obj", "*.stl", "*.stp", "*.step",
	]
	.iter()
	.map(|s| s.to_string())
	.collect()
}

/// The resolved `[Files]` section: ignore globs plus the size/line gate.
#[derive(Clone, Debug)]
pub struct FileConfig {
	pub ignore_dirs: Vec<String>,
	pub ignore_files: Vec<String>,
	pub limits: FileLimits,
}

impl Default for FileConfig {
	fn default() -> Self {
		FileConfig {
			ignore_dirs: default_ignore_dirs(),
			ignore_files: default_ignore_files(),
			limits: FileLimits { max_flines: 9999, max_fsize_kb: 10 },
		}
	}
}

/// Load `<aux_dir>/optionset.cfg`. If absent, returns the in-memory default
/// and — unless `suppress_write` is set (mirrors `--no-log`, except a
/// `--bash-completion` request always writes) — serializes the default back
/// out so the user has a starting point to edit.
pub fn load_or_init(aux_dir: &Path, suppress_write: bool, bashcomp_requested: bool) -> Result<FileConfig, OptionsetError> {
	let config_path = aux_dir.join(CONFIG_FILE_NAME);
	if config_path.exists() {
		return parse_config_file(&config_path);
	}

	let config = FileConfig::default();
	if bashcomp_requested || !suppress_write {
		std::fs::create_dir_all(aux_dir)?;
		std::fs::write(&config_path, render_config(&config))?;
	}
	Ok(config)
}

fn parse_config_file(path: &Path) -> Result<FileConfig, OptionsetError> {
	let content = std::fs::read_to_string(path)?;
	let section = parse_ini(&content);
	let files = section.get("Files").cloned().unwrap_or_default();

	let get = |key: &str| -> Result<&String, OptionsetError> {
		files
			.get(key)
			.ok_or_else(|| OptionsetError::InvalidConfigFile(format!("missing key '{key}' under [Files] in {}", path.display())))
	};
	let parse_int = |key: &str, raw: &str| -> Result<usize, OptionsetError> {
		raw.trim()
			.parse()
			.map_err(|_| OptionsetError::InvalidConfigFile(format!("'{key}' is not an integer in {}", path.display())))
	};

	let max_flines = parse_int("max_flines", get("max_flines")?)?;
	let max_fsize_kb = parse_int("max_fsize_kb", get("max_fsize_kb")?)?;
	let ignore_dirs = array_from_str(get("ignore_dirs")?);
	let ignore_files = array_from_str(get("ignore_files")?);

	Ok(FileConfig {
		ignore_dirs,
		ignore_files,
		limits: FileLimits { max_flines, max_fsize_kb: max_fsize_kb as u64 },
	})
}

/// Split a comma-separated list, stripping quotes and surrounding
/// whitespace from each element. Mirrors `_array_from_str`.
fn array_from_str(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(|s| s.replace(['\'', '"'], "").trim().to_string())
		.filter(|s| !s.is_empty())
		.collect()
}

/// A minimal `[section]` / `key = value` scanner: blank lines and lines
/// starting with `#` or `;` are skipped, everything else belongs to the
/// most recently seen section header.
fn parse_ini(content: &str) -> std::collections::HashMap<String, std::collections::HashMap<String, String>> {
	let mut sections: std::collections::HashMap<String, std::collections::HashMap<String, String>> = std::collections::HashMap::new();
	let mut current = String::new();

	for line in content.lines() {
		let trimmed = line.trim();
		if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
			continue;
		}
		if trimmed.starts_with('[') && trimmed.ends_with(']') {
			current = trimmed[1..trimmed.len() - 1].to_string();
			sections.entry(current.clone()).or_default();
			continue;
		}
		if let Some((key, value)) = trimmed.split_once('=') {
			sections
				.entry(current.clone())
				.or_default()
				.insert(key.trim().to_string(), value.trim().to_string());
		}
	}
	sections
}

fn render_config(config: &FileConfig) -> String {
	format!(
		"[Files]\nignore_dirs = {}\nignore_files = {}\nmax_flines = {}\nmax_fsize_kb = {}\n",
		config.ignore_dirs.join(", "),
		config.ignore_files.join(", "),
		config.limits.max_flines,
		config.limits.max_fsize_kb,
	)
}

pub fn default_aux_dir() -> PathBuf {
	dirs_home().join(".optionset")
}

fn dirs_home() -> PathBuf {
	std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[test]
	fn writes_default_config_when_absent() {
		let dir = tempdir().unwrap();
		let config = load_or_init(dir.path(), false, false).unwrap();
		assert_eq!(config.limits.max_flines, 9999);
		assert!(dir.path().join(CONFIG_FILE_NAME).exists());
	}

	#[test]
	fn suppresses_write_when_no_log_and_no_bashcomp() {
		let dir = tempdir().unwrap();
		load_or_init(dir.path(), true, false).unwrap();
		assert!(!dir.path().join(CONFIG_FILE_NAME).exists());
	}

	#[test]
	fn writes_even_with_no_log_when_bashcomp_requested() {
		let dir = tempdir().unwrap();
		load_or_init(dir.path(), true, true).unwrap();
		assert!(dir.path().join(CONFIG_FILE_NAME).exists());
	}

	#[test]
	fn reads_existing_config_file() {
		let dir = tempdir().unwrap();
		std::fs::write(
			dir.path().join(CONFIG_FILE_NAME),
			"[Files]\nignore_dirs = build, .git\nignore_files = *.log\nmax_flines = 50\nmax_fsize_kb = 5\n",
		)
		.unwrap();
		let config = load_or_init(dir.path(), true, false).unwrap();
		assert_eq!(config.ignore_dirs, vec!["build".to_string(), ".git".to_string()]);
		assert_eq!(config.limits.max_flines, 50);
		assert_eq!(config.limits.max_fsize_kb, 5);
	}

	#[test]
	fn missing_key_is_invalid_config_error() {
		let dir = tempdir().unwrap();
		std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[Files]\nmax_flines = 50\n").unwrap();
		assert!(load_or_init(dir.path(), true, false).is_err());
	}
}
