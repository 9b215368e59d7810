//! The error taxonomy for the whole crate, and the single boundary where a
//! `Result` becomes a console message plus an exit code.
//!
//! Mirrors `optionset.py`'s error-message constants (`INVALID_OPTN_MSG`,
//! `INVALID_SETTING_MSG`, `INVALID_VAR_REGEX_MSG`, `INVALID_REGEX_GROUP_MSG`,
//! `INVALID_CONFIG_FILE_MSG`, `INCOMPLETE_INPUT_MSG`) and the teacher's
//! `complain_and_exit` boundary pattern in `src/main.rs`.

use std::fmt;

/// Everything that can go wrong running `optionset`, from a malformed CLI
/// invocation to a file the scanner refuses to touch.
#[derive(Debug)]
pub enum OptionsetError {
	/// Malformed or incomplete CLI input: a missing option/setting, an
	/// option name without a tag, a setting with disallowed characters, a
	/// rename request combined with `--available`/`--show-files`.
	InputError(String),
	/// A variable setting's embedded regex failed to compile, failed to
	/// match the code it annotates, or didn't capture a group.
	InvalidVariableRegex(String),
	/// A variable setting's embedded regex didn't have exactly one capture
	/// group. Aborts the whole run rather than skipping one file, since a
	/// malformed variable-setting regex is an authoring error the user needs
	/// to see immediately.
	InvalidRegexGroupCount(String),
	/// `<auxiliary-dir>/optionset.cfg` exists but is missing a required key
	/// or has a non-integer `max_flines`/`max_fsize_kb`, or an ignore-glob
	/// pattern failed to compile.
	InvalidConfigFile(String),
	/// Could not read or write a file needed to run at all (not a per-file
	/// skip — those are logged and the scan continues).
	Io(String),
}

impl fmt::Display for OptionsetError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OptionsetError::InputError(msg) => write!(f, "InputError: {msg}"),
			OptionsetError::InvalidVariableRegex(msg) => write!(f, "InvalidVariableRegexError: {msg}"),
			OptionsetError::InvalidRegexGroupCount(msg) => write!(f, "InvalidRegexGroupError: {msg}"),
			OptionsetError::InvalidConfigFile(msg) => write!(f, "InvalidConfigFileError: {msg}"),
			OptionsetError::Io(msg) => write!(f, "IoError: {msg}"),
		}
	}
}

impl std::error::Error for OptionsetError {}

impl From<std::io::Error> for OptionsetError {
	fn from(err: std::io::Error) -> Self {
		OptionsetError::Io(err.to_string())
	}
}
