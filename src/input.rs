//! Parses and validates the user's request: which mode to run in, and the
//! tag/option/setting triple (or rename pair) it targets.
//!
//! Grounded in `optionset.py`'s `_parse_and_check_input`/`_check_optn_fmt`/
//! `_check_setting_fmt`. Note some non-obvious behavior traced from that
//! source: a rename request is still run through the exact same
//! `check_optn_fmt(args.option)`/`check_setting_fmt(args.setting)` pipeline as
//! a plain apply — `--rename-option`/`--rename-setting` are carried alongside
//! as raw replacement text and are never themselves format-checked (except
//! that a bare `--rename-option` with no `--rename-setting` has its format
//! validated and discarded, purely to catch a typo early).

use crate::cli::Args;
use crate::error::OptionsetError;
use crate::grammar;

/// What the run is trying to accomplish, resolved from the CLI flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
	ShowAvailable,
	ShowFiles,
	ApplySetting,
	RenameOption,
	RenameSetting,
}

/// The fully validated request driving one run of the tool.
#[derive(Clone, Debug)]
pub struct InputRequest {
	pub mode: Mode,
	/// Backslash-escaped-per-character literal tag text (safe to embed
	/// directly in a regex), or the `ANY_TAG` pattern fragment itself in
	/// discovery modes — mirrors `_parse_and_check_input` giving
	/// `tag_ = ANY_TAG` when discovering.
	pub tag: String,
	pub raw_opt: String,
	pub setting: String,
	pub rename_option: Option<String>,
	pub rename_setting: Option<String>,
	pub bashcomp: bool,
}

impl InputRequest {
	pub fn wants_available_or_showfiles(&self) -> bool {
		matches!(self.mode, Mode::ShowAvailable | Mode::ShowFiles)
	}

	pub fn wants_rename(&self) -> bool {
		matches!(self.mode, Mode::RenameOption | Mode::RenameSetting)
	}

	/// `tag + raw_opt` with escaping backslashes removed, for comparison
	/// against a plain annotation's `tag + raw_opt`.
	pub fn option_key(&self) -> String {
		format!("{}{}", self.tag, self.raw_opt).replace('\\', "")
	}
}

/// Mirrors `_check_optn_fmt`: `^([*]*)(tag+)(raw_opt)$`, tag escaped
/// character-by-character so it reads as a literal in later regexes.
fn check_optn_fmt(optn: &str) -> Result<(String, String), OptionsetError> {
	let pattern = format!(r"^({}*)({}+)({})$", grammar::MULTI_TAG, grammar::any_tag(), grammar::ANY_WORD);
	let re = fancy_regex::Regex::new(&pattern).expect("option-format template is statically valid regex");
	let caps = re
		.captures(optn)
		.ok()
		.flatten()
		.ok_or_else(|| OptionsetError::InputError(invalid_option_message()))?;
	let raw_tag = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
	let raw_opt = caps.get(3).map(|m| m.as_str()).unwrap_or_default().to_string();
	let literal_tag: String = raw_tag.chars().map(|c| format!("\\{c}")).collect();
	Ok((literal_tag, raw_opt))
}

/// Mirrors `_check_setting_fmt`: `^(?: |ANY_WORD)+$`.
fn check_setting_fmt(setting: &str) -> Result<String, OptionsetError> {
	let pattern = format!(r"^(?: |{})+$", grammar::ANY_WORD);
	let re = regex::Regex::new(&pattern).expect("setting-format template is statically valid regex");
	if re.is_match(setting) {
		Ok(setting.to_string())
	} else {
		Err(OptionsetError::InputError(invalid_setting_message()))
	}
}

fn invalid_option_message() -> String {
	"Invalid option name. A preceding tag, such as '@' in '@option' is required, and the rest of \
	 the option must match [a-zA-Z0-9._+-]+."
		.to_string()
}

fn invalid_setting_message() -> String {
	"Invalid setting name. The setting name must match [a-zA-Z0-9._+-]+ (words with spaces, using \
	 '')."
		.to_string()
}

/// Resolve `args` into a validated [`InputRequest`]. Mirrors
/// `_parse_and_check_input`.
pub fn parse_and_check(args: &Args) -> Result<InputRequest, OptionsetError> {
	let renaming = args.rename_option.is_some() || args.rename_setting.is_some();

	if renaming {
		if args.available {
			return Err(OptionsetError::InputError(
				"Must remove 'available' argument if renaming an option or setting.".to_string(),
			));
		}
		if args.showfiles {
			return Err(OptionsetError::InputError(
				"Must remove 'showfiles' argument if renaming an option or setting.".to_string(),
			));
		}
		if args.rename_setting.is_some() && args.setting.is_empty() {
			return Err(OptionsetError::InputError("Must input a setting if renaming a setting.".to_string()));
		}
		if let (Some(rename_option), None) = (&args.rename_option, &args.rename_setting) {
			check_optn_fmt(rename_option)?;
		}
	} else if args.setting.is_empty() && !args.showfiles {
		// No setting input defaults to displaying available options.
		return show_request(args, true, false);
	}

	if !renaming && (args.available || args.showfiles) {
		return show_request(args, args.available, args.showfiles);
	}

	let setting = if args.setting.is_empty() { String::new() } else { check_setting_fmt(&args.setting)? };
	let (tag, raw_opt) = check_optn_fmt(&args.option)?;

	let mode = if args.rename_setting.is_some() {
		Mode::RenameSetting
	} else if args.rename_option.is_some() {
		Mode::RenameOption
	} else {
		Mode::ApplySetting
	};

	Ok(InputRequest {
		mode,
		tag,
		raw_opt,
		setting,
		rename_option: args.rename_option.clone(),
		rename_setting: args.rename_setting.clone(),
		bashcomp: args.bashcomp,
	})
}

fn show_request(args: &Args, available: bool, showfiles: bool) -> Result<InputRequest, OptionsetError> {
	let mode = if showfiles { Mode::ShowFiles } else { Mode::ShowAvailable };
	Ok(InputRequest {
		mode,
		tag: grammar::any_tag(),
		raw_opt: grammar::ANY_WORD.to_string(),
		setting: args.setting.clone(),
		rename_option: None,
		rename_setting: None,
		bashcomp: args.bashcomp,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn args(option: &str, setting: &str) -> Args {
		Args { option: option.to_string(), setting: setting.to_string(), ..Args::default() }
	}

	#[test]
	fn defaults_to_show_available_without_setting() {
		let req = parse_and_check(&args("", "")).unwrap();
		assert_eq!(req.mode, Mode::ShowAvailable);
	}

	#[test]
	fn apply_setting_requires_valid_option_format() {
		let req = parse_and_check(&args("@timeout", "long")).unwrap();
		assert_eq!(req.mode, Mode::ApplySetting);
		assert_eq!(req.tag, "\\@");
		assert_eq!(req.raw_opt, "timeout");
		assert_eq!(req.setting, "long");
	}

	#[test]
	fn rejects_option_without_a_tag() {
		assert!(parse_and_check(&args("timeout", "long")).is_err());
	}

	#[test]
	fn rename_rejects_available_flag() {
		let mut a = args("@timeout", "");
		a.rename_option = Some("@delay".to_string());
		a.available = true;
		assert!(parse_and_check(&a).is_err());
	}

	#[test]
	fn rename_setting_requires_a_setting() {
		let mut a = args("@timeout", "");
		a.rename_setting = Some("fast".to_string());
		assert!(parse_and_check(&a).is_err());
	}

	#[test]
	fn rename_option_carries_raw_replacement_unchecked() {
		let mut a = args("@timeout", "long");
		a.rename_option = Some("@delay".to_string());
		let req = parse_and_check(&a).unwrap();
		assert_eq!(req.mode, Mode::RenameOption);
		assert_eq!(req.tag, "\\@");
		assert_eq!(req.raw_opt, "timeout");
		assert_eq!(req.rename_option.as_deref(), Some("@delay"));
	}

	#[test]
	fn showfiles_without_available_still_uses_any_tag() {
		let mut a = args("", "");
		a.showfiles = true;
		let req = parse_and_check(&a).unwrap();
		assert_eq!(req.mode, Mode::ShowFiles);
		assert_eq!(req.tag, grammar::any_tag());
	}
}
