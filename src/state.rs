//! Per-file scope state machine: tracks multi-line toggle state and nested
//! scope depth across lines, and drives the availability-database/line-mutate
//! decisions for one line at a time.
//!
//! Grounded in `optionset.py`'s `FileVarsDatabase` and the body of
//! `_process_line`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::annotation::{is_variable_setting, SettingState};
use crate::classify::{self, LineClassification};
use crate::error::OptionsetError;
use crate::grammar::{self, LineGrammar};
use crate::input::{InputRequest, Mode};
use crate::mutate;

/// Ordered option-key → ordered setting-key → state, accumulated across an
/// entire run. Mirrors `optns_settings_db` (a `defaultdict(lambda:
/// defaultdict(lambda: None))` in the original).
#[derive(Default, Debug)]
pub struct AvailabilityDb {
	options: IndexMap<String, IndexMap<String, SettingState>>,
}

impl AvailabilityDb {
	pub fn observe(&mut self, option_key: &str, setting: &str, uncommented: bool, inline_count: usize) {
		let settings = self.options.entry(option_key.to_string()).or_default();
		let existing = settings.get(setting);
		let next = SettingState::observe(existing, uncommented, inline_count);
		settings.insert(setting.to_string(), next);
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &IndexMap<String, SettingState>)> {
		self.options.iter()
	}

	/// Drop options with only one observed setting (singletons aren't useful
	/// for toggling). Mirrors the `len(n) > 1` filter in
	/// `_scroll_through_files`.
	pub fn retain_multi_setting_options(&mut self) {
		self.options.retain(|_, settings| settings.len() > 1);
	}
}

/// Ordered option-key → ordered captured-value → (), recording every distinct
/// value observed for a variable setting. Mirrors `var_optns_values_db`.
#[derive(Default, Debug)]
pub struct VariableValuesDb {
	values: IndexMap<String, IndexMap<String, ()>>,
}

impl VariableValuesDb {
	pub fn observe(&mut self, option_key: &str, value: &str) {
		self.values.entry(option_key.to_string()).or_default().insert(value.to_string(), ());
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &IndexMap<String, ()>)> {
		self.values.iter()
	}
}

/// Ordered option-key → ordered file path → (), recording which files an
/// option appears in. Mirrors `show_files_db`.
#[derive(Default, Debug)]
pub struct ShowFilesDb {
	files: IndexMap<String, IndexMap<String, ()>>,
}

impl ShowFilesDb {
	pub fn record(&mut self, option_key: &str, file: &str) {
		self.files.entry(option_key.to_string()).or_default().insert(file.to_string(), ());
	}

	pub fn files_for(&self, option_key: &str) -> Option<&IndexMap<String, ()>> {
		self.files.get(option_key)
	}
}

/// Everything collected while scrolling through files, handed to the report
/// formatter. Mirrors the 3-tuple `(optns_settings_db, var_optns_values_db,
/// show_files_db)` returned by `_scroll_through_files`.
#[derive(Default)]
pub struct RunDatabases {
	pub availability: AvailabilityDb,
	pub variables: VariableValuesDb,
	pub show_files: Option<ShowFilesDb>,
}

/// Per-file scope state, re-created once per file. Mirrors
/// `FileVarsDatabase`.
pub struct FileState {
	pub filepath: PathBuf,
	pub com_ind: String,
	pub modified: bool,
	multiline_active: bool,
	multiline_was_commented: Option<bool>,
	nested_level: usize,
	nested_increment: isize,
	/// Depth → option key, for the multi-line scope currently open at that
	/// depth. Mirrors `nested_optn_db`.
	nested_option_stack: HashMap<usize, String>,
	grammar: LineGrammar,
}

impl FileState {
	pub fn new(filepath: &Path, com_ind: &str) -> FileState {
		FileState {
			filepath: filepath.to_path_buf(),
			com_ind: com_ind.to_string(),
			modified: false,
			multiline_active: false,
			multiline_was_commented: None,
			nested_level: 0,
			nested_increment: 0,
			nested_option_stack: HashMap::new(),
			grammar: LineGrammar::build(com_ind, 0),
		}
	}

	fn ensure_grammar(&mut self) {
		if self.grammar.nested_level != self.nested_level || self.grammar.com_ind != self.com_ind {
			self.grammar = LineGrammar::build(&self.com_ind, self.nested_level);
		}
	}
}

/// Process one line against the accumulated file state, updating `dbs` and
/// returning the (possibly unchanged) replacement line. Mirrors
/// `_process_line`.
pub fn process_line(
	state: &mut FileState,
	line: &str,
	line_num: usize,
	input: &InputRequest,
	dbs: &mut RunDatabases,
) -> Result<String, OptionsetError> {
	state.nested_level = state.nested_level.saturating_add_signed(state.nested_increment);
	state.nested_increment = 0;
	state.ensure_grammar();

	let classification = classify::classify(&state.grammar, line);
	let mut f_comment = classification.is_commented;
	let LineClassification { nested_com_inds, non_com, whole_com, annotations, .. } = classification;

	let mut newline = line.to_string();

	let mut inline_optn_count: HashMap<String, usize> = HashMap::new();
	let mut inline_optn_match: HashMap<String, bool> = HashMap::new();
	let mut inline_setting_match: HashMap<String, bool> = HashMap::new();
	let mut f_inline_optn_match = false;
	let mut f_inline_setting_match = false;
	let wants_show_files = matches!(input.mode, Mode::ShowFiles);
	let requested_key = input.option_key();
	let requested_setting = input.setting.replace('\\', "");

	for ann in &annotations {
		let key = ann.tag.clone() + &ann.raw_opt;
		if wants_show_files {
			if let Some(show_files) = dbs.show_files.as_mut() {
				show_files.record(&key, &state.filepath.display().to_string());
			}
		}
		*inline_optn_count.entry(key.clone()).or_insert(0) += 1;
		if requested_key == key {
			inline_optn_match.insert(key.clone(), true);
			f_inline_optn_match = true;
			if requested_setting == ann.setting {
				inline_setting_match.insert(key.clone(), true);
				f_inline_setting_match = true;
			}
		}
	}

	// Rename short-circuit: no state transitions, no availability bookkeeping.
	if input.wants_rename() {
		let mut new_whole_com = whole_com.clone();
		if f_inline_optn_match {
			if let Some(rename_option) = &input.rename_option {
				let re = grammar::inline_optn_setting_regex(&regex::escape(&requested_key), &grammar::any_setting());
				new_whole_com = re.replace_all(&whole_com, format!("${{1}}{rename_option}${{3}}${{4}}${{5}}")).into_owned();
				newline = format!("{nested_com_inds}{non_com}{}{new_whole_com}", state.com_ind);
				state.modified = true;
			}
		}
		if f_inline_setting_match {
			if let Some(rename_setting) = &input.rename_setting {
				let option_for_match = input.rename_option.clone().unwrap_or(requested_key.clone());
				let re = grammar::inline_optn_setting_regex(&regex::escape(&option_for_match), &regex::escape(&requested_setting));
				let newer_whole_com =
					re.replace_all(&new_whole_com, format!("${{1}}${{2}}${{3}}{rename_setting}${{5}}")).into_owned();
				newline = format!("{nested_com_inds}{non_com}{}{newer_whole_com}", state.com_ind);
				state.modified = true;
			}
		}
		return Ok(newline);
	}

	// Multi-line inheritance: toggle this line if it carries no matching
	// annotation of its own.
	let mut f_freeze_changes = if state.multiline_active && !f_inline_optn_match {
		newline = if state.multiline_was_commented == Some(true) {
			mutate::uncomment(line, &state.com_ind)
		} else {
			mutate::comment(line, &state.com_ind)
		};
		true
	} else {
		false
	};

	for ann in &annotations {
		if f_freeze_changes {
			continue;
		}
		let key = ann.tag.clone() + &ann.raw_opt;

		if ann.mtag {
			if f_comment {
				state.nested_option_stack.insert(state.nested_level, key.clone());
				state.nested_increment = 1;
			} else if !state.nested_option_stack.is_empty() {
				if state.nested_option_stack.get(&state.nested_level.saturating_sub(1)) == Some(&key) {
					state.nested_option_stack.remove(&state.nested_level.saturating_sub(1));
					state.nested_increment = -1;
					f_comment = true;
					state.multiline_active = false;
					f_freeze_changes = true;
					if inline_setting_match.get(&key).copied().unwrap_or(false) {
						newline = mutate::uncomment(line, &state.com_ind);
					}
					continue;
				}
			}
		}

		if input.wants_available_or_showfiles() || input.bashcomp {
			if is_variable_setting(&ann.setting) && !f_comment {
				let context = format!("{}:{line_num}", state.filepath.display());
				let value = mutate::parse_inline_regex(&non_com, &ann.setting, &context)?;
				dbs.variables.observe(&key, &value);
			} else {
				let count = inline_optn_count.get(&key).copied().unwrap_or(0);
				dbs.availability.observe(&key, &ann.setting, !f_comment, count);
			}
		}

		if !input.wants_available_or_showfiles() && requested_key == key {
			if f_comment {
				if input.setting == ann.setting {
					newline = mutate::uncomment(line, &state.com_ind);
					if ann.mtag && !state.multiline_active {
						state.multiline_active = true;
						state.multiline_was_commented = Some(f_comment);
					} else if ann.mtag && state.multiline_active {
						state.multiline_active = false;
						state.multiline_was_commented = None;
					}
				}
			} else if is_variable_setting(&ann.setting) {
				let context = format!("{}:{line_num}", state.filepath.display());
				let current_value = mutate::parse_inline_regex(&non_com, &ann.setting, &context)?;
				let replacement = &input.setting;
				if *replacement == current_value {
					log::info!("Option already set: {replacement}");
				} else {
					newline = mutate::set_variable_setting(
						&nested_com_inds, &non_com, &state.com_ind, &whole_com, &ann.setting, replacement,
					)?;
					f_freeze_changes = true;
				}
			} else if inline_optn_match.get(&key).copied().unwrap_or(false)
				&& !inline_setting_match.get(&key).copied().unwrap_or(false)
			{
				newline = mutate::comment(line, &state.com_ind);
				if ann.mtag && !state.multiline_active {
					state.multiline_active = true;
					state.multiline_was_commented = Some(f_comment);
					f_freeze_changes = true;
				} else if ann.mtag && state.multiline_active {
					state.multiline_active = false;
					state.multiline_was_commented = None;
					f_freeze_changes = true;
				}
			}
		}
	}

	if newline != line {
		state.modified = true;
	}

	Ok(newline)
}
