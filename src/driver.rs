//! Run orchestration across the whole discovered file tree: drives
//! `processor::process_file` over every file in order, then formats the
//! accumulated availability/variable databases into the report text shown
//! for `--available`/`--show-files`.
//!
//! Grounded in `optionset.py`'s `_scroll_through_files`/`_print_available`.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::PathBuf;

use glob::Pattern;

use crate::comment::FileLimits;
use crate::error::OptionsetError;
use crate::input::{InputRequest, Mode};
use crate::state::RunDatabases;

/// Everything gathered after a full pass over the file tree.
pub struct RunResult {
	pub dbs: RunDatabases,
	pub changes_made: bool,
}

/// Process every file in `files`, in order. Single-threaded and strictly
/// sequential: the availability database and any file rewrite must be
/// observed in deterministic walk order, so there is no work here to hand
/// off to a thread pool. Mirrors `_scroll_through_files`.
pub fn scroll_through_files(
	files: &[PathBuf],
	limits: &FileLimits,
	input: &InputRequest,
) -> Result<RunResult, OptionsetError> {
	let mut dbs = RunDatabases::default();
	if matches!(input.mode, Mode::ShowFiles) {
		dbs.show_files = Some(Default::default());
	}

	if input.wants_available_or_showfiles() {
		log::info!("Scrolling through files to gather available options and settings data");
	} else {
		log::info!("Scrolling through files to set: {}{} {}", input.tag, input.raw_opt, input.setting);
	}

	let mut changes_made = false;
	for file in files {
		if crate::processor::process_file(file, limits, input, &mut dbs)? {
			changes_made = true;
		}
	}

	dbs.availability.retain_multi_setting_options();
	Ok(RunResult { dbs, changes_made })
}

/// Render the `--available`/`--show-files` report text. Mirrors
/// `_print_available`: options and variable options are each sorted and
/// listed separately, followed by a "Common files" summary when more than
/// one option matched `glob_pat`.
pub fn format_available_report(dbs: &RunDatabases, glob_pat: &str, f_available: bool) -> String {
	let pattern = Pattern::new(glob_pat).unwrap_or_else(|_| Pattern::new("*").expect("'*' is a valid glob"));
	let mut body = String::new();
	let mut num_optns = 0usize;
	let mut common_files: Vec<String> = Vec::new();

	let mut availability: Vec<_> = dbs.availability.iter().collect();
	availability.sort_by(|a, b| a.0.cmp(b.0));
	for (optn, settings) in availability {
		if !pattern.matches(optn) {
			continue;
		}
		write!(body, "\n  {optn}").ok();
		num_optns += 1;
		if f_available {
			let mut settings: Vec<_> = settings.iter().collect();
			settings.sort_by(|a, b| a.0.cmp(b.0));
			for (setting, state) in settings {
				let (left, right) = state.brackets();
				write!(body, "\n\t{left} {setting} {right}").ok();
			}
		}
		append_files(&mut body, dbs, optn, &mut common_files);
	}

	let mut variables: Vec<_> = dbs.variables.iter().collect();
	variables.sort_by(|a, b| a.0.cmp(b.0));
	for (optn, values) in variables {
		if !pattern.matches(optn) {
			continue;
		}
		write!(body, "\n  {optn}").ok();
		num_optns += 1;
		if f_available {
			let mut values: Vec<_> = values.keys().collect();
			values.sort();
			for value in values {
				write!(body, "\n\t= {value} =").ok();
			}
		}
		append_files(&mut body, dbs, optn, &mut common_files);
	}

	let sub_hdr = "('  inactive  ', '> active <', '? both ?', '= variable =')";
	let header = if body.is_empty() {
		format!("No available options and settings matching '{glob_pat}'")
	} else {
		format!("Showing available options and settings matching '{glob_pat}'\n{sub_hdr}")
	};

	if dbs.show_files.is_some() && num_optns > 1 {
		let uniq: BTreeSet<String> = common_files.into_iter().collect();
		let mut files_str = String::from("  Common files:\n  ");
		for file in uniq {
			files_str.push_str(&file);
			files_str.push(' ');
		}
		write!(body, "\n{files_str}").ok();
	}

	format!("{header}{body}")
}

fn append_files(body: &mut String, dbs: &RunDatabases, optn: &str, common_files: &mut Vec<String>) {
	let Some(show_files) = &dbs.show_files else { return };
	let Some(files) = show_files.files_for(optn) else { return };
	if files.is_empty() {
		return;
	}
	let files_str = files.keys().cloned().collect::<Vec<_>>().join(" ");
	write!(body, "\n  {files_str}\n{}", "-".repeat(60)).ok();
	common_files.extend(files.keys().cloned());
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	fn show_request() -> InputRequest {
		InputRequest {
			mode: Mode::ShowAvailable,
			tag: crate::grammar::any_tag(),
			raw_opt: crate::grammar::ANY_WORD.to_string(),
			setting: String::new(),
			rename_option: None,
			rename_setting: None,
			bashcomp: false,
		}
	}

	fn limits() -> FileLimits {
		FileLimits { max_flines: 9999, max_fsize_kb: 10 }
	}

	#[test]
	fn gathers_availability_across_multiple_files() {
		let dir = tempdir().unwrap();
		std::fs::write(dir.path().join("a.txt"), "air=1 # @visc air\n").unwrap();
		std::fs::write(dir.path().join("b.txt"), "# water=1 # @visc water\n").unwrap();

		let files = vec![dir.path().join("a.txt"), dir.path().join("b.txt")];
		let result = scroll_through_files(&files, &limits(), &show_request()).unwrap();
		assert!(!result.changes_made);

		let report = format_available_report(&result.dbs, "*", true);
		assert!(report.contains("@visc"));
		assert!(report.contains("> air <"));
		assert!(report.contains("  water  "));
	}

	#[test]
	fn reports_no_match_for_an_empty_run() {
		let dbs = RunDatabases::default();
		let report = format_available_report(&dbs, "@nothing*", true);
		assert_eq!(report, "No available options and settings matching '@nothing*'");
	}

	#[test]
	fn lists_common_files_when_multiple_options_match() {
		let mut dbs = RunDatabases::default();
		dbs.show_files = Some(Default::default());
		dbs.availability.observe("@a", "on", true, 1);
		dbs.availability.observe("@a", "off", false, 1);
		dbs.availability.observe("@b", "on", true, 1);
		dbs.availability.observe("@b", "off", false, 1);
		dbs.show_files.as_mut().unwrap().record("@a", "shared.txt");
		dbs.show_files.as_mut().unwrap().record("@b", "shared.txt");

		let report = format_available_report(&dbs, "*", true);
		assert!(report.contains("Common files"));
		assert!(report.contains("shared.txt"));
	}
}
