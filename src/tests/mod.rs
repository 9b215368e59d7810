//! End-to-end scenarios run against real temp-directory files, driven
//! through the full `discover -> driver -> processor` pipeline rather than
//! unit-testing one module at a time. Placement mirrors the teacher's own
//! `src/tests/files.rs` integration-style suite.

use std::fs;

use tempfile::tempdir;

use crate::comment::FileLimits;
use crate::driver;
use crate::input::{InputRequest, Mode};

fn apply(tag: &str, raw_opt: &str, setting: &str) -> InputRequest {
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
fn simple_toggle_swaps_which_setting_is_active() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("a.txt");
	fs::write(
		&path,
		"application pimpleFoam // @simulation transient\n//application simpleFoam // @simulation steady\n",
	)
	.unwrap();

	let req = apply("\\@", "simulation", "steady");
	driver::scroll_through_files(&[path.clone()], &limits(), &req).unwrap();

	assert_eq!(
		fs::read_to_string(&path).unwrap(),
		"//application pimpleFoam // @simulation transient\napplication simpleFoam // @simulation steady\n"
	);
}

#[test]
fn variable_setting_rewrites_the_captured_value_in_place() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("v.cfg");
	fs::write(&path, "nu = 1.5e-5; // ~nu ='= (.*);'\n").unwrap();

	let req = apply("\\~", "nu", "1e-6");
	driver::scroll_through_files(&[path.clone()], &limits(), &req).unwrap();

	assert_eq!(fs::read_to_string(&path).unwrap(), "nu = 1e-6; // ~nu ='= (.*);'\n");
}

#[test]
fn multiline_scope_comments_its_interior_and_uncomments_the_closing_line() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("forces.txt");
	fs::write(
		&path,
		concat!(
			"functions        // *@forces on\n",
			"{\n",
			"value \"forces\"\n",
			"}                // *@forces on\n",
			"//               // @forces off\n",
		),
	)
	.unwrap();

	let req = apply("\\@", "forces", "off");
	driver::scroll_through_files(&[path.clone()], &limits(), &req).unwrap();

	let content = fs::read_to_string(&path).unwrap();
	let lines: Vec<&str> = content.lines().collect();
	assert!(lines[0].starts_with("//"));
	assert!(lines[1].starts_with("//"));
	assert!(lines[2].starts_with("//"));
	assert!(lines[3].starts_with("//"));
	assert!(!lines[4].starts_with("//"));
}

#[test]
fn ambiguous_setting_reports_both_question_marks() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("x.txt");
	fs::write(&path, "val // @x y\n//val // @x y\n//val // @x z\n").unwrap();

	let req = InputRequest {
		mode: Mode::ShowAvailable,
		tag: crate::grammar::any_tag(),
		raw_opt: crate::grammar::ANY_WORD.to_string(),
		setting: String::new(),
		rename_option: None,
		rename_setting: None,
		bashcomp: false,
	};
	let result = driver::scroll_through_files(&[path], &limits(), &req).unwrap();
	let report = driver::format_available_report(&result.dbs, "@x*", true);
	assert!(report.contains("? y ?"));
}

#[test]
fn binary_file_is_skipped_without_modification() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("bin.dat");
	fs::write(&path, [0xff, 0xfe, 0x00, 0x01, 0x02]).unwrap();

	let req = apply("\\@", "anything", "value");
	let result = driver::scroll_through_files(&[path.clone()], &limits(), &req).unwrap();

	assert!(!result.changes_made);
}

#[test]
fn rename_option_updates_the_annotation_without_changing_code() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("renamed.txt");
	fs::write(&path, "foo // @old A\n").unwrap();

	let req = InputRequest {
		mode: Mode::RenameOption,
		tag: "\\@".to_string(),
		raw_opt: "old".to_string(),
		setting: String::new(),
		rename_option: Some("@new".to_string()),
		rename_setting: None,
		bashcomp: false,
	};
	driver::scroll_through_files(&[path.clone()], &limits(), &req).unwrap();

	assert_eq!(fs::read_to_string(&path).unwrap(), "foo // @new A\n");
}
