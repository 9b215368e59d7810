//! Per-file regex grammar: recognizes comment state and extracts annotation
//! triples from a line, parameterized by the file's comment indicator and
//! current nesting depth.
//!
//! Ported from `optionset.py`'s `ANY_COMMENT_IND`/`MULTI_TAG`/`ANY_WORD`/
//! `ANY_TAG`/`WHOLE_COMMENT`/`UNCOMMD_LINE`/`COMMD_LINE`/`ONLY_OPTN_SETTING`
//! templates. `ANY_TAG` is a negative-lookahead class (any character that is
//! not whitespace, a comment indicator, `*`, a word character, a bracket, or
//! a quote) that `regex` cannot express, so this module builds on
//! `fancy-regex` instead.

use fancy_regex::Regex;

use crate::annotation::Annotation;

/// Every comment indicator this tool recognizes, in the order they're tried
/// when sniffing a file.
pub const COMMENT_INDICATORS: &[&str] = &["//", "#", "%", "!", "--"];

/// Regex alternation matching any recognized comment indicator.
pub const ANY_COMMENT_IND: &str = r"(?://|[#%!]|--)";
pub const MULTI_TAG: &str = r"[*]";
pub const ANY_WORD: &str = r"[a-zA-Z0-9._\-\+]+";
const ANY_QUOTE: &str = r#"['"]"#;
const BRACKETS: &str = r"[()<>\[\]]";

/// A variable-setting literal: an equals sign, a quote, anything, the same quote.
pub fn any_var_setting() -> String {
	format!(r"\={ANY_QUOTE}.+{ANY_QUOTE}")
}

pub fn any_setting() -> String {
	format!("(?:{ANY_WORD}|{})", any_var_setting())
}

/// A single character that is none of: whitespace, a comment indicator, `*`,
/// a word character, a bracket, or a quote. Matches the tag character(s) that
/// precede an option name, e.g. `@` in `@option`.
pub fn any_tag() -> String {
	format!(r"(?:(?!\s|{ANY_COMMENT_IND}|{MULTI_TAG}|{ANY_WORD}|{BRACKETS}|{ANY_QUOTE}).)")
}

/// `((?:\s|{mtag}))({option})(\s+)({setting})((?:\s|$))`, used to locate and
/// rewrite an inline `option setting` pair inside a comment body when
/// renaming. Mirrors `INLINE_OPTN_SETTING`.
pub fn inline_optn_setting_regex(option_pattern: &str, setting_pattern: &str) -> regex::Regex {
	let pattern = format!(r"((?:\s|{MULTI_TAG}))({option_pattern})(\s+)({setting_pattern})((?:\s|$))");
	regex::Regex::new(&pattern).expect("inline-option-setting template is statically valid regex")
}

fn whole_comment_template(com_ind: &str) -> String {
	let tag = any_tag();
	let setting = any_setting();
	format!(
		r"(?P<com_ind>{com_ind})(?P<whole_com>.*\s+{MULTI_TAG}*{tag}+{ANY_WORD}\s+{setting}\s.*\n?)"
	)
}

fn nested_com_inds_pattern(com_ind: &str, nested_level: usize) -> String {
	format!(r"\s*{com_ind}").repeat(nested_level)
}

/// Three compiled patterns derived from a file's comment indicator and the
/// nesting depth in effect for the line currently being scanned. Recompiling
/// is not free, so callers (`state.rs`) should rebuild only when
/// `nested_level` actually changes between lines, not on every line.
pub struct LineGrammar {
	pub com_ind: String,
	pub nested_level: usize,
	commented_line: Regex,
	uncommented_line: Regex,
	annotation: Regex,
}

/// One `(mtag, tag, raw_opt, setting)` capture from `ONLY_OPTN_SETTING`,
/// found inside the commented body of a line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationMatch {
	pub mtag: bool,
	pub tag: String,
	pub raw_opt: String,
	pub setting: String,
}

impl AnnotationMatch {
	pub fn into_annotation(self) -> Annotation {
		Annotation { mtag: self.mtag, tag: self.tag, option: self.raw_opt, setting: self.setting }
	}
}

/// Result of applying the commented/uncommented-line grammar to one line.
pub struct LineMatch {
	pub commented: bool,
	pub nested_com_inds: String,
	pub non_com: String,
	/// The literal comment-indicator text matched at this position. Equal to
	/// the grammar's `com_ind` unless the grammar was built with an
	/// alternation (as `comment.rs` does for first-time detection).
	pub com_ind_matched: String,
	pub whole_com: String,
}

impl LineGrammar {
	pub fn build(com_ind: &str, nested_level: usize) -> LineGrammar {
		let nested = nested_com_inds_pattern(com_ind, nested_level);
		let whole = whole_comment_template(com_ind);

		let uncommented_pattern = format!(
			r"^(?P<nested_com_inds>{nested})(?P<non_com>\s*(?:(?!{com_ind}).)+){whole}"
		);
		let commented_pattern = format!(
			r"^(?P<nested_com_inds>{nested})(?P<non_com>\s*{com_ind}(?:(?!{com_ind}).)+){whole}"
		);
		let annotation_pattern = format!(
			r"({MULTI_TAG}*)({tag}+)({ANY_WORD})\s+({setting})\s?",
			tag = any_tag(),
			setting = any_setting(),
		);

		LineGrammar {
			com_ind: com_ind.to_string(),
			nested_level,
			commented_line: Regex::new(&commented_pattern)
				.expect("commented-line template is statically valid regex"),
			uncommented_line: Regex::new(&uncommented_pattern)
				.expect("uncommented-line template is statically valid regex"),
			annotation: Regex::new(&annotation_pattern)
				.expect("annotation template is statically valid regex"),
		}
	}

	/// Classify `line` as commented or uncommented and split it into its
	/// nested-comment-indicator prefix, non-comment body, and commented tail.
	/// Mirrors `COMMD_LINE`/`UNCOMMD_LINE` search order in `_process_line`:
	/// commented is tried first since an uncommented match can be a prefix of
	/// a commented one.
	pub fn match_line(&self, line: &str) -> Option<LineMatch> {
		if let Ok(Some(caps)) = self.commented_line.captures(line) {
			return Some(LineMatch {
				commented: true,
				nested_com_inds: caps.name("nested_com_inds").map(|m| m.as_str().to_string()).unwrap_or_default(),
				non_com: caps.name("non_com").map(|m| m.as_str().to_string()).unwrap_or_default(),
				com_ind_matched: caps.name("com_ind").map(|m| m.as_str().to_string()).unwrap_or_default(),
				whole_com: caps.name("whole_com").map(|m| m.as_str().to_string()).unwrap_or_default(),
			});
		}
		if let Ok(Some(caps)) = self.uncommented_line.captures(line) {
			return Some(LineMatch {
				commented: false,
				nested_com_inds: caps.name("nested_com_inds").map(|m| m.as_str().to_string()).unwrap_or_default(),
				non_com: caps.name("non_com").map(|m| m.as_str().to_string()).unwrap_or_default(),
				com_ind_matched: caps.name("com_ind").map(|m| m.as_str().to_string()).unwrap_or_default(),
				whole_com: caps.name("whole_com").map(|m| m.as_str().to_string()).unwrap_or_default(),
			});
		}
		None
	}

	/// Every `(mtag, tag, raw_opt, setting)` annotation found in a commented
	/// line body (the `whole_com` text returned by `match_line`). Mirrors
	/// `ONLY_OPTN_SETTING.findall`.
	pub fn find_annotations(&self, whole_com: &str) -> Vec<AnnotationMatch> {
		self.annotation
			.captures_iter(whole_com)
			.filter_map(|c| c.ok())
			.map(|caps| AnnotationMatch {
				mtag: !caps.get(1).map(|m| m.as_str()).unwrap_or_default().is_empty(),
				tag: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
				raw_opt: caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default(),
				setting: caps.get(4).map(|m| m.as_str().to_string()).unwrap_or_default(),
			})
			.collect()
	}
}
