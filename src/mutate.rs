//! The three textual edits the tool is allowed to make to a line: prepend a
//! comment indicator, strip one, or substitute a variable-setting's single
//! capture group in place.
//!
//! Grounded in `optionset.py`'s `_comment`/`_uncomment`/`_set_var_optn`/
//! `_parse_inline_regex`/`_add_left_right_groups`/`_check_varop_groups`.

use regex::Regex;

use crate::annotation::strip_variable_regex;
use crate::error::OptionsetError;

/// Strip exactly one leading `(whitespace*)(comment indicator)` pair,
/// keeping the whitespace.
pub fn uncomment(line: &str, com_ind: &str) -> String {
	let re = Regex::new(&format!(r"^(\s*)({})", regex::escape(com_ind)))
		.expect("uncomment template is statically valid regex");
	re.replace(line, "$1").into_owned()
}

/// Prepend the comment indicator at column 0.
pub fn comment(line: &str, com_ind: &str) -> String {
	format!("{com_ind}{line}")
}

/// Every top-level, non-escaped `(...)` group in `re_str`. Mirrors
/// `_check_varop_groups`'s `([^\\]\(.*?[^\\]\))` scan.
fn find_groups(re_str: &str) -> Vec<(usize, usize)> {
	let re = Regex::new(r"[^\\](\(.*?[^\\]\))").expect("group-scan template is statically valid regex");
	re.captures_iter(re_str)
		.filter_map(|c| c.get(1).map(|m| (m.start(), m.end())))
		.collect()
}

/// Reject a variable-setting regex that doesn't have exactly one capture
/// group. Mirrors `_check_varop_groups`.
pub fn check_variable_group_count(re_str: &str) -> Result<(), OptionsetError> {
	let groups = find_groups(re_str);
	match groups.len() {
		1 => Ok(()),
		0 => Err(OptionsetError::InvalidRegexGroupCount("no regex groups found".to_string())),
		_ => Err(OptionsetError::InvalidRegexGroupCount(
			"more than one regex group '()' found".to_string(),
		)),
	}
}

/// Wrap the text before and after the single `(...)` group in their own
/// groups, so a replacement can keep the surrounding literal context while
/// substituting only the value itself. Mirrors `_add_left_right_groups`.
fn add_left_right_groups(inline_re: &str) -> Result<String, OptionsetError> {
	let re = Regex::new(r"[^\\](\()").expect("left-paren template is statically valid regex");
	let left_idx = re
		.captures(inline_re)
		.and_then(|c| c.get(1))
		.map(|m| m.start())
		.ok_or_else(|| OptionsetError::InvalidRegexGroupCount("no regex groups found".to_string()))?;
	let re = Regex::new(r"[^\\](\))").expect("right-paren template is statically valid regex");
	let right_idx = re
		.captures(inline_re)
		.and_then(|c| c.get(1))
		.map(|m| m.start())
		.ok_or_else(|| OptionsetError::InvalidRegexGroupCount("no regex groups found".to_string()))?;

	let left = &inline_re[..left_idx];
	let mid = &inline_re[left_idx..=right_idx];
	let right = &inline_re[right_idx + 1..];
	Ok(format!("({left}){mid}({right})"))
}

/// Search `non_com` for the value currently matched by a variable
/// setting's embedded regex. Mirrors `_parse_inline_regex`.
pub fn parse_inline_regex(non_com: &str, setting: &str, context: &str) -> Result<String, OptionsetError> {
	let inline_re = strip_variable_regex(setting);
	check_variable_group_count(inline_re)?;
	let re = Regex::new(inline_re)
		.map_err(|e| OptionsetError::InvalidVariableRegex(format!("{context}: {e}")))?;
	let caps = re
		.captures(non_com)
		.ok_or_else(|| OptionsetError::InvalidVariableRegex(format!("{context}: pattern did not match")))?;
	caps.get(1)
		.map(|m| m.as_str().to_string())
		.ok_or_else(|| OptionsetError::InvalidVariableRegex(format!("{context}: no captured group")))
}

/// Rebuild a line with a variable setting's live value replaced by
/// `replacement`. Mirrors `_set_var_optn`.
pub fn set_variable_setting(
	nested_com_inds: &str,
	non_com: &str,
	com_ind: &str,
	whole_com: &str,
	setting: &str,
	replacement: &str,
) -> Result<String, OptionsetError> {
	let inline_re = strip_variable_regex(setting);
	let wrapped = add_left_right_groups(inline_re)?;
	let re = Regex::new(&wrapped)
		.map_err(|e| OptionsetError::InvalidVariableRegex(format!("{e}")))?;
	let new_non_com = re.replace_all(non_com, |caps: &regex::Captures| {
		format!("{}{}{}", &caps[1], replacement, &caps[3])
	});
	Ok(format!("{nested_com_inds}{new_non_com}{com_ind}{whole_com}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn comment_prepends_indicator() {
		assert_eq!(comment("foo\n", "#"), "#foo\n");
	}

	#[test]
	fn uncomment_strips_indicator_keeping_indent() {
		// Only the leading whitespace + indicator is matched and replaced;
		// any space between the indicator and the content is left untouched.
		assert_eq!(uncomment("  # foo\n", "#"), "   foo\n");
	}

	#[test]
	fn comment_then_uncomment_round_trips() {
		let line = "  some code\n";
		assert_eq!(uncomment(&comment(line, "#"), "#"), line);
	}

	#[test]
	fn rejects_zero_and_multiple_groups() {
		assert!(check_variable_group_count("no groups here").is_err());
		assert!(check_variable_group_count(r"= (a) (b)").is_err());
		assert!(check_variable_group_count(r"= (\d+)").is_ok());
	}

	#[test]
	fn parses_current_value_from_code() {
		let v = parse_inline_regex("timeout=42;", r"='timeout=(\d+);'", "ctx").unwrap();
		assert_eq!(v, "42");
	}

	#[test]
	fn sets_new_value_preserving_surrounding_text() {
		let newline = set_variable_setting(
			"",
			"timeout=42;",
			"#",
			" @opt ='timeout=(\\d+);'\n",
			r"='timeout=(\d+);'",
			"99",
		)
		.unwrap();
		assert_eq!(newline, "timeout=99;# @opt ='timeout=(\\d+);'\n");
	}
}
