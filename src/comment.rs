//! Comment-indicator detection and the size/line-count gate that protects
//! the scanner from large or binary files.
//!
//! Grounded in `optionset.py`'s `_get_comment_indicator` (two-pass
//! detection: start-of-line first, then in-line) and `_line_count`/the
//! `fsize_kb`/`linecount` checks at the top of `_process_file`.

use std::fmt;
use std::path::Path;

use regex::Regex;

use crate::grammar::{self, LineGrammar};

/// `max_flines`/`max_fsize_kb` from the `[Files]` config section.
#[derive(Clone, Copy, Debug)]
pub struct FileLimits {
	pub max_flines: usize,
	pub max_fsize_kb: u64,
}

/// Why a candidate file was skipped before (or instead of) being rewritten.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
	TooLarge,
	TooManyLines,
	Binary,
	NoCommentIndicator,
}

impl fmt::Display for SkipReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SkipReason::TooLarge => write!(f, "file exceeds size limit"),
			SkipReason::TooManyLines => write!(f, "file exceeds line limit"),
			SkipReason::Binary => write!(f, "file is not valid UTF-8"),
			SkipReason::NoCommentIndicator => write!(f, "no comment indicator found"),
		}
	}
}

/// Read `path` and split it into lines (newlines retained, like Python's
/// `readlines()`), rejecting it per `limits` along the way. Order matches
/// `_process_file`: size first, then line count, then UTF-8 validity is
/// implied by a successful read.
pub fn read_gated(path: &Path, limits: &FileLimits) -> Result<Vec<String>, SkipReason> {
	let meta = std::fs::metadata(path).map_err(|_| SkipReason::Binary)?;
	let size_kb = meta.len() / 1000;
	if size_kb > limits.max_fsize_kb {
		return Err(SkipReason::TooLarge);
	}

	let content = std::fs::read_to_string(path).map_err(|_| SkipReason::Binary)?;
	let lines = split_keepends(&content);
	if lines.len() > limits.max_flines {
		return Err(SkipReason::TooManyLines);
	}
	Ok(lines)
}

/// Split text into lines, keeping each line's trailing `\n` (but not adding
/// one to a final partial line), matching Python's file iteration.
fn split_keepends(content: &str) -> Vec<String> {
	if content.is_empty() {
		return Vec::new();
	}
	let mut out = Vec::new();
	let mut start = 0;
	for (i, b) in content.bytes().enumerate() {
		if b == b'\n' {
			out.push(content[start..=i].to_string());
			start = i + 1;
		}
	}
	if start < content.len() {
		out.push(content[start..].to_string());
	}
	out
}

/// Two-pass comment-indicator detection: a line beginning with an indicator
/// after only whitespace, else the indicator preceding an in-line
/// annotation anywhere in the file.
pub fn detect_comment_indicator(lines: &[String]) -> Option<String> {
	let leading = Regex::new(&format!(r"^\s*({})", grammar::ANY_COMMENT_IND))
		.expect("leading-indicator template is statically valid regex");
	for line in lines {
		if let Some(caps) = leading.captures(line) {
			return Some(caps[1].to_string());
		}
	}

	let generic = LineGrammar::build(grammar::ANY_COMMENT_IND, 0);
	for line in lines {
		if let Some(m) = generic.match_line(line) {
			if !m.commented {
				return Some(m.com_ind_matched);
			}
		}
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn detects_leading_indicator() {
		let lines = vec!["# a comment\n".to_string(), "code();\n".to_string()];
		assert_eq!(detect_comment_indicator(&lines), Some("#".to_string()));
	}

	#[test]
	fn detects_inline_indicator_when_none_leading() {
		let lines = vec!["foo() // @option setting\n".to_string()];
		assert_eq!(detect_comment_indicator(&lines), Some("//".to_string()));
	}

	#[test]
	fn returns_none_without_any_indicator() {
		let lines = vec!["plain text\n".to_string()];
		assert_eq!(detect_comment_indicator(&lines), None);
	}

	#[test]
	fn rejects_oversized_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("big.txt");
		std::fs::write(&path, "x".repeat(20_000)).unwrap();
		let limits = FileLimits { max_flines: 9999, max_fsize_kb: 10 };
		assert_eq!(read_gated(&path, &limits), Err(SkipReason::TooLarge));
	}

	#[test]
	fn rejects_too_many_lines() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("many.txt");
		std::fs::write(&path, "a\n".repeat(5)).unwrap();
		let limits = FileLimits { max_flines: 3, max_fsize_kb: 10 };
		assert_eq!(read_gated(&path, &limits), Err(SkipReason::TooManyLines));
	}

	#[test]
	fn accepts_file_within_limits() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("ok.txt");
		std::fs::write(&path, "a\nb\nc").unwrap();
		let limits = FileLimits { max_flines: 3, max_fsize_kb: 10 };
		let lines = read_gated(&path, &limits).unwrap();
		assert_eq!(lines, vec!["a\n", "b\n", "c"]);
	}
}
