//! Line classifier: combines the grammar's line-matching and annotation
//! extraction into the single record the state machine consumes.
//!
//! Grounded in the per-line regex application inside `optionset.py`'s
//! `_process_line` (the `commd_line_match`/`uncommd_line_match` dispatch
//! followed by `tag_optn_setting_re.findall`).

use crate::grammar::{AnnotationMatch, LineGrammar};

/// One line's classification against the current grammar.
pub struct LineClassification {
	pub nested_com_inds: String,
	pub non_com: String,
	pub whole_com: String,
	pub is_commented: bool,
	pub annotations: Vec<AnnotationMatch>,
}

/// Classify `line` under `grammar`. If neither the commented nor
/// uncommented pattern matches, the line carries no annotations but is
/// still handed to the state machine, since multi-line inheritance can
/// still toggle it.
pub fn classify(grammar: &LineGrammar, line: &str) -> LineClassification {
	match grammar.match_line(line) {
		Some(m) => {
			let annotations = grammar.find_annotations(&m.whole_com);
			LineClassification {
				nested_com_inds: m.nested_com_inds,
				non_com: m.non_com,
				whole_com: m.whole_com,
				is_commented: m.commented,
				annotations,
			}
		}
		None => LineClassification {
			nested_com_inds: String::new(),
			non_com: String::new(),
			whole_com: String::new(),
			is_commented: false,
			annotations: Vec::new(),
		},
	}
}
